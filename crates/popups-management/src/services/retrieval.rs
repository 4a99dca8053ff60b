//! Strategy-selected popup lookup
//!
//! Three read-only strategies share one entry point:
//! - `owner`: every popup of an owner, each with its primary variant
//! - `page`: variants scheduled on an exact page URL
//! - `filter`: the caller's popups narrowed by type and layout

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use popups_core::CallerIdentity;
use popups_database::DbConnection;
use popups_entities::{popup_schedules, popup_variants, popups};
use sea_orm::sea_query::{Expr, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::error::PopupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    Owner,
    Page,
    Filter,
}

impl RetrievalStrategy {
    pub const ALL: [RetrievalStrategy; 3] = [
        RetrievalStrategy::Owner,
        RetrievalStrategy::Page,
        RetrievalStrategy::Filter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStrategy::Owner => "owner",
            RetrievalStrategy::Page => "page",
            RetrievalStrategy::Filter => "filter",
        }
    }
}

impl FromStr for RetrievalStrategy {
    type Err = PopupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(RetrievalStrategy::Owner),
            "page" => Ok(RetrievalStrategy::Page),
            "filter" => Ok(RetrievalStrategy::Filter),
            other => Err(PopupError::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter bag; which fields matter depends on the strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RetrievalParams {
    /// Required by the `owner` strategy
    pub owner_id: Option<i32>,
    /// Required by the `page` strategy; matched exactly
    pub page_url: Option<String>,
    /// Optional narrowing for the `filter` strategy
    pub type_id: Option<i32>,
    /// Optional narrowing for the `filter` strategy
    pub layout_type_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupWithPrimaryVariant {
    pub popup: popups::Model,
    pub primary_variant: Option<popup_variants::Model>,
}

/// Result shape differs per strategy: popups for owner/filter, variants for page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum PopupCollection {
    Popups(Vec<PopupWithPrimaryVariant>),
    Variants(Vec<popup_variants::Model>),
}

impl PopupCollection {
    pub fn len(&self) -> usize {
        match self {
            PopupCollection::Popups(items) => items.len(),
            PopupCollection::Variants(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct PopupRetrievalService {
    db: Arc<DbConnection>,
}

impl PopupRetrievalService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    pub async fn select(
        &self,
        strategy: RetrievalStrategy,
        params: &RetrievalParams,
        caller: Option<CallerIdentity>,
    ) -> Result<PopupCollection, PopupError> {
        debug!("Selecting popups with {} strategy", strategy);

        match strategy {
            RetrievalStrategy::Owner => {
                let owner_id = params
                    .owner_id
                    .ok_or_else(|| PopupError::validation("owner_id is required"))?;
                self.by_owner(owner_id).await.map(PopupCollection::Popups)
            }
            RetrievalStrategy::Page => {
                let page_url = params
                    .page_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| PopupError::validation("page_url is required"))?;
                self.by_page(page_url).await.map(PopupCollection::Variants)
            }
            RetrievalStrategy::Filter => {
                let caller = caller.ok_or_else(|| {
                    PopupError::validation("filter strategy requires an authenticated caller")
                })?;
                self.by_filter(caller.owner_id(), params.type_id, params.layout_type_id)
                    .await
                    .map(PopupCollection::Popups)
            }
        }
    }

    /// Every popup of an owner ordered by id
    pub async fn by_owner(&self, owner_id: i32) -> Result<Vec<PopupWithPrimaryVariant>, PopupError> {
        let found = popups::Entity::find()
            .filter(popups::Column::OwnerId.eq(owner_id))
            .order_by_asc(popups::Column::Id)
            .all(self.db.as_ref())
            .await?;

        self.attach_primary_variants(found).await
    }

    /// Variants with at least one schedule listing exactly `page_url`
    pub async fn by_page(&self, page_url: &str) -> Result<Vec<popup_variants::Model>, PopupError> {
        let scheduled_here = Query::select()
            .column(popup_schedules::Column::VariantId)
            .from(popup_schedules::Entity)
            .and_where(display_pages_contains(
                self.db.get_database_backend(),
                page_url,
            ))
            .to_owned();

        let variants = popup_variants::Entity::find()
            .filter(popup_variants::Column::Id.in_subquery(scheduled_here))
            .order_by_asc(popup_variants::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(variants)
    }

    /// Owner's popups with optional type and layout constraints (AND)
    pub async fn by_filter(
        &self,
        owner_id: i32,
        type_id: Option<i32>,
        layout_type_id: Option<i32>,
    ) -> Result<Vec<PopupWithPrimaryVariant>, PopupError> {
        let mut query = popups::Entity::find().filter(popups::Column::OwnerId.eq(owner_id));

        if let Some(type_id) = type_id {
            query = query.filter(popups::Column::TypeId.eq(type_id));
        }
        if let Some(layout_type_id) = layout_type_id {
            query = query.filter(popups::Column::LayoutTypeId.eq(layout_type_id));
        }

        let found = query
            .order_by_asc(popups::Column::Id)
            .all(self.db.as_ref())
            .await?;

        self.attach_primary_variants(found).await
    }

    /// One batched query for all primary variants
    async fn attach_primary_variants(
        &self,
        found: Vec<popups::Model>,
    ) -> Result<Vec<PopupWithPrimaryVariant>, PopupError> {
        let primaries = found
            .load_many(
                popup_variants::Entity::find()
                    .filter(popup_variants::Column::IsPrimary.eq(true))
                    .order_by_asc(popup_variants::Column::Id),
                self.db.as_ref(),
            )
            .await?;

        Ok(found
            .into_iter()
            .zip(primaries)
            .map(|(popup, variants)| PopupWithPrimaryVariant {
                popup,
                primary_variant: variants.into_iter().next(),
            })
            .collect())
    }
}

/// JSON-array membership test on `popup_schedules.display_pages`
fn display_pages_contains(backend: DatabaseBackend, page_url: &str) -> SimpleExpr {
    match backend {
        DatabaseBackend::Postgres => Expr::cust_with_values(
            "popup_schedules.display_pages @> CAST(? AS jsonb)",
            [serde_json::json!([page_url]).to_string()],
        ),
        DatabaseBackend::MySql => Expr::cust_with_values(
            "JSON_CONTAINS(popup_schedules.display_pages, ?)",
            [serde_json::json!(page_url).to_string()],
        ),
        DatabaseBackend::Sqlite => Expr::cust_with_values(
            "EXISTS (SELECT 1 FROM json_each(popup_schedules.display_pages) WHERE json_each.value = ?)",
            [page_url.to_string()],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{PostgresQueryBuilder, QueryStatementWriter, SqliteQueryBuilder};

    #[test]
    fn test_strategy_parses_known_names() {
        for strategy in RetrievalStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<RetrievalStrategy>().unwrap(), strategy);
            assert_eq!(strategy.to_string(), strategy.as_str());
        }
    }

    #[test]
    fn test_strategy_rejects_unknown_names() {
        let err = "random".parse::<RetrievalStrategy>().unwrap_err();
        assert!(matches!(err, PopupError::UnsupportedStrategy(name) if name == "random"));
        assert!("Owner".parse::<RetrievalStrategy>().is_err());
    }

    #[test]
    fn test_page_filter_binds_url_as_value() {
        let (sql, values) = Query::select()
            .column(popup_schedules::Column::VariantId)
            .from(popup_schedules::Entity)
            .and_where(display_pages_contains(DatabaseBackend::Sqlite, "/pricing"))
            .build(SqliteQueryBuilder);
        assert!(sql.contains("json_each(popup_schedules.display_pages)"));
        assert!(!sql.contains("/pricing"));
        assert_eq!(values.0.len(), 1);

        let (sql, _) = Query::select()
            .column(popup_schedules::Column::VariantId)
            .from(popup_schedules::Entity)
            .and_where(display_pages_contains(DatabaseBackend::Postgres, "/pricing"))
            .build(PostgresQueryBuilder);
        assert!(sql.contains("display_pages @> CAST("));
        assert!(!sql.contains("/pricing"));
    }

    #[test]
    fn test_collection_serializes_with_kind_tag() {
        let json = serde_json::to_value(PopupCollection::Variants(vec![])).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "variants", "items": []}));
    }
}
