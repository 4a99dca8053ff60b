//! A/B test variants of a popup
//!
//! At most one variant per popup is primary. Promoting a variant demotes its
//! siblings inside the same transaction, and a partial unique index rejects a
//! second primary written by a concurrent promotion (`PopupError::Conflict`).
//! Deleting the primary variant leaves the popup without one until another is
//! promoted.

use chrono::Utc;
use popups_database::DbConnection;
use popups_entities::{popup_variants, popups, PopupContent};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::PopupError;

#[derive(Clone)]
pub struct PopupVariantService {
    db: Arc<DbConnection>,
}

impl PopupVariantService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        PopupVariantService { db }
    }

    pub async fn list_variants(
        &self,
        popup_id: i32,
    ) -> Result<Vec<popup_variants::Model>, PopupError> {
        let popup = popups::Entity::find_by_id(popup_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup", popup_id))?;

        let variants = popup
            .find_related(popup_variants::Entity)
            .order_by_asc(popup_variants::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(variants)
    }

    pub async fn get_variant(&self, variant_id: i32) -> Result<popup_variants::Model, PopupError> {
        popup_variants::Entity::find_by_id(variant_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup variant", variant_id))
    }

    /// New variants are non-primary unless `is_primary` is requested
    pub async fn create_variant(
        &self,
        popup_id: i32,
        name: String,
        content: PopupContent,
        is_primary: bool,
    ) -> Result<popup_variants::Model, PopupError> {
        let name = validate_name(&name)?;

        let variant = self
            .db
            .transaction::<_, popup_variants::Model, PopupError>(|txn| {
                Box::pin(async move {
                    if popups::Entity::find_by_id(popup_id).one(txn).await?.is_none() {
                        return Err(PopupError::validation(format!(
                            "popup {} does not exist",
                            popup_id
                        )));
                    }

                    if is_primary {
                        demote_siblings(txn, popup_id, None).await?;
                    }

                    let variant = popup_variants::ActiveModel {
                        popup_id: Set(popup_id),
                        name: Set(name),
                        content: Set(content),
                        is_primary: Set(is_primary),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| primary_conflict(e, popup_id))?;

                    Ok(variant)
                })
            })
            .await?;

        info!("Created variant {} for popup {}", variant.id, popup_id);
        Ok(variant)
    }

    pub async fn update_variant(
        &self,
        variant_id: i32,
        name: Option<String>,
        content: Option<PopupContent>,
        is_primary: Option<bool>,
    ) -> Result<popup_variants::Model, PopupError> {
        let name = name.as_deref().map(validate_name).transpose()?;

        let variant = self
            .db
            .transaction::<_, popup_variants::Model, PopupError>(|txn| {
                Box::pin(async move {
                    let existing = popup_variants::Entity::find_by_id(variant_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| PopupError::not_found("Popup variant", variant_id))?;

                    let existing_popup_id = existing.popup_id;
                    if is_primary == Some(true) && !existing.is_primary {
                        demote_siblings(txn, existing.popup_id, Some(existing.id)).await?;
                    }

                    let mut active: popup_variants::ActiveModel = existing.into();
                    if let Some(name) = name {
                        active.name = Set(name);
                    }
                    if let Some(content) = content {
                        active.content = Set(content);
                    }
                    if let Some(is_primary) = is_primary {
                        active.is_primary = Set(is_primary);
                    }

                    active
                        .update(txn)
                        .await
                        .map_err(|e| primary_conflict(e, existing_popup_id))
                })
            })
            .await?;

        Ok(variant)
    }

    pub async fn delete_variant(&self, variant_id: i32) -> Result<(), PopupError> {
        let variant = self.get_variant(variant_id).await?;
        variant.delete(self.db.as_ref()).await?;

        info!("Deleted variant {}", variant_id);
        Ok(())
    }
}

/// Clear the primary flag on every variant of `popup_id` except `keep`
async fn demote_siblings<C>(conn: &C, popup_id: i32, keep: Option<i32>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let mut update = popup_variants::Entity::update_many()
        .col_expr(popup_variants::Column::IsPrimary, Expr::value(false))
        .col_expr(popup_variants::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(popup_variants::Column::PopupId.eq(popup_id))
        .filter(popup_variants::Column::IsPrimary.eq(true));

    if let Some(keep) = keep {
        update = update.filter(popup_variants::Column::Id.ne(keep));
    }

    let result = update.exec(conn).await?;
    debug!(
        "Demoted {} primary variant(s) of popup {}",
        result.rows_affected, popup_id
    );
    Ok(())
}

/// A concurrent promotion that committed first trips the single-primary index
fn primary_conflict(error: DbErr, popup_id: i32) -> PopupError {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => PopupError::Conflict(format!(
            "popup {} already has a primary variant",
            popup_id
        )),
        _ => PopupError::Database(error),
    }
}

fn validate_name(name: &str) -> Result<String, PopupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PopupError::validation("variant name must not be empty"));
    }
    Ok(name.to_string())
}
