//! Analytics aggregator
//!
//! Counters live in one row per (variant, page, device) bucket. Increments are
//! a single `INSERT .. ON CONFLICT DO UPDATE .. RETURNING` so concurrent
//! events on a new bucket never race into duplicate rows.

use chrono::Utc;
use popups_core::TopLimit;
use popups_database::DbConnection;
use popups_entities::{popup_analytics, popup_variants, popups};
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, FromQueryResult, Order,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{
    AnalyticsDimension, AnalyticsEvent, AnalyticsEventKind, CounterTotals, TopEntry, VariantRate,
};
use crate::error::AnalyticsError;

#[derive(Debug, FromQueryResult)]
struct TextKeyTotals {
    key: String,
    total_views: i64,
    total_clicks: i64,
    total_conversions: i64,
}

#[derive(Debug, FromQueryResult)]
struct IdKeyTotals {
    key: i32,
    total_views: i64,
    total_clicks: i64,
    total_conversions: i64,
}

#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DbConnection>,
}

impl AnalyticsService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        AnalyticsService { db }
    }

    pub async fn record_view(
        &self,
        event: AnalyticsEvent,
    ) -> Result<popup_analytics::Model, AnalyticsError> {
        self.record_event(AnalyticsEventKind::View, event).await
    }

    pub async fn record_click(
        &self,
        event: AnalyticsEvent,
    ) -> Result<popup_analytics::Model, AnalyticsError> {
        self.record_event(AnalyticsEventKind::Click, event).await
    }

    pub async fn record_conversion(
        &self,
        event: AnalyticsEvent,
    ) -> Result<popup_analytics::Model, AnalyticsError> {
        self.record_event(AnalyticsEventKind::Conversion, event).await
    }

    /// Create the bucket with the counter at 1, or bump it by 1.
    /// Returns the bucket after the increment.
    pub async fn record_event(
        &self,
        kind: AnalyticsEventKind,
        event: AnalyticsEvent,
    ) -> Result<popup_analytics::Model, AnalyticsError> {
        let page_url = event.page_url.trim();
        if page_url.is_empty() {
            return Err(AnalyticsError::validation("page_url must not be empty"));
        }

        let variant = popup_variants::Entity::find_by_id(event.variant_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AnalyticsError::NotFound {
                resource: "Popup variant",
                id: event.variant_id,
            })?;

        let counter = counter_column(kind);
        let first = |k: AnalyticsEventKind| if k == kind { 1 } else { 0 };
        let now = Utc::now();

        let bucket = popup_analytics::ActiveModel {
            popup_id: Set(variant.popup_id),
            variant_id: Set(variant.id),
            device_type: Set(event.device_type),
            page_url: Set(page_url.to_string()),
            views: Set(first(AnalyticsEventKind::View)),
            clicks: Set(first(AnalyticsEventKind::Click)),
            conversions: Set(first(AnalyticsEventKind::Conversion)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let on_conflict = OnConflict::columns([
            popup_analytics::Column::VariantId,
            popup_analytics::Column::PageUrl,
            popup_analytics::Column::DeviceType,
        ])
        .value(
            counter,
            Expr::col((popup_analytics::Entity, counter)).add(1),
        )
        .update_column(popup_analytics::Column::UpdatedAt)
        .to_owned();

        let row = popup_analytics::Entity::insert(bucket)
            .on_conflict(on_conflict)
            .exec_with_returning(self.db.as_ref())
            .await?;

        debug!(
            "Recorded {} for variant {} on {} ({})",
            kind, row.variant_id, row.page_url, row.device_type
        );
        Ok(row)
    }

    /// Buckets grouped by `dimension`, highest total engagement first,
    /// ties broken by the grouping key ascending
    pub async fn top(
        &self,
        dimension: AnalyticsDimension,
        limit: TopLimit,
    ) -> Result<Vec<TopEntry>, AnalyticsError> {
        let query = top_query(
            self.db.get_database_backend(),
            dimension_column(dimension),
            limit,
        );

        let entries = match dimension {
            AnalyticsDimension::Variants => query
                .into_model::<IdKeyTotals>()
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(|row| {
                    TopEntry::new(
                        row.key.to_string(),
                        row.total_views,
                        row.total_clicks,
                        row.total_conversions,
                    )
                })
                .collect(),
            AnalyticsDimension::Devices | AnalyticsDimension::Pages => query
                .into_model::<TextKeyTotals>()
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(|row| {
                    TopEntry::new(
                        row.key,
                        row.total_views,
                        row.total_clicks,
                        row.total_conversions,
                    )
                })
                .collect(),
        };

        Ok(entries)
    }

    pub async fn top_all(
        &self,
        limit: TopLimit,
    ) -> Result<BTreeMap<AnalyticsDimension, Vec<TopEntry>>, AnalyticsError> {
        let mut result = BTreeMap::new();
        for dimension in AnalyticsDimension::ALL {
            result.insert(dimension, self.top(dimension, limit).await?);
        }
        Ok(result)
    }

    /// Conversion, click-through and bounce rate per variant of a popup
    pub async fn rate_report(
        &self,
        popup_id: i32,
    ) -> Result<BTreeMap<i32, VariantRate>, AnalyticsError> {
        let rows = popup_analytics::Entity::find()
            .filter(popup_analytics::Column::PopupId.eq(popup_id))
            .order_by_asc(popup_analytics::Column::VariantId)
            .all(self.db.as_ref())
            .await?;

        if rows.is_empty() {
            return Err(AnalyticsError::NotFound {
                resource: "Popup",
                id: popup_id,
            });
        }

        let mut totals: BTreeMap<i32, CounterTotals> = BTreeMap::new();
        for row in &rows {
            totals
                .entry(row.variant_id)
                .or_default()
                .add(row.views, row.clicks, row.conversions);
        }

        let popup = popups::Entity::find_by_id(popup_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AnalyticsError::NotFound {
                resource: "Popup",
                id: popup_id,
            })?;

        let variants: BTreeMap<i32, popup_variants::Model> = popup_variants::Entity::find()
            .filter(popup_variants::Column::Id.is_in(totals.keys().copied()))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|variant| (variant.id, variant))
            .collect();

        let report: BTreeMap<i32, VariantRate> = totals
            .into_iter()
            .filter_map(|(variant_id, totals)| {
                let variant = variants.get(&variant_id)?.clone();
                Some((variant_id, VariantRate::new(popup.clone(), variant, totals)))
            })
            .collect();

        info!(
            "Built rate report for popup {} over {} variant(s)",
            popup_id,
            report.len()
        );
        Ok(report)
    }
}

fn top_query(
    backend: DatabaseBackend,
    key: popup_analytics::Column,
    limit: TopLimit,
) -> Select<popup_analytics::Entity> {
    popup_analytics::Entity::find()
        .select_only()
        .column_as(key, "key")
        .column_as(sum_as_bigint(backend, "views"), "total_views")
        .column_as(sum_as_bigint(backend, "clicks"), "total_clicks")
        .column_as(sum_as_bigint(backend, "conversions"), "total_conversions")
        .group_by(key)
        .order_by(Expr::cust("SUM(views + clicks + conversions)"), Order::Desc)
        .order_by(key, Order::Asc)
        .limit(limit.get())
}

fn counter_column(kind: AnalyticsEventKind) -> popup_analytics::Column {
    match kind {
        AnalyticsEventKind::View => popup_analytics::Column::Views,
        AnalyticsEventKind::Click => popup_analytics::Column::Clicks,
        AnalyticsEventKind::Conversion => popup_analytics::Column::Conversions,
    }
}

fn dimension_column(dimension: AnalyticsDimension) -> popup_analytics::Column {
    match dimension {
        AnalyticsDimension::Devices => popup_analytics::Column::DeviceType,
        AnalyticsDimension::Pages => popup_analytics::Column::PageUrl,
        AnalyticsDimension::Variants => popup_analytics::Column::VariantId,
    }
}

/// Postgres sums BIGINT into NUMERIC; cast back so rows decode as i64
fn sum_as_bigint(backend: DatabaseBackend, counter: &str) -> SimpleExpr {
    let target = match backend {
        DatabaseBackend::MySql => "SIGNED",
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => "BIGINT",
    };
    Expr::cust(format!("CAST(SUM({}) AS {})", counter, target))
}
