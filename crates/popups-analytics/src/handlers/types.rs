use popups_database::DbConnection;
use popups_entities::{popup_analytics, DeviceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::services::{
    AnalyticsDimension, AnalyticsEvent, AnalyticsService, CounterTotals, TopEntry, VariantRate,
};

pub struct AppState {
    pub analytics_service: Arc<AnalyticsService>,
}

pub fn create_analytics_app_state(db: Arc<DbConnection>) -> Arc<AppState> {
    Arc::new(AppState {
        analytics_service: Arc::new(AnalyticsService::new(db)),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordEventRequest {
    pub variant_id: i32,
    #[schema(example = "/pricing")]
    pub page_url: String,
    pub device_type: DeviceType,
}

impl From<RecordEventRequest> for AnalyticsEvent {
    fn from(request: RecordEventRequest) -> Self {
        AnalyticsEvent {
            variant_id: request.variant_id,
            page_url: request.page_url,
            device_type: request.device_type,
        }
    }
}

/// Counter bucket after the event was applied
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsBucketResponse {
    pub id: i32,
    pub popup_id: i32,
    pub variant_id: i32,
    pub device_type: DeviceType,
    pub page_url: String,
    pub views: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<popup_analytics::Model> for AnalyticsBucketResponse {
    fn from(model: popup_analytics::Model) -> Self {
        Self {
            id: model.id,
            popup_id: model.popup_id,
            variant_id: model.variant_id,
            device_type: model.device_type,
            page_url: model.page_url,
            views: model.views,
            clicks: model.clicks,
            conversions: model.conversions,
            created_at: model.created_at.timestamp_millis(),
            updated_at: model.updated_at.timestamp_millis(),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopQuery {
    /// Maximum entries per dimension (default 10, capped at 100)
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopAnalyticsResponse {
    pub devices: Vec<TopEntry>,
    pub pages: Vec<TopEntry>,
    pub variants: Vec<TopEntry>,
}

impl From<BTreeMap<AnalyticsDimension, Vec<TopEntry>>> for TopAnalyticsResponse {
    fn from(mut rankings: BTreeMap<AnalyticsDimension, Vec<TopEntry>>) -> Self {
        Self {
            devices: rankings
                .remove(&AnalyticsDimension::Devices)
                .unwrap_or_default(),
            pages: rankings.remove(&AnalyticsDimension::Pages).unwrap_or_default(),
            variants: rankings
                .remove(&AnalyticsDimension::Variants)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VariantRateResponse {
    pub variant_id: i32,
    pub variant_name: String,
    pub is_primary: bool,
    /// Percentage of views that converted
    pub conversion_rate: f64,
    /// Percentage of views that were clicked
    pub click_through_rate: f64,
    /// Percentage of views that did not convert
    pub bounce_rate: f64,
    pub totals: CounterTotals,
}

impl From<VariantRate> for VariantRateResponse {
    fn from(rate: VariantRate) -> Self {
        Self {
            variant_id: rate.variant.id,
            variant_name: rate.variant.name,
            is_primary: rate.variant.is_primary,
            conversion_rate: rate.conversion_rate,
            click_through_rate: rate.click_through_rate,
            bounce_rate: rate.bounce_rate,
            totals: rate.totals,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RateReportResponse {
    pub popup_id: i32,
    pub owner_id: i32,
    /// Ordered by variant id
    pub variants: Vec<VariantRateResponse>,
}

impl RateReportResponse {
    pub fn new(popup_id: i32, report: BTreeMap<i32, VariantRate>) -> Self {
        let owner_id = report
            .values()
            .next()
            .map(|rate| rate.popup.owner_id)
            .unwrap_or_default();

        Self {
            popup_id,
            owner_id,
            variants: report.into_values().map(Into::into).collect(),
        }
    }
}
