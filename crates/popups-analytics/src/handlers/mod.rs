mod handler;
mod types;

pub use handler::*;
pub use types::*;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use popups_core::ProblemDetails;
use utoipa::OpenApi;

use crate::services::{AnalyticsDimension, AnalyticsEventKind, CounterTotals, TopEntry};

#[derive(OpenApi)]
#[openapi(
    paths(
        record_event,
        get_rate_report,
        get_top_analytics,
        get_top_by_dimension,
    ),
    components(
        schemas(
            RecordEventRequest,
            AnalyticsBucketResponse,
            AnalyticsEventKind,
            AnalyticsDimension,
            TopQuery,
            TopEntry,
            TopAnalyticsResponse,
            CounterTotals,
            VariantRateResponse,
            RateReportResponse,
            ProblemDetails,
        )
    ),
    tags(
        (name = "Popup Analytics", description = "Event counters, rankings and variant rates")
    )
)]
pub struct AnalyticsApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/popup-analytics/{event}", post(record_event))
        .route("/popups/{id}/analytics", get(get_rate_report))
        .route("/analytics/top", get(get_top_analytics))
        .route("/analytics/top/{dimension}", get(get_top_by_dimension))
}
