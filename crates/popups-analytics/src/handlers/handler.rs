use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use popups_core::problemdetails::Problem;
use popups_core::TopLimit;
use tracing::info;

use super::types::*;
use crate::services::{AnalyticsDimension, AnalyticsEventKind};

/// Record a `view`, `click` or `conversion` for a variant on a page
#[utoipa::path(
    tag = "Popup Analytics",
    post,
    path = "/popup-analytics/{event}",
    params(
        ("event" = String, Path, description = "Event kind: view, click or conversion")
    ),
    request_body = RecordEventRequest,
    responses(
        (status = 200, description = "Counter bucket after the increment", body = AnalyticsBucketResponse),
        (status = 400, description = "Unknown event or empty page_url"),
        (status = 404, description = "Variant not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn record_event(
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
    Json(request): Json<RecordEventRequest>,
) -> Result<impl IntoResponse, Problem> {
    let kind: AnalyticsEventKind = event.parse()?;

    let bucket = state
        .analytics_service
        .record_event(kind, request.into())
        .await?;

    Ok(Json(AnalyticsBucketResponse::from(bucket)))
}

/// Conversion, click-through and bounce rates per variant
#[utoipa::path(
    tag = "Popup Analytics",
    get,
    path = "/popups/{id}/analytics",
    params(("id" = i32, Path, description = "Popup ID")),
    responses(
        (status = 200, description = "Rates per variant", body = RateReportResponse),
        (status = 404, description = "Popup has no analytics"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_rate_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let report = state.analytics_service.rate_report(id).await?;
    Ok(Json(RateReportResponse::new(id, report)))
}

/// Top devices, pages and variants by total engagement
#[utoipa::path(
    tag = "Popup Analytics",
    get,
    path = "/analytics/top",
    params(TopQuery),
    responses(
        (status = 200, description = "Rankings for every dimension", body = TopAnalyticsResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_top_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> Result<impl IntoResponse, Problem> {
    let limit = TopLimit::new(query.limit);
    let rankings = state.analytics_service.top_all(limit).await?;
    info!("Served top analytics with limit {}", limit.get());
    Ok(Json(TopAnalyticsResponse::from(rankings)))
}

/// Top entries of a single dimension
#[utoipa::path(
    tag = "Popup Analytics",
    get,
    path = "/analytics/top/{dimension}",
    params(
        ("dimension" = String, Path, description = "devices, pages or variants"),
        TopQuery
    ),
    responses(
        (status = 200, description = "Ranking for the dimension", body = Vec<crate::services::TopEntry>),
        (status = 400, description = "Unknown dimension"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_top_by_dimension(
    State(state): State<Arc<AppState>>,
    Path(dimension): Path<String>,
    Query(query): Query<TopQuery>,
) -> Result<impl IntoResponse, Problem> {
    let dimension: AnalyticsDimension = dimension.parse()?;
    let entries = state
        .analytics_service
        .top(dimension, TopLimit::new(query.limit))
        .await?;
    Ok(Json(entries))
}
