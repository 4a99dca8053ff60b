//! HTTP handlers for popup variants and their schedules

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use popups_core::problemdetails::Problem;

use super::types::*;

/// List the variants of a popup
#[utoipa::path(
    tag = "Popup Variants",
    get,
    path = "/popups/{id}/variants",
    params(("id" = i32, Path, description = "Popup ID")),
    responses(
        (status = 200, description = "Variants ordered by id", body = Vec<PopupVariantResponse>),
        (status = 404, description = "Popup not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_variants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let variants = state.variant_service.list_variants(id).await?;
    Ok(Json(
        variants
            .into_iter()
            .map(PopupVariantResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    tag = "Popup Variants",
    post,
    path = "/popup-variants",
    request_body = CreateVariantRequest,
    responses(
        (status = 201, description = "Variant created", body = PopupVariantResponse),
        (status = 400, description = "Invalid request or unknown popup"),
        (status = 409, description = "Popup already has a primary variant"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_variant(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateVariantRequest>,
) -> Result<impl IntoResponse, Problem> {
    let variant = state
        .variant_service
        .create_variant(
            request.popup_id,
            request.name,
            request.content,
            request.is_primary,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PopupVariantResponse::from(variant))))
}

/// Update a variant; setting `is_primary` demotes the current primary
#[utoipa::path(
    tag = "Popup Variants",
    put,
    path = "/popup-variants/{id}",
    params(("id" = i32, Path, description = "Variant ID")),
    request_body = UpdateVariantRequest,
    responses(
        (status = 200, description = "Variant updated", body = PopupVariantResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Variant not found"),
        (status = 409, description = "Popup already has a primary variant"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_variant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateVariantRequest>,
) -> Result<impl IntoResponse, Problem> {
    let variant = state
        .variant_service
        .update_variant(id, request.name, request.content, request.is_primary)
        .await?;
    Ok(Json(PopupVariantResponse::from(variant)))
}

#[utoipa::path(
    tag = "Popup Variants",
    delete,
    path = "/popup-variants/{id}",
    params(("id" = i32, Path, description = "Variant ID")),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 404, description = "Variant not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_variant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state.variant_service.delete_variant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the schedules of a variant
#[utoipa::path(
    tag = "Popup Schedules",
    get,
    path = "/popup-variants/{id}/schedules",
    params(("id" = i32, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Schedules ordered by id", body = Vec<PopupScheduleResponse>),
        (status = 404, description = "Variant not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let schedules = state.schedule_service.list_schedules(id).await?;
    Ok(Json(
        schedules
            .into_iter()
            .map(PopupScheduleResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    tag = "Popup Schedules",
    post,
    path = "/popup-schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = PopupScheduleResponse),
        (status = 400, description = "Invalid request or unknown variant"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, Problem> {
    let schedule = state
        .schedule_service
        .create_schedule(request.variant_id, request.time_delay, request.display_pages)
        .await?;

    Ok((StatusCode::CREATED, Json(PopupScheduleResponse::from(schedule))))
}

#[utoipa::path(
    tag = "Popup Schedules",
    put,
    path = "/popup-schedules/{id}",
    params(("id" = i32, Path, description = "Schedule ID")),
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated", body = PopupScheduleResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, Problem> {
    let schedule = state
        .schedule_service
        .update_schedule(id, request.time_delay, request.display_pages)
        .await?;
    Ok(Json(PopupScheduleResponse::from(schedule)))
}

#[utoipa::path(
    tag = "Popup Schedules",
    delete,
    path = "/popup-schedules/{id}",
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state.schedule_service.delete_schedule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
