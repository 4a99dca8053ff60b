//! HTTP handlers for popups and strategy-selected retrieval

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use popups_core::problemdetails::Problem;
use popups_core::CallerIdentity;
use tracing::info;

use super::types::*;
use crate::services::{RetrievalParams, RetrievalStrategy};

/// Run one of the retrieval strategies (`owner`, `page`, `filter`)
#[utoipa::path(
    tag = "Popups",
    post,
    path = "/popups/query/{strategy}",
    params(
        ("strategy" = String, Path, description = "Retrieval strategy: owner, page or filter")
    ),
    request_body = RetrievalParams,
    responses(
        (status = 200, description = "Matching popups or variants", body = PopupQueryResponse),
        (status = 400, description = "Unknown strategy or missing parameter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn query_popups(
    State(state): State<Arc<AppState>>,
    Path(strategy): Path<String>,
    caller: Option<CallerIdentity>,
    Json(params): Json<RetrievalParams>,
) -> Result<impl IntoResponse, Problem> {
    let strategy: RetrievalStrategy = strategy.parse()?;

    let collection = state
        .retrieval_service
        .select(strategy, &params, caller)
        .await?;

    Ok(Json(PopupQueryResponse::from(collection)))
}

/// Popups owned by the caller
#[utoipa::path(
    tag = "Popups",
    get,
    path = "/popups",
    responses(
        (status = 200, description = "Caller's popups with their primary variants", body = Vec<PopupResponse>),
        (status = 401, description = "Missing or invalid X-Owner-Id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_popups(
    caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Problem> {
    let popups = state
        .popup_service
        .list_owner_popups(caller.owner_id())
        .await?;

    Ok(Json(
        popups
            .into_iter()
            .map(PopupResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a popup with its primary variant
#[utoipa::path(
    tag = "Popups",
    post,
    path = "/popups",
    request_body = CreatePopupRequest,
    responses(
        (status = 201, description = "Popup created", body = PopupResponse),
        (status = 400, description = "Unknown type or layout"),
        (status = 401, description = "Missing or invalid X-Owner-Id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_popup(
    caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePopupRequest>,
) -> Result<impl IntoResponse, Problem> {
    let created = state
        .popup_service
        .create_popup(
            caller.owner_id(),
            request.type_id,
            request.layout_type_id,
            request.content,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PopupResponse::from(created))))
}

/// Get a popup with its primary variant
#[utoipa::path(
    tag = "Popups",
    get,
    path = "/popups/{id}",
    params(("id" = i32, Path, description = "Popup ID")),
    responses(
        (status = 200, description = "Popup", body = PopupResponse),
        (status = 404, description = "Popup not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_popup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let popup = state.popup_service.get_popup(id).await?;
    Ok(Json(PopupResponse::from(popup)))
}

/// Change a popup's type or layout
#[utoipa::path(
    tag = "Popups",
    put,
    path = "/popups/{id}",
    params(("id" = i32, Path, description = "Popup ID")),
    request_body = UpdatePopupRequest,
    responses(
        (status = 200, description = "Popup updated", body = PopupResponse),
        (status = 400, description = "Unknown type or layout"),
        (status = 404, description = "Popup not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_popup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePopupRequest>,
) -> Result<impl IntoResponse, Problem> {
    let popup = state
        .popup_service
        .update_popup(id, request.type_id, request.layout_type_id)
        .await?;
    Ok(Json(PopupResponse::from(popup)))
}

/// Delete a popup with its variants, schedules and analytics
#[utoipa::path(
    tag = "Popups",
    delete,
    path = "/popups/{id}",
    params(("id" = i32, Path, description = "Popup ID")),
    responses(
        (status = 204, description = "Popup deleted"),
        (status = 404, description = "Popup not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_popup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state.popup_service.delete_popup(id).await?;
    info!("Popup {} deleted via API", id);
    Ok(StatusCode::NO_CONTENT)
}
