//! HTTP handlers for the popup type and layout type taxonomy

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use popups_core::problemdetails::Problem;

use super::types::*;

#[utoipa::path(
    tag = "Popup Types",
    get,
    path = "/popup-types",
    responses(
        (status = 200, description = "All popup types", body = Vec<LookupTypeResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_popup_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Problem> {
    let types = state.type_service.list_types().await?;
    Ok(Json(
        types
            .into_iter()
            .map(LookupTypeResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    tag = "Popup Types",
    post,
    path = "/popup-types",
    request_body = LookupTypeRequest,
    responses(
        (status = 201, description = "Popup type created", body = LookupTypeResponse),
        (status = 400, description = "Empty name"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_popup_type(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LookupTypeRequest>,
) -> Result<impl IntoResponse, Problem> {
    let created = state.type_service.create_type(request.name).await?;
    Ok((StatusCode::CREATED, Json(LookupTypeResponse::from(created))))
}

#[utoipa::path(
    tag = "Popup Types",
    get,
    path = "/popup-types/{id}",
    params(("id" = i32, Path, description = "Popup type ID")),
    responses(
        (status = 200, description = "Popup type", body = LookupTypeResponse),
        (status = 404, description = "Popup type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_popup_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let found = state.type_service.get_type(id).await?;
    Ok(Json(LookupTypeResponse::from(found)))
}

#[utoipa::path(
    tag = "Popup Types",
    put,
    path = "/popup-types/{id}",
    params(("id" = i32, Path, description = "Popup type ID")),
    request_body = LookupTypeRequest,
    responses(
        (status = 200, description = "Popup type renamed", body = LookupTypeResponse),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Popup type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_popup_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<LookupTypeRequest>,
) -> Result<impl IntoResponse, Problem> {
    let updated = state.type_service.update_type(id, request.name).await?;
    Ok(Json(LookupTypeResponse::from(updated)))
}

/// Delete a popup type and every popup of that type
#[utoipa::path(
    tag = "Popup Types",
    delete,
    path = "/popup-types/{id}",
    params(("id" = i32, Path, description = "Popup type ID")),
    responses(
        (status = 204, description = "Popup type deleted"),
        (status = 404, description = "Popup type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_popup_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state.type_service.delete_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    tag = "Popup Layout Types",
    get,
    path = "/popup-layout-types",
    responses(
        (status = 200, description = "All layout types", body = Vec<LookupTypeResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_layout_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Problem> {
    let layouts = state.layout_type_service.list_layout_types().await?;
    Ok(Json(
        layouts
            .into_iter()
            .map(LookupTypeResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    tag = "Popup Layout Types",
    post,
    path = "/popup-layout-types",
    request_body = LookupTypeRequest,
    responses(
        (status = 201, description = "Layout type created", body = LookupTypeResponse),
        (status = 400, description = "Empty name"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_layout_type(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LookupTypeRequest>,
) -> Result<impl IntoResponse, Problem> {
    let created = state
        .layout_type_service
        .create_layout_type(request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(LookupTypeResponse::from(created))))
}

#[utoipa::path(
    tag = "Popup Layout Types",
    get,
    path = "/popup-layout-types/{id}",
    params(("id" = i32, Path, description = "Layout type ID")),
    responses(
        (status = 200, description = "Layout type", body = LookupTypeResponse),
        (status = 404, description = "Layout type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_layout_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    let found = state.layout_type_service.get_layout_type(id).await?;
    Ok(Json(LookupTypeResponse::from(found)))
}

#[utoipa::path(
    tag = "Popup Layout Types",
    put,
    path = "/popup-layout-types/{id}",
    params(("id" = i32, Path, description = "Layout type ID")),
    request_body = LookupTypeRequest,
    responses(
        (status = 200, description = "Layout type renamed", body = LookupTypeResponse),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Layout type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_layout_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<LookupTypeRequest>,
) -> Result<impl IntoResponse, Problem> {
    let updated = state
        .layout_type_service
        .update_layout_type(id, request.name)
        .await?;
    Ok(Json(LookupTypeResponse::from(updated)))
}

/// Delete a layout type and every popup using it
#[utoipa::path(
    tag = "Popup Layout Types",
    delete,
    path = "/popup-layout-types/{id}",
    params(("id" = i32, Path, description = "Layout type ID")),
    responses(
        (status = 204, description = "Layout type deleted"),
        (status = 404, description = "Layout type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_layout_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Problem> {
    state.layout_type_service.delete_layout_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
