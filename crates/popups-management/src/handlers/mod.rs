//! HTTP surface of popup management

mod lookups;
mod popups;
mod types;
mod variants;

pub use lookups::*;
pub use popups::*;
pub use types::*;
pub use variants::*;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use popups_core::ProblemDetails;
use utoipa::OpenApi;

use crate::services::{RetrievalParams, RetrievalStrategy};

#[derive(OpenApi)]
#[openapi(
    paths(
        query_popups,
        list_popups,
        create_popup,
        get_popup,
        update_popup,
        delete_popup,
        list_variants,
        create_variant,
        update_variant,
        delete_variant,
        list_schedules,
        create_schedule,
        update_schedule,
        delete_schedule,
        list_popup_types,
        create_popup_type,
        get_popup_type,
        update_popup_type,
        delete_popup_type,
        list_layout_types,
        create_layout_type,
        get_layout_type,
        update_layout_type,
        delete_layout_type,
    ),
    components(
        schemas(
            RetrievalParams,
            RetrievalStrategy,
            PopupQueryResponse,
            PopupResponse,
            PopupVariantResponse,
            PopupScheduleResponse,
            CreatePopupRequest,
            UpdatePopupRequest,
            CreateVariantRequest,
            UpdateVariantRequest,
            CreateScheduleRequest,
            UpdateScheduleRequest,
            LookupTypeRequest,
            LookupTypeResponse,
            ProblemDetails,
        )
    ),
    tags(
        (name = "Popups", description = "Popup definitions and retrieval strategies"),
        (name = "Popup Variants", description = "A/B test variants"),
        (name = "Popup Schedules", description = "Page targeting and display delay"),
        (name = "Popup Types", description = "Popup type taxonomy"),
        (name = "Popup Layout Types", description = "Popup layout taxonomy")
    )
)]
pub struct ManagementApiDoc;

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Taxonomy
        .route("/popup-types", get(list_popup_types).post(create_popup_type))
        .route(
            "/popup-types/{id}",
            get(get_popup_type)
                .put(update_popup_type)
                .delete(delete_popup_type),
        )
        .route(
            "/popup-layout-types",
            get(list_layout_types).post(create_layout_type),
        )
        .route(
            "/popup-layout-types/{id}",
            get(get_layout_type)
                .put(update_layout_type)
                .delete(delete_layout_type),
        )
        // Popups
        .route("/popups", get(list_popups).post(create_popup))
        .route(
            "/popups/{id}",
            get(get_popup).put(update_popup).delete(delete_popup),
        )
        .route("/popups/query/{strategy}", post(query_popups))
        // Variants
        .route("/popups/{id}/variants", get(list_variants))
        .route("/popup-variants", post(create_variant))
        .route(
            "/popup-variants/{id}",
            put(update_variant).delete(delete_variant),
        )
        // Schedules
        .route("/popup-variants/{id}/schedules", get(list_schedules))
        .route("/popup-schedules", post(create_schedule))
        .route(
            "/popup-schedules/{id}",
            put(update_schedule).delete(delete_schedule),
        )
}
