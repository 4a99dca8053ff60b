use popups_database::DbConnection;
use popups_entities::{popup_layout_types, popup_schedules, popup_types, popup_variants, PopupContent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::{
    PopupCollection, PopupLayoutTypeService, PopupRetrievalService, PopupScheduleService,
    PopupService, PopupTypeService, PopupVariantService, PopupWithPrimaryVariant,
};

pub struct AppState {
    pub popup_service: Arc<PopupService>,
    pub variant_service: Arc<PopupVariantService>,
    pub schedule_service: Arc<PopupScheduleService>,
    pub type_service: Arc<PopupTypeService>,
    pub layout_type_service: Arc<PopupLayoutTypeService>,
    pub retrieval_service: Arc<PopupRetrievalService>,
}

pub fn create_management_app_state(db: Arc<DbConnection>) -> Arc<AppState> {
    Arc::new(AppState {
        popup_service: Arc::new(PopupService::new(db.clone())),
        variant_service: Arc::new(PopupVariantService::new(db.clone())),
        schedule_service: Arc::new(PopupScheduleService::new(db.clone())),
        type_service: Arc::new(PopupTypeService::new(db.clone())),
        layout_type_service: Arc::new(PopupLayoutTypeService::new(db.clone())),
        retrieval_service: Arc::new(PopupRetrievalService::new(db)),
    })
}

// Taxonomy

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LookupTypeRequest {
    #[schema(example = "Newsletter Signup")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LookupTypeResponse {
    pub id: i32,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<popup_types::Model> for LookupTypeResponse {
    fn from(model: popup_types::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.timestamp_millis(),
            updated_at: model.updated_at.timestamp_millis(),
        }
    }
}

impl From<popup_layout_types::Model> for LookupTypeResponse {
    fn from(model: popup_layout_types::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.timestamp_millis(),
            updated_at: model.updated_at.timestamp_millis(),
        }
    }
}

// Popups

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreatePopupRequest {
    pub type_id: i32,
    pub layout_type_id: i32,
    /// Content of the primary variant created with the popup
    #[schema(value_type = Object, example = json!({"text": "Hi"}))]
    pub content: PopupContent,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdatePopupRequest {
    pub type_id: Option<i32>,
    pub layout_type_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PopupVariantResponse {
    pub id: i32,
    pub popup_id: i32,
    pub name: String,
    #[schema(value_type = Object)]
    pub content: PopupContent,
    pub is_primary: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<popup_variants::Model> for PopupVariantResponse {
    fn from(model: popup_variants::Model) -> Self {
        Self {
            id: model.id,
            popup_id: model.popup_id,
            name: model.name,
            content: model.content,
            is_primary: model.is_primary,
            created_at: model.created_at.timestamp_millis(),
            updated_at: model.updated_at.timestamp_millis(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PopupResponse {
    pub id: i32,
    pub owner_id: i32,
    pub type_id: i32,
    pub layout_type_id: i32,
    pub primary_variant: Option<PopupVariantResponse>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PopupWithPrimaryVariant> for PopupResponse {
    fn from(item: PopupWithPrimaryVariant) -> Self {
        let popup = item.popup;
        Self {
            id: popup.id,
            owner_id: popup.owner_id,
            type_id: popup.type_id,
            layout_type_id: popup.layout_type_id,
            primary_variant: item.primary_variant.map(Into::into),
            created_at: popup.created_at.timestamp_millis(),
            updated_at: popup.updated_at.timestamp_millis(),
        }
    }
}

/// Owner and filter strategies return popups; the page strategy returns variants
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum PopupQueryResponse {
    Popups(Vec<PopupResponse>),
    Variants(Vec<PopupVariantResponse>),
}

impl From<PopupCollection> for PopupQueryResponse {
    fn from(collection: PopupCollection) -> Self {
        match collection {
            PopupCollection::Popups(items) => {
                PopupQueryResponse::Popups(items.into_iter().map(Into::into).collect())
            }
            PopupCollection::Variants(items) => {
                PopupQueryResponse::Variants(items.into_iter().map(Into::into).collect())
            }
        }
    }
}

// Variants

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateVariantRequest {
    pub popup_id: i32,
    pub name: String,
    #[schema(value_type = Object, example = json!({"text": "Hello", "cta": "Subscribe"}))]
    pub content: PopupContent,
    /// Promote the new variant to primary, demoting the current one
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateVariantRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub content: Option<PopupContent>,
    pub is_primary: Option<bool>,
}

// Schedules

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateScheduleRequest {
    pub variant_id: i32,
    /// Milliseconds before the variant is shown
    #[schema(example = 3000)]
    pub time_delay: i32,
    /// Exact page URLs the variant is shown on
    #[schema(example = json!(["/home", "/pricing"]))]
    pub display_pages: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateScheduleRequest {
    pub time_delay: Option<i32>,
    pub display_pages: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PopupScheduleResponse {
    pub id: i32,
    pub variant_id: i32,
    pub time_delay: i32,
    pub display_pages: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<popup_schedules::Model> for PopupScheduleResponse {
    fn from(model: popup_schedules::Model) -> Self {
        Self {
            id: model.id,
            variant_id: model.variant_id,
            time_delay: model.time_delay,
            display_pages: model.display_pages.0,
            created_at: model.created_at.timestamp_millis(),
            updated_at: model.updated_at.timestamp_millis(),
        }
    }
}
