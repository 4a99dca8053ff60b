use popups_database::DbConnection;
use popups_entities::{popup_layout_types, popup_types, popup_variants, popups, PopupContent};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::info;

use super::retrieval::{PopupRetrievalService, PopupWithPrimaryVariant};
use crate::error::PopupError;

/// Name given to the variant created together with a popup
pub const PRIMARY_VARIANT_NAME: &str = "Primary";

#[derive(Clone)]
pub struct PopupService {
    db: Arc<DbConnection>,
    retrieval: PopupRetrievalService,
}

impl PopupService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        let retrieval = PopupRetrievalService::new(db.clone());
        PopupService { db, retrieval }
    }

    /// Create a popup and its primary variant atomically
    pub async fn create_popup(
        &self,
        owner_id: i32,
        type_id: i32,
        layout_type_id: i32,
        content: PopupContent,
    ) -> Result<PopupWithPrimaryVariant, PopupError> {
        let created = self
            .db
            .transaction::<_, PopupWithPrimaryVariant, PopupError>(|txn| {
                Box::pin(async move {
                    ensure_taxonomy_exists(txn, Some(type_id), Some(layout_type_id)).await?;

                    let popup = popups::ActiveModel {
                        owner_id: Set(owner_id),
                        type_id: Set(type_id),
                        layout_type_id: Set(layout_type_id),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let variant = popup_variants::ActiveModel {
                        popup_id: Set(popup.id),
                        name: Set(PRIMARY_VARIANT_NAME.to_string()),
                        content: Set(content),
                        is_primary: Set(true),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(PopupWithPrimaryVariant {
                        popup,
                        primary_variant: Some(variant),
                    })
                })
            })
            .await?;

        info!(
            "Created popup {} for owner {}",
            created.popup.id, created.popup.owner_id
        );
        Ok(created)
    }

    /// A popup together with its primary variant
    pub async fn get_popup(&self, popup_id: i32) -> Result<PopupWithPrimaryVariant, PopupError> {
        let popup = self.find_popup(popup_id).await?;
        self.with_primary_variant(popup).await
    }

    /// Change the type and/or layout of a popup
    pub async fn update_popup(
        &self,
        popup_id: i32,
        type_id: Option<i32>,
        layout_type_id: Option<i32>,
    ) -> Result<PopupWithPrimaryVariant, PopupError> {
        let popup = self.find_popup(popup_id).await?;
        ensure_taxonomy_exists(self.db.as_ref(), type_id, layout_type_id).await?;

        let mut active: popups::ActiveModel = popup.into();
        if let Some(type_id) = type_id {
            active.type_id = Set(type_id);
        }
        if let Some(layout_type_id) = layout_type_id {
            active.layout_type_id = Set(layout_type_id);
        }
        let popup = active.update(self.db.as_ref()).await?;

        self.with_primary_variant(popup).await
    }

    /// Delete a popup; variants, schedules and analytics go with it
    pub async fn delete_popup(&self, popup_id: i32) -> Result<(), PopupError> {
        let popup = self.find_popup(popup_id).await?;
        popup.delete(self.db.as_ref()).await?;

        info!("Deleted popup {}", popup_id);
        Ok(())
    }

    /// Every popup owned by `owner_id`, each with its primary variant
    pub async fn list_owner_popups(
        &self,
        owner_id: i32,
    ) -> Result<Vec<PopupWithPrimaryVariant>, PopupError> {
        self.retrieval.by_owner(owner_id).await
    }

    async fn find_popup(&self, popup_id: i32) -> Result<popups::Model, PopupError> {
        popups::Entity::find_by_id(popup_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup", popup_id))
    }

    async fn with_primary_variant(
        &self,
        popup: popups::Model,
    ) -> Result<PopupWithPrimaryVariant, PopupError> {
        let primary_variant = popup_variants::Entity::find()
            .filter(popup_variants::Column::PopupId.eq(popup.id))
            .filter(popup_variants::Column::IsPrimary.eq(true))
            .order_by_asc(popup_variants::Column::Id)
            .one(self.db.as_ref())
            .await?;

        Ok(PopupWithPrimaryVariant {
            popup,
            primary_variant,
        })
    }
}

/// Referenced type and layout rows must exist
async fn ensure_taxonomy_exists<C>(
    conn: &C,
    type_id: Option<i32>,
    layout_type_id: Option<i32>,
) -> Result<(), PopupError>
where
    C: ConnectionTrait,
{
    if let Some(type_id) = type_id {
        if popup_types::Entity::find_by_id(type_id)
            .one(conn)
            .await?
            .is_none()
        {
            return Err(PopupError::validation(format!(
                "popup type {} does not exist",
                type_id
            )));
        }
    }

    if let Some(layout_type_id) = layout_type_id {
        if popup_layout_types::Entity::find_by_id(layout_type_id)
            .one(conn)
            .await?
            .is_none()
        {
            return Err(PopupError::validation(format!(
                "popup layout type {} does not exist",
                layout_type_id
            )));
        }
    }

    Ok(())
}
