//! Popup type and layout type taxonomy
//!
//! Deleting a type or layout removes every popup that references it.

use popups_database::DbConnection;
use popups_entities::{popup_layout_types, popup_types};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set, TransactionTrait};
use std::sync::Arc;
use tracing::info;

use crate::error::PopupError;

#[derive(Clone)]
pub struct PopupTypeService {
    db: Arc<DbConnection>,
}

impl PopupTypeService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        PopupTypeService { db }
    }

    pub async fn list_types(&self) -> Result<Vec<popup_types::Model>, PopupError> {
        Ok(popup_types::Entity::find()
            .order_by_asc(popup_types::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get_type(&self, id: i32) -> Result<popup_types::Model, PopupError> {
        popup_types::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup type", id))
    }

    pub async fn create_type(&self, name: String) -> Result<popup_types::Model, PopupError> {
        let name = validate_lookup_name(&name)?;

        let created = self
            .db
            .transaction::<_, popup_types::Model, PopupError>(|txn| {
                Box::pin(async move {
                    Ok(popup_types::ActiveModel {
                        name: Set(name),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?)
                })
            })
            .await?;

        info!("Created popup type {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update_type(&self, id: i32, name: String) -> Result<popup_types::Model, PopupError> {
        let name = validate_lookup_name(&name)?;
        let mut active: popup_types::ActiveModel = self.get_type(id).await?.into();
        active.name = Set(name);
        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn delete_type(&self, id: i32) -> Result<(), PopupError> {
        self.get_type(id).await?.delete(self.db.as_ref()).await?;
        info!("Deleted popup type {}", id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct PopupLayoutTypeService {
    db: Arc<DbConnection>,
}

impl PopupLayoutTypeService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        PopupLayoutTypeService { db }
    }

    pub async fn list_layout_types(&self) -> Result<Vec<popup_layout_types::Model>, PopupError> {
        Ok(popup_layout_types::Entity::find()
            .order_by_asc(popup_layout_types::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get_layout_type(&self, id: i32) -> Result<popup_layout_types::Model, PopupError> {
        popup_layout_types::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup layout type", id))
    }

    pub async fn create_layout_type(
        &self,
        name: String,
    ) -> Result<popup_layout_types::Model, PopupError> {
        let name = validate_lookup_name(&name)?;

        let created = self
            .db
            .transaction::<_, popup_layout_types::Model, PopupError>(|txn| {
                Box::pin(async move {
                    Ok(popup_layout_types::ActiveModel {
                        name: Set(name),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?)
                })
            })
            .await?;

        info!("Created popup layout type {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update_layout_type(
        &self,
        id: i32,
        name: String,
    ) -> Result<popup_layout_types::Model, PopupError> {
        let name = validate_lookup_name(&name)?;
        let mut active: popup_layout_types::ActiveModel = self.get_layout_type(id).await?.into();
        active.name = Set(name);
        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn delete_layout_type(&self, id: i32) -> Result<(), PopupError> {
        self.get_layout_type(id)
            .await?
            .delete(self.db.as_ref())
            .await?;
        info!("Deleted popup layout type {}", id);
        Ok(())
    }
}

fn validate_lookup_name(name: &str) -> Result<String, PopupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PopupError::validation("name must not be empty"));
    }
    Ok(name.to_string())
}
