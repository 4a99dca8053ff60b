use popups_database::DbConnection;
use popups_entities::{popup_schedules, popup_variants, DisplayPages};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set, TransactionTrait};
use std::sync::Arc;
use tracing::info;

use crate::error::PopupError;

#[derive(Clone)]
pub struct PopupScheduleService {
    db: Arc<DbConnection>,
}

impl PopupScheduleService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        PopupScheduleService { db }
    }

    pub async fn list_schedules(
        &self,
        variant_id: i32,
    ) -> Result<Vec<popup_schedules::Model>, PopupError> {
        let variant = popup_variants::Entity::find_by_id(variant_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup variant", variant_id))?;

        let schedules = variant
            .find_related(popup_schedules::Entity)
            .order_by_asc(popup_schedules::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(schedules)
    }

    pub async fn get_schedule(
        &self,
        schedule_id: i32,
    ) -> Result<popup_schedules::Model, PopupError> {
        popup_schedules::Entity::find_by_id(schedule_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| PopupError::not_found("Popup schedule", schedule_id))
    }

    pub async fn create_schedule(
        &self,
        variant_id: i32,
        time_delay: i32,
        display_pages: Vec<String>,
    ) -> Result<popup_schedules::Model, PopupError> {
        validate_time_delay(time_delay)?;
        let display_pages = validate_pages(display_pages)?;

        let schedule = self
            .db
            .transaction::<_, popup_schedules::Model, PopupError>(|txn| {
                Box::pin(async move {
                    if popup_variants::Entity::find_by_id(variant_id)
                        .one(txn)
                        .await?
                        .is_none()
                    {
                        return Err(PopupError::validation(format!(
                            "popup variant {} does not exist",
                            variant_id
                        )));
                    }

                    let schedule = popup_schedules::ActiveModel {
                        variant_id: Set(variant_id),
                        time_delay: Set(time_delay),
                        display_pages: Set(display_pages),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(schedule)
                })
            })
            .await?;

        info!(
            "Scheduled variant {} on {} page(s)",
            variant_id,
            schedule.display_pages.len()
        );
        Ok(schedule)
    }

    pub async fn update_schedule(
        &self,
        schedule_id: i32,
        time_delay: Option<i32>,
        display_pages: Option<Vec<String>>,
    ) -> Result<popup_schedules::Model, PopupError> {
        if let Some(time_delay) = time_delay {
            validate_time_delay(time_delay)?;
        }
        let display_pages = display_pages.map(validate_pages).transpose()?;

        let schedule = self.get_schedule(schedule_id).await?;
        let mut active: popup_schedules::ActiveModel = schedule.into();
        if let Some(time_delay) = time_delay {
            active.time_delay = Set(time_delay);
        }
        if let Some(display_pages) = display_pages {
            active.display_pages = Set(display_pages);
        }

        Ok(active.update(self.db.as_ref()).await?)
    }

    pub async fn delete_schedule(&self, schedule_id: i32) -> Result<(), PopupError> {
        let schedule = self.get_schedule(schedule_id).await?;
        schedule.delete(self.db.as_ref()).await?;
        Ok(())
    }
}

fn validate_time_delay(time_delay: i32) -> Result<(), PopupError> {
    if time_delay < 0 {
        return Err(PopupError::validation("time_delay must not be negative"));
    }
    Ok(())
}

fn validate_pages(pages: Vec<String>) -> Result<DisplayPages, PopupError> {
    let pages = DisplayPages::new(pages);
    if pages.is_empty() {
        return Err(PopupError::validation("display_pages must list at least one page"));
    }
    Ok(pages)
}
