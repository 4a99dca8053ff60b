//! `SeaORM` Entity for popup variants (A/B test alternatives)

use async_trait::async_trait;
use popups_core::DBDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};

use crate::types::PopupContent;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "popup_variants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub popup_id: i32,
    pub name: String,
    pub content: PopupContent,
    /// At most one variant per popup carries this flag
    pub is_primary: bool,
    pub created_at: DBDateTime,
    pub updated_at: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::popups::Entity",
        from = "Column::PopupId",
        to = "super::popups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Popup,
    #[sea_orm(has_many = "super::popup_schedules::Entity")]
    Schedules,
    #[sea_orm(has_many = "super::popup_analytics::Entity")]
    Analytics,
}

impl Related<super::popups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Popup.def()
    }
}

impl Related<super::popup_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl Related<super::popup_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analytics.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();

        if insert {
            if self.created_at.is_not_set() {
                self.created_at = Set(now);
            }
            if self.updated_at.is_not_set() {
                self.updated_at = Set(now);
            }
        } else {
            self.updated_at = Set(now);
        }

        Ok(self)
    }
}
