//! `SeaORM` Entity for popups

use async_trait::async_trait;
use popups_core::DBDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "popups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Identity-provider id of the site owner; no local users table
    pub owner_id: i32,
    pub type_id: i32,
    pub layout_type_id: i32,
    pub created_at: DBDateTime,
    pub updated_at: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::popup_types::Entity",
        from = "Column::TypeId",
        to = "super::popup_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PopupType,
    #[sea_orm(
        belongs_to = "super::popup_layout_types::Entity",
        from = "Column::LayoutTypeId",
        to = "super::popup_layout_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    LayoutType,
    #[sea_orm(has_many = "super::popup_variants::Entity")]
    Variants,
    #[sea_orm(has_many = "super::popup_analytics::Entity")]
    Analytics,
}

impl Related<super::popup_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PopupType.def()
    }
}

impl Related<super::popup_layout_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LayoutType.def()
    }
}

impl Related<super::popup_variants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
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
