//! `SeaORM` Entity for popup_analytics counter buckets
//!
//! One row per (variant_id, page_url, device_type); counters only grow.

use popups_core::DBDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::DeviceType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "popup_analytics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub popup_id: i32,
    pub variant_id: i32,
    pub device_type: DeviceType,
    pub page_url: String,
    pub views: i64,
    pub clicks: i64,
    pub conversions: i64,
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
    #[sea_orm(
        belongs_to = "super::popup_variants::Entity",
        from = "Column::VariantId",
        to = "super::popup_variants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Variant,
}

impl Related<super::popups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Popup.def()
    }
}

impl Related<super::popup_variants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
