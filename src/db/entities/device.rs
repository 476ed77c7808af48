use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::DeviceType;

/// A sign or kiosk reading the public location API.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub local_authority_id: i32,
    pub device_type: DeviceType,
    pub is_active: bool,
    pub last_seen: Option<ChronoDateTimeUtc>,
    pub metadata: Json,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::local_authority::Entity",
        from = "Column::LocalAuthorityId",
        to = "super::local_authority::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    LocalAuthority,
    #[sea_orm(has_many = "super::device_token::Entity")]
    Tokens,
    #[sea_orm(has_many = "super::device_location::Entity")]
    DeviceLocations,
}

impl Related<super::local_authority::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalAuthority.def()
    }
}

impl Related<super::device_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        super::device_location::Relation::Location.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::device_location::Relation::Device.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
