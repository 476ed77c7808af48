use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::QualityStatus;

/// One EPA sample result. At most one row per location has `is_current` set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "water_quality_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub location_id: i32,
    pub sample_date: Date,
    pub ecoli_value: Option<f64>,
    pub enterococci_value: Option<f64>,
    pub quality_status: QualityStatus,
    pub classification_year: Option<i32>,
    pub is_current: bool,
    pub raw_data: Json,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Location,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
