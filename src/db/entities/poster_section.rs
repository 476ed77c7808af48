use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::SectionType;

/// A partial re-render of one area of a poster.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poster_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub poster_id: i32,
    pub section_type: SectionType,
    pub pdf_file: String,
    pub content: Json,
    pub generated_by: Option<i32>,
    pub generated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::poster::Entity",
        from = "Column::PosterId",
        to = "super::poster::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Poster,
}

impl Related<super::poster::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Poster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
