use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::{Orientation, PosterLanguage, PosterSize, PosterType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub location_id: i32,
    pub template_id: i32,
    pub poster_type: PosterType,
    pub size: PosterSize,
    pub orientation: Orientation,
    pub language: PosterLanguage,
    /// Path of the PDF relative to the media root, empty until written.
    pub pdf_file: String,
    pub recommended_template_id: Option<i32>,
    pub template_was_overridden: bool,
    pub override_reason: String,
    pub custom_notification: String,
    /// EPA summary the poster was rendered from.
    pub water_quality_data: Json,
    pub supplementary_content: Json,
    pub generated_by: Option<i32>,
    pub generated_at: ChronoDateTimeUtc,
    pub published_to_ckan: bool,
    pub ckan_resource_id: String,
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
    #[sea_orm(
        belongs_to = "super::poster_template::Entity",
        from = "Column::TemplateId",
        to = "super::poster_template::Column::Id",
        on_delete = "Restrict",
        on_update = "Cascade"
    )]
    Template,
    #[sea_orm(has_many = "super::poster_section::Entity")]
    Sections,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::poster_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::poster_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
