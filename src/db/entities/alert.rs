use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::AlertType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub location_id: i32,
    pub alert_type: AlertType,
    pub title_en: String,
    pub title_ga: String,
    pub message_en: String,
    pub message_ga: String,
    pub start_date: ChronoDateTimeUtc,
    pub end_date: Option<ChronoDateTimeUtc>,
    pub is_active: bool,
    pub is_season_long: bool,
    /// Alert identifier upstream, empty for locally entered alerts.
    pub beaches_ie_id: String,
    pub raw_data: Json,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
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

impl Model {
    pub fn get_title(&self, lang: &str) -> &str {
        if lang == "ga" && !self.title_ga.is_empty() {
            &self.title_ga
        } else {
            &self.title_en
        }
    }

    pub fn get_message(&self, lang: &str) -> &str {
        if lang == "ga" && !self.message_ga.is_empty() {
            &self.message_ga
        } else {
            &self.message_en
        }
    }
}
