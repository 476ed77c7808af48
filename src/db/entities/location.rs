use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::enums::Classification;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub local_authority_id: i32,
    #[sea_orm(unique)]
    pub beaches_ie_id: String,
    pub name_en: String,
    pub name_ga: String,
    pub description_en: String,
    pub description_ga: String,
    pub classification: Classification,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub has_toilets: bool,
    pub has_parking: bool,
    pub has_lifeguard: bool,
    pub has_disability_access: bool,
    pub has_blue_flag: bool,
    pub dogs_allowed: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
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
    #[sea_orm(has_many = "super::water_quality_data::Entity")]
    WaterQualityData,
    #[sea_orm(has_many = "super::alert::Entity")]
    Alerts,
    #[sea_orm(has_many = "super::poster::Entity")]
    Posters,
}

impl Related<super::local_authority::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalAuthority.def()
    }
}

impl Related<super::water_quality_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaterQualityData.def()
    }
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alerts.def()
    }
}

impl Related<super::poster::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Irish name for `ga` when one is recorded, English otherwise.
    pub fn get_name(&self, lang: &str) -> &str {
        if lang == "ga" && !self.name_ga.is_empty() {
            &self.name_ga
        } else {
            &self.name_en
        }
    }

    pub fn is_identified(&self) -> bool {
        self.classification == Classification::Identified
    }

    pub fn facilities(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            ("toilets", self.has_toilets),
            ("parking", self.has_parking),
            ("lifeguard", self.has_lifeguard),
            ("disability_access", self.has_disability_access),
            ("blue_flag", self.has_blue_flag),
            ("dogs_allowed", self.dogs_allowed),
        ])
    }
}
