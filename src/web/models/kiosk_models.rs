use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::entities::{alert, location, water_quality_data};
use crate::db::enums::{AlertType, Classification, QualityStatus};

/// `{count, next, previous, results}` page returned to devices.
#[derive(Debug, Serialize)]
pub struct KioskPage<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct KioskLocation {
    pub id: i32,
    pub name_en: String,
    pub name_ga: String,
    pub beaches_ie_id: String,
    pub classification: Classification,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub has_alert: bool,
    pub quality_status: Option<QualityStatus>,
}

impl KioskLocation {
    pub fn new(location: location::Model, has_alert: bool, quality_status: Option<QualityStatus>) -> Self {
        Self {
            id: location.id,
            name_en: location.name_en,
            name_ga: location.name_ga,
            beaches_ie_id: location.beaches_ie_id,
            classification: location.classification,
            latitude: location.latitude,
            longitude: location.longitude,
            has_alert,
            quality_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KioskWaterQuality {
    pub id: i32,
    pub sample_date: NaiveDate,
    pub ecoli_value: Option<f64>,
    pub enterococci_value: Option<f64>,
    pub quality_status: QualityStatus,
    pub classification_year: Option<i32>,
    pub is_current: bool,
}

impl From<water_quality_data::Model> for KioskWaterQuality {
    fn from(m: water_quality_data::Model) -> Self {
        Self {
            id: m.id,
            sample_date: m.sample_date,
            ecoli_value: m.ecoli_value,
            enterococci_value: m.enterococci_value,
            quality_status: m.quality_status,
            classification_year: m.classification_year,
            is_current: m.is_current,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KioskAlert {
    pub id: i32,
    pub alert_type: AlertType,
    pub title_en: String,
    pub title_ga: String,
    pub message_en: String,
    pub message_ga: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_season_long: bool,
}

impl From<alert::Model> for KioskAlert {
    fn from(a: alert::Model) -> Self {
        Self {
            id: a.id,
            alert_type: a.alert_type,
            title_en: a.title_en,
            title_ga: a.title_ga,
            message_en: a.message_en,
            message_ga: a.message_ga,
            start_date: a.start_date,
            end_date: a.end_date,
            is_active: a.is_active,
            is_season_long: a.is_season_long,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KioskLocationDetail {
    pub id: i32,
    pub name_en: String,
    pub name_ga: String,
    pub beaches_ie_id: String,
    pub classification: Classification,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub local_authority_name: String,
    pub is_active: bool,
    pub current_water_quality: Option<KioskWaterQuality>,
    pub active_alerts: Vec<KioskAlert>,
    pub facilities: BTreeMap<&'static str, bool>,
}
