use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pdf_generation::text::strip_html;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facilities {
    pub toilets: bool,
    pub parking: bool,
    pub lifeguard: bool,
    pub disability_access: bool,
    pub blue_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMeasurement {
    pub date: String,
    pub ecoli: Option<f64>,
    pub enterococci: Option<f64>,
    pub quality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDetails {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub title: String,
    pub message: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_season_long: bool,
}

/// Everything a poster needs from beaches.ie, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeachSummary {
    pub beach_id: String,
    pub beach_name: String,
    pub beach_description: String,
    pub classification: String,
    pub classification_year: Option<i32>,
    pub last_sample_date: Option<String>,
    pub last_sample_status: String,
    pub ecoli_value: Option<f64>,
    pub enterococci_value: Option<f64>,
    pub recent_measurements: Vec<RecentMeasurement>,
    pub has_active_alerts: bool,
    pub alert_details: Option<AlertDetails>,
    pub facilities: Facilities,
    pub dogs_allowed: bool,
    pub short_term_pollution_risk: bool,
    pub fetched_at: DateTime<Utc>,
    pub debug_mode: bool,
    #[serde(default)]
    pub custom_notification: String,
}

/// First present key among `keys`.
fn field<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

fn text(obj: &Value, keys: &[&str]) -> String {
    match field(obj, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_text(obj: &Value, keys: &[&str]) -> Option<String> {
    Some(text(obj, keys)).filter(|s| !s.is_empty())
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn number(obj: &Value, keys: &[&str]) -> Option<f64> {
    match field(obj, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(obj: &Value, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => Some(matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "1")),
        Value::Null => None,
        other => Some(!other.as_array().is_some_and(Vec::is_empty)),
    }
}

impl RecentMeasurement {
    pub fn from_value(m: &Value) -> Self {
        Self {
            date: text(m, &["sample_date", "date"]),
            ecoli: number(m, &["ecoli", "ecoli_value"]),
            enterococci: number(m, &["enterococci", "enterococci_value"]),
            quality: text(m, &["status", "quality"]),
        }
    }
}

impl AlertDetails {
    pub fn from_value(a: &Value) -> Self {
        Self {
            alert_type: optional_text(a, &["type"]).unwrap_or_else(|| "NOTICE".to_string()),
            title: text(a, &["title"]),
            message: text(a, &["message"]),
            start_date: optional_text(a, &["start_date"]),
            end_date: optional_text(a, &["end_date"]),
            is_season_long: flag(a, "is_season_long").unwrap_or(false),
        }
    }
}

impl BeachSummary {
    /// An empty summary, used when upstream returned nothing at all.
    pub fn empty(beach_id: &str, debug_mode: bool) -> Self {
        Self {
            beach_id: beach_id.to_string(),
            beach_name: String::new(),
            beach_description: String::new(),
            classification: String::new(),
            classification_year: None,
            last_sample_date: None,
            last_sample_status: String::new(),
            ecoli_value: None,
            enterococci_value: None,
            recent_measurements: Vec::new(),
            has_active_alerts: false,
            alert_details: None,
            facilities: Facilities::default(),
            dogs_allowed: true,
            short_term_pollution_risk: false,
            fetched_at: Utc::now(),
            debug_mode,
            custom_notification: String::new(),
        }
    }

    /// Builds the summary from raw upstream documents. Keys accept the
    /// aliases beaches.ie has used over time (`name`/`beach_name`,
    /// `sample_date`/`date`, `status`/`quality`, `ecoli`/`ecoli_value`,
    /// `enterococci`/`enterococci_value`).
    pub fn from_parts(
        beach_id: &str,
        location: Option<&Value>,
        measurements: &[Value],
        alerts: &[Value],
        debug_mode: bool,
    ) -> Self {
        let mut summary = Self::empty(beach_id, debug_mode);

        if let Some(loc) = location {
            summary.beach_name = text(loc, &["name", "beach_name"]);
            summary.beach_description = strip_html(&text(loc, &["description"]));
            summary.classification = text(loc, &["classification"]);
            summary.classification_year = number(loc, &["classification_year"]).map(|y| y as i32);

            if let Some(f) = loc.get("facilities").filter(|f| f.is_object()) {
                let facilities = &mut summary.facilities;
                facilities.toilets = flag(f, "toilets").unwrap_or(facilities.toilets);
                facilities.parking = flag(f, "parking").unwrap_or(facilities.parking);
                facilities.lifeguard = flag(f, "lifeguard").unwrap_or(facilities.lifeguard);
                facilities.disability_access =
                    flag(f, "disability_access").unwrap_or(facilities.disability_access);
                facilities.blue_flag = flag(f, "blue_flag").unwrap_or(facilities.blue_flag);
            }

            summary.dogs_allowed = flag(loc, "dogs_allowed").unwrap_or(true);
            summary.short_term_pollution_risk =
                flag(loc, "short_term_pollution_risk").unwrap_or(false);
        }

        if let Some(latest) = measurements.first() {
            summary.last_sample_date = optional_text(latest, &["sample_date", "date"]);
            summary.last_sample_status = text(latest, &["status", "quality"]);
            summary.ecoli_value = number(latest, &["ecoli", "ecoli_value"]);
            summary.enterococci_value = number(latest, &["enterococci", "enterococci_value"]);
            summary.recent_measurements = measurements
                .iter()
                .take(5)
                .map(RecentMeasurement::from_value)
                .collect();
        }

        if let Some(primary) = alerts.first() {
            summary.has_active_alerts = true;
            summary.alert_details = Some(AlertDetails::from_value(primary));
        }

        summary
    }

    pub fn alert_is_season_long(&self) -> bool {
        self.alert_details.as_ref().is_some_and(|a| a.is_season_long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_are_accepted() {
        let location = json!({
            "beach_name": "Seapoint",
            "description": "<p>Rocky <b>shore</b></p>",
            "classification": "Good Quality",
            "classification_year": 2023,
            "facilities": {"toilets": true, "parking": 1, "unknown": true},
            "dogs_allowed": false
        });
        let measurements = vec![
            json!({"date": "2024-06-01", "quality": "Good", "ecoli_value": "120", "enterococci_value": 60}),
            json!({"sample_date": "2024-05-25", "status": "Excellent", "ecoli": 20, "enterococci": 10}),
        ];

        let summary = BeachSummary::from_parts("IE_X", Some(&location), &measurements, &[], false);

        assert_eq!(summary.beach_name, "Seapoint");
        assert_eq!(summary.beach_description, "Rocky shore");
        assert_eq!(summary.classification_year, Some(2023));
        assert!(summary.facilities.toilets);
        assert!(summary.facilities.parking);
        assert!(!summary.facilities.lifeguard);
        assert!(!summary.dogs_allowed);
        assert_eq!(summary.last_sample_date.as_deref(), Some("2024-06-01"));
        assert_eq!(summary.last_sample_status, "Good");
        assert_eq!(summary.ecoli_value, Some(120.0));
        assert_eq!(summary.enterococci_value, Some(60.0));
        assert_eq!(summary.recent_measurements[1].quality, "Excellent");
        assert!(!summary.has_active_alerts);
        assert!(summary.alert_details.is_none());
    }

    #[test]
    fn first_alert_becomes_primary() {
        let alerts = vec![
            json!({"title": "Swim ban", "message": "Do not swim", "is_season_long": true, "start_date": "2024-06-01"}),
            json!({"type": "ADVISORY", "title": "Other"}),
        ];
        let summary = BeachSummary::from_parts("IE_X", None, &[], &alerts, true);

        assert!(summary.has_active_alerts);
        assert!(summary.alert_is_season_long());
        let details = summary.alert_details.unwrap();
        assert_eq!(details.alert_type, "NOTICE");
        assert_eq!(details.title, "Swim ban");
        assert_eq!(details.end_date, None);
        assert!(summary.debug_mode);
        assert!(summary.dogs_allowed);
    }

    #[test]
    fn only_five_recent_measurements() {
        let measurements: Vec<Value> = (1..=8)
            .map(|d| json!({"sample_date": format!("2024-07-0{d}"), "quality": "Good"}))
            .collect();
        let summary = BeachSummary::from_parts("IE_X", None, &measurements, &[], false);
        assert_eq!(summary.recent_measurements.len(), 5);
    }
}
