use std::collections::BTreeMap;

use serde::Serialize;

use super::paper;
use super::qr_codes::{self, QrImage};
use crate::beaches_api::{AlertDetails, BeachSummary, RecentMeasurement};
use crate::db::entities::{alert, location};
use crate::db::enums::{Classification, Orientation, PosterLanguage, PosterSize, TemplateCode};

/// Label keys looked up under `poster.` in the locale files.
const LABEL_KEYS: [&str; 27] = [
    "title",
    "water_quality",
    "classification",
    "last_sample",
    "ecoli",
    "enterococci",
    "recent_results",
    "sample_date",
    "result",
    "alert",
    "facilities",
    "toilets",
    "parking",
    "lifeguard",
    "disability_access",
    "blue_flag",
    "dogs_allowed",
    "dogs_not_allowed",
    "available",
    "not_available",
    "more_information",
    "notice",
    "produced_by",
    "mock_data",
    "no_data",
    "headline",
    "guidance",
];

/// Everything needed to lay out one poster.
pub struct PosterInput<'a> {
    pub location: &'a location::Model,
    pub local_authority_name: &'a str,
    pub template: TemplateCode,
    pub size: PosterSize,
    pub orientation: Orientation,
    pub language: PosterLanguage,
    pub epa: &'a BeachSummary,
    /// Stored active alert, carrying the Irish wording EPA does not send.
    pub alert: Option<&'a alert::Model>,
    pub dpi: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PosterContext {
    pub beach_name: String,
    pub beach_name_en: String,
    pub beach_name_ga: String,
    pub classification: Classification,
    pub classification_label: &'static str,
    pub is_identified: bool,
    pub local_authority_name: String,
    pub custom_notification: String,

    pub water_quality_status: String,
    pub last_sample_date: Option<String>,
    pub ecoli_value: Option<f64>,
    pub enterococci_value: Option<f64>,
    pub has_active_alert: bool,
    pub alert_details: Option<AlertDetails>,
    pub recent_measurements: Vec<RecentMeasurement>,

    pub facilities: BTreeMap<&'static str, bool>,
    pub dogs_allowed: bool,
    pub qr_codes: BTreeMap<String, QrImage>,

    pub template_type: TemplateCode,
    pub size: PosterSize,
    pub orientation: Orientation,
    pub language: PosterLanguage,
    pub width_mm: u32,
    pub height_mm: u32,
    pub scale_factor: f32,
    pub qr_size: u32,
    pub dpi: u32,
    pub debug_mode: bool,

    pub labels: BTreeMap<&'static str, String>,
}

fn translate(key: &str, locale: &str, template: TemplateCode) -> String {
    let full_key = match key {
        // Per-template wording
        "headline" | "guidance" => format!("poster.{key}_{}", template.as_str().to_ascii_lowercase()),
        _ => format!("poster.{key}"),
    };
    t!(full_key.as_str(), locale = locale).to_string()
}

/// Poster label in the requested language; bilingual posters get
/// "English / Irish" unless both read the same.
pub fn label(key: &str, language: PosterLanguage, template: TemplateCode) -> String {
    match language {
        PosterLanguage::En => translate(key, "en", template),
        PosterLanguage::Ga => translate(key, "ga", template),
        PosterLanguage::Bilingual => {
            let en = translate(key, "en", template);
            let ga = translate(key, "ga", template);
            if en == ga { en } else { format!("{en} / {ga}") }
        }
    }
}

fn join_languages(en: &str, ga: &str) -> String {
    if en == ga { en.to_string() } else { format!("{en} / {ga}") }
}

/// EPA alert details with title and message worded for the poster language.
fn localised_alert(
    details: Option<&AlertDetails>,
    stored: Option<&alert::Model>,
    language: PosterLanguage,
) -> Option<AlertDetails> {
    let mut details = details?.clone();
    let Some(stored) = stored else {
        return Some(details);
    };
    match language {
        PosterLanguage::En => {}
        PosterLanguage::Ga => {
            details.title = stored.get_title("ga").to_string();
            details.message = stored.get_message("ga").to_string();
        }
        PosterLanguage::Bilingual => {
            details.title = join_languages(stored.get_title("en"), stored.get_title("ga"));
            details.message = join_languages(stored.get_message("en"), stored.get_message("ga"));
        }
    }
    Some(details)
}

impl PosterContext {
    pub fn build(input: &PosterInput<'_>) -> Self {
        let location = input.location;
        let epa = input.epa;
        let (width_mm, height_mm) = paper::dimensions(input.size, input.orientation);
        let qr_size = paper::qr_pixel_size(input.size);

        // A facility is shown when either the local record or EPA lists it.
        let mut facilities = location.facilities();
        for (key, epa_flag) in [
            ("toilets", epa.facilities.toilets),
            ("parking", epa.facilities.parking),
            ("lifeguard", epa.facilities.lifeguard),
            ("disability_access", epa.facilities.disability_access),
            ("blue_flag", epa.facilities.blue_flag),
        ] {
            if let Some(v) = facilities.get_mut(key) {
                *v |= epa_flag;
            }
        }
        let dogs_allowed = location.dogs_allowed && epa.dogs_allowed;
        facilities.insert("dogs_allowed", dogs_allowed);

        let labels = LABEL_KEYS
            .iter()
            .map(|key| (*key, label(key, input.language, input.template)))
            .collect();

        Self {
            beach_name: location.get_name(input.language.as_str()).to_string(),
            beach_name_en: location.name_en.clone(),
            beach_name_ga: location.name_ga.clone(),
            classification: location.classification,
            classification_label: location.classification.label(),
            is_identified: location.is_identified(),
            local_authority_name: input.local_authority_name.to_string(),
            custom_notification: epa.custom_notification.clone(),
            water_quality_status: epa.classification.clone(),
            last_sample_date: epa.last_sample_date.clone(),
            ecoli_value: epa.ecoli_value,
            enterococci_value: epa.enterococci_value,
            has_active_alert: epa.has_active_alerts,
            alert_details: localised_alert(epa.alert_details.as_ref(), input.alert, input.language),
            recent_measurements: epa.recent_measurements.clone(),
            facilities,
            dogs_allowed,
            qr_codes: qr_codes::poster_qr_codes(&location.beaches_ie_id, qr_size),
            template_type: input.template,
            size: input.size,
            orientation: input.orientation,
            language: input.language,
            width_mm,
            height_mm,
            scale_factor: paper::scale_factor(input.size),
            qr_size,
            dpi: input.dpi,
            debug_mode: epa.debug_mode,
            labels,
        }
    }

    /// Translated label, or the key itself when there is none.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Colour keyword for the water-quality status ("excellent", "poor", ...).
    pub fn status_class(&self) -> &'static str {
        let status = self.water_quality_status.to_ascii_lowercase();
        ["excellent", "good", "sufficient", "poor"]
            .into_iter()
            .find(|s| status.contains(s))
            .unwrap_or("unknown")
    }

    /// Whether the alert box belongs on this layout.
    pub fn shows_alert(&self) -> bool {
        self.has_active_alert
            || matches!(self.template_type, TemplateCode::T1B | TemplateCode::T1C | TemplateCode::T2A)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn sample_location() -> location::Model {
        location::Model {
            id: 1,
            local_authority_id: 1,
            beaches_ie_id: "IEEABWC090_0000_0200".to_string(),
            name_en: "Dollymount Strand".to_string(),
            name_ga: "Trá Dhollaimh".to_string(),
            description_en: String::new(),
            description_ga: String::new(),
            classification: Classification::Identified,
            latitude: Some(53.3607),
            longitude: Some(-6.1454),
            is_active: true,
            has_toilets: true,
            has_parking: false,
            has_lifeguard: false,
            has_disability_access: false,
            has_blue_flag: false,
            dogs_allowed: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn sample_summary() -> BeachSummary {
        let mut summary = BeachSummary::empty("IEEABWC090_0000_0200", true);
        summary.classification = "Excellent".to_string();
        summary.last_sample_date = Some("2024-07-01".to_string());
        summary.ecoli_value = Some(10.0);
        summary.enterococci_value = Some(5.0);
        summary.facilities.parking = true;
        summary.dogs_allowed = false;
        summary
    }

    pub(crate) fn sample_input<'a>(
        location: &'a location::Model,
        epa: &'a BeachSummary,
        size: PosterSize,
        language: PosterLanguage,
    ) -> PosterInput<'a> {
        PosterInput {
            location,
            local_authority_name: "Dublin City Council",
            template: TemplateCode::T1A,
            size,
            orientation: Orientation::Portrait,
            language,
            epa,
            alert: None,
            dpi: 300,
        }
    }

    #[test]
    fn builds_context_from_location_and_epa_data() {
        let location = sample_location();
        let epa = sample_summary();
        let ctx = PosterContext::build(&sample_input(&location, &epa, PosterSize::A3, PosterLanguage::En));

        assert_eq!(ctx.beach_name, "Dollymount Strand");
        assert_eq!(ctx.water_quality_status, "Excellent");
        assert_eq!(ctx.status_class(), "excellent");
        assert_eq!((ctx.width_mm, ctx.height_mm), (297, 420));
        assert_eq!(ctx.qr_size, 100);
        assert!(ctx.facilities["toilets"]);
        assert!(ctx.facilities["parking"]);
        assert!(!ctx.facilities["lifeguard"]);
        assert!(!ctx.dogs_allowed);
        assert_eq!(ctx.qr_codes.len(), 5);
        assert!(ctx.debug_mode);
        assert!(!ctx.shows_alert());
    }

    #[test]
    fn irish_name_and_labels() {
        let location = sample_location();
        let epa = sample_summary();
        let ctx = PosterContext::build(&sample_input(&location, &epa, PosterSize::A4, PosterLanguage::Ga));

        assert_eq!(ctx.beach_name, "Trá Dhollaimh");
        assert_eq!(ctx.label("water_quality"), "Cáilíocht an Uisce");
    }

    #[test]
    fn unknown_label_key_is_shown_as_is() {
        let location = sample_location();
        let epa = sample_summary();
        let ctx = PosterContext::build(&sample_input(&location, &epa, PosterSize::A4, PosterLanguage::En));
        let key = String::from("not_a_label");
        assert_eq!(ctx.label(&key), "not_a_label");
    }

    fn alert_summary() -> BeachSummary {
        let mut epa = sample_summary();
        epa.has_active_alerts = true;
        epa.alert_details = Some(AlertDetails {
            alert_type: "advice".to_string(),
            title: "Bathing not advised".to_string(),
            message: "Sewage overflow after heavy rain.".to_string(),
            start_date: Some("2024-07-02".to_string()),
            end_date: None,
            is_season_long: false,
        });
        epa
    }

    fn stored_alert(title_ga: &str, message_ga: &str) -> alert::Model {
        alert::Model {
            id: 7,
            location_id: 1,
            alert_type: crate::db::enums::AlertType::Advisory,
            title_en: "Bathing not advised".to_string(),
            title_ga: title_ga.to_string(),
            message_en: "Sewage overflow after heavy rain.".to_string(),
            message_ga: message_ga.to_string(),
            start_date: Utc::now(),
            end_date: None,
            is_active: true,
            is_season_long: false,
            beaches_ie_id: "77".to_string(),
            raw_data: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn alert_text_follows_poster_language() {
        let location = sample_location();
        let epa = alert_summary();
        let stored = stored_alert("Ní mholtar snámh", "Ró-shreabhadh séarachais.");

        let mut input = sample_input(&location, &epa, PosterSize::A4, PosterLanguage::Ga);
        input.alert = Some(&stored);
        let ga = PosterContext::build(&input).alert_details.unwrap();
        assert_eq!(ga.title, "Ní mholtar snámh");
        assert_eq!(ga.message, "Ró-shreabhadh séarachais.");
        assert_eq!(ga.start_date.as_deref(), Some("2024-07-02"));

        input.language = PosterLanguage::Bilingual;
        let both = PosterContext::build(&input).alert_details.unwrap();
        assert_eq!(both.title, "Bathing not advised / Ní mholtar snámh");

        input.language = PosterLanguage::En;
        let en = PosterContext::build(&input).alert_details.unwrap();
        assert_eq!(en.title, "Bathing not advised");
    }

    #[test]
    fn alert_without_irish_text_keeps_english() {
        let location = sample_location();
        let epa = alert_summary();
        let stored = stored_alert("", "");

        let mut input = sample_input(&location, &epa, PosterSize::A4, PosterLanguage::Bilingual);
        input.alert = Some(&stored);
        let details = PosterContext::build(&input).alert_details.unwrap();
        assert_eq!(details.title, "Bathing not advised");
        assert_eq!(details.message, "Sewage overflow after heavy rain.");

        // no EPA alert, nothing to show
        let quiet = sample_summary();
        let mut input = sample_input(&location, &quiet, PosterSize::A4, PosterLanguage::Ga);
        input.alert = Some(&stored);
        assert!(PosterContext::build(&input).alert_details.is_none());
    }

    #[test]
    fn bilingual_labels_show_both_languages() {
        assert_eq!(
            label("water_quality", PosterLanguage::Bilingual, TemplateCode::T1A),
            "Water Quality / Cáilíocht an Uisce"
        );
        assert_eq!(label("ecoli", PosterLanguage::Bilingual, TemplateCode::T1A), "E. coli");
    }

    #[test]
    fn restriction_templates_always_show_alert_box() {
        let location = sample_location();
        let epa = sample_summary();
        let mut input = sample_input(&location, &epa, PosterSize::A1, PosterLanguage::En);
        input.template = TemplateCode::T1B;
        let ctx = PosterContext::build(&input);
        assert!(ctx.shows_alert());
        assert_eq!(ctx.scale_factor, 1.0);
    }
}
