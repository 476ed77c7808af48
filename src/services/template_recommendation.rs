//! Chooses the EPA poster template for a bathing water.

use serde::Serialize;

use crate::db::enums::{Classification, TemplateCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecommendation {
    pub recommended: TemplateCode,
    pub reason: &'static str,
    /// Officers may always pick another template of the same classification.
    pub can_override: bool,
}

/// Recommendation from the classification and the active alert state.
/// `alert_is_season_long` only matters for identified waters with an alert.
pub fn recommend_template(
    classification: Classification,
    has_active_alert: bool,
    alert_is_season_long: bool,
) -> TemplateRecommendation {
    let (recommended, reason) = match (classification, has_active_alert, alert_is_season_long) {
        (Classification::Identified, false, _) => {
            (TemplateCode::T1A, "Identified bathing water with no restrictions")
        }
        (Classification::Identified, true, true) => {
            (TemplateCode::T1C, "Identified bathing water with season-long restriction")
        }
        (Classification::Identified, true, false) => {
            (TemplateCode::T1B, "Identified bathing water with temporary restriction")
        }
        (Classification::NonIdentified, true, _) => {
            (TemplateCode::T2A, "Non-identified water with restrictions")
        }
        (Classification::NonIdentified, false, _) => {
            (TemplateCode::T2B, "Non-identified water with no restrictions")
        }
    };
    TemplateRecommendation { recommended, reason, can_override: true }
}

pub fn templates_for_classification(classification: Classification) -> &'static [TemplateCode] {
    match classification {
        Classification::Identified => &[TemplateCode::T1A, TemplateCode::T1B, TemplateCode::T1C],
        Classification::NonIdentified => &[TemplateCode::T2A, TemplateCode::T2B],
    }
}
