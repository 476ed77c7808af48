use serde::{Deserialize, Serialize};

use crate::beaches_api::BeachSummary;
use crate::db::entities::{poster, poster_section, poster_template};
use crate::db::enums::{Orientation, PosterLanguage, PosterSize, SectionType, TemplateCode};
use crate::db::services::location_service::MapPoint;
use crate::db::services::poster_service::PosterListItem;

#[derive(Debug, Serialize)]
pub struct TemplateOption {
    pub id: i32,
    pub code: TemplateCode,
    pub name: String,
    pub description: String,
}

impl From<poster_template::Model> for TemplateOption {
    fn from(t: poster_template::Model) -> Self {
        Self { id: t.id, code: t.code, name: t.name, description: t.description }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommended_template: TemplateCode,
    pub recommendation_reason: String,
    pub can_override: bool,
    pub templates: Vec<TemplateOption>,
    pub epa_data: BeachSummary,
}

fn default_size() -> PosterSize {
    PosterSize::A1
}

fn default_orientation() -> Orientation {
    Orientation::Portrait
}

fn default_language() -> PosterLanguage {
    PosterLanguage::En
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePosterRequest {
    pub location_id: i32,
    /// Template code, e.g. "1B".
    pub template: String,
    #[serde(default = "default_size")]
    pub size: PosterSize,
    #[serde(default = "default_orientation")]
    pub orientation: Orientation,
    #[serde(default = "default_language")]
    pub language: PosterLanguage,
    /// Code the recommendation endpoint suggested, if the client showed one.
    #[serde(default)]
    pub recommended_template: Option<String>,
    #[serde(default)]
    pub override_reason: String,
    #[serde(default)]
    pub custom_notification: String,
}

#[derive(Debug, Deserialize)]
pub struct SectionRequest {
    pub section_type: SectionType,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    #[serde(flatten)]
    pub poster: poster::Model,
    pub filename: String,
    pub download_url: String,
}

impl PosterResponse {
    pub fn new(poster: poster::Model) -> Self {
        let filename = poster_file_name(&poster.pdf_file);
        let download_url = format!("/api/posters/{}/download", poster.id);
        Self { poster, filename, download_url }
    }
}

/// File name part of a stored relative path.
pub fn poster_file_name(pdf_file: &str) -> String {
    pdf_file.rsplit('/').next().unwrap_or_default().to_string()
}

#[derive(Debug, Serialize)]
pub struct PosterDetailResponse {
    #[serde(flatten)]
    pub poster: PosterResponse,
    pub location_name: String,
    pub template_code: Option<TemplateCode>,
    pub recommended_template_code: Option<TemplateCode>,
    pub sections: Vec<poster_section::Model>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub map_data: Vec<MapPoint>,
    pub recent_posters: Vec<PosterListItem>,
    pub location_count: u64,
    pub poster_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub size: Option<String>,
    pub language: Option<PosterLanguage>,
}
