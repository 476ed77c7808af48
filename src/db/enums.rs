use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EPA designation of a bathing water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "classification_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    #[sea_orm(string_value = "IDENTIFIED")]
    Identified,
    #[sea_orm(string_value = "NON_IDENTIFIED")]
    NonIdentified,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Identified => "Identified Bathing Water",
            Classification::NonIdentified => "Non-Identified Bathing Water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "user_role_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "LA_ADMIN")]
    LaAdmin,
    #[sea_orm(string_value = "OFFICER")]
    Officer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "quality_status_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityStatus {
    #[sea_orm(string_value = "EXCELLENT")]
    Excellent,
    #[sea_orm(string_value = "GOOD")]
    Good,
    #[sea_orm(string_value = "SUFFICIENT")]
    Sufficient,
    #[sea_orm(string_value = "POOR")]
    Poor,
    #[sea_orm(string_value = "NOT_CLASSIFIED")]
    NotClassified,
}

impl QualityStatus {
    /// Maps an EPA sample label ("Excellent", "good", ...) onto a status.
    pub fn from_epa_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "excellent" => QualityStatus::Excellent,
            "good" => QualityStatus::Good,
            "sufficient" => QualityStatus::Sufficient,
            "poor" => QualityStatus::Poor,
            _ => QualityStatus::NotClassified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "alert_type_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    #[sea_orm(string_value = "NOTICE")]
    Notice,
    #[sea_orm(string_value = "ADVISORY")]
    Advisory,
    #[sea_orm(string_value = "RESTRICTION")]
    Restriction,
    #[sea_orm(string_value = "CLOSURE")]
    Closure,
}

impl AlertType {
    pub fn from_epa_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "ADVISORY" => AlertType::Advisory,
            "RESTRICTION" => AlertType::Restriction,
            "CLOSURE" => AlertType::Closure,
            _ => AlertType::Notice,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid template code: {0}")]
pub struct InvalidTemplateCode(pub String);

/// The five EPA poster layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "template_code_enum")]
pub enum TemplateCode {
    /// Identified, no restrictions.
    #[sea_orm(string_value = "1A")]
    #[serde(rename = "1A")]
    T1A,
    /// Identified, temporary restriction.
    #[sea_orm(string_value = "1B")]
    #[serde(rename = "1B")]
    T1B,
    /// Identified, season-long restriction.
    #[sea_orm(string_value = "1C")]
    #[serde(rename = "1C")]
    T1C,
    /// Non-identified, with restrictions.
    #[sea_orm(string_value = "2A")]
    #[serde(rename = "2A")]
    T2A,
    /// Non-identified, no restrictions.
    #[sea_orm(string_value = "2B")]
    #[serde(rename = "2B")]
    T2B,
}

impl TemplateCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCode::T1A => "1A",
            TemplateCode::T1B => "1B",
            TemplateCode::T1C => "1C",
            TemplateCode::T2A => "2A",
            TemplateCode::T2B => "2B",
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            TemplateCode::T1A | TemplateCode::T1B | TemplateCode::T1C => Classification::Identified,
            TemplateCode::T2A | TemplateCode::T2B => Classification::NonIdentified,
        }
    }
}

impl FromStr for TemplateCode {
    type Err = InvalidTemplateCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1A" => Ok(TemplateCode::T1A),
            "1B" => Ok(TemplateCode::T1B),
            "1C" => Ok(TemplateCode::T1C),
            "2A" => Ok(TemplateCode::T2A),
            "2B" => Ok(TemplateCode::T2B),
            other => Err(InvalidTemplateCode(other.to_string())),
        }
    }
}

impl fmt::Display for TemplateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "poster_type_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosterType {
    #[sea_orm(string_value = "FULL")]
    Full,
    #[sea_orm(string_value = "SECTION")]
    Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "poster_size_enum")]
pub enum PosterSize {
    #[sea_orm(string_value = "A1")]
    A1,
    #[sea_orm(string_value = "A3")]
    A3,
    #[sea_orm(string_value = "A4")]
    A4,
    #[sea_orm(string_value = "A5")]
    A5,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::A1 => "A1",
            PosterSize::A3 => "A3",
            PosterSize::A4 => "A4",
            PosterSize::A5 => "A5",
        }
    }
}

impl fmt::Display for PosterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "orientation_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    #[sea_orm(string_value = "PORTRAIT")]
    Portrait,
    #[sea_orm(string_value = "LANDSCAPE")]
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "poster_language_enum")]
#[serde(rename_all = "lowercase")]
pub enum PosterLanguage {
    #[sea_orm(string_value = "en")]
    En,
    #[sea_orm(string_value = "ga")]
    Ga,
    #[sea_orm(string_value = "bilingual")]
    Bilingual,
}

impl PosterLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterLanguage::En => "en",
            PosterLanguage::Ga => "ga",
            PosterLanguage::Bilingual => "bilingual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "section_type_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionType {
    #[sea_orm(string_value = "WATER_QUALITY")]
    WaterQuality,
    #[sea_orm(string_value = "ALERTS")]
    Alerts,
    #[sea_orm(string_value = "QR_CODE")]
    QrCode,
    #[sea_orm(string_value = "HEADER")]
    Header,
    #[sea_orm(string_value = "FOOTER")]
    Footer,
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "device_type_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    #[sea_orm(string_value = "DIGITAL_SIGN")]
    DigitalSign,
    #[sea_orm(string_value = "KIOSK")]
    Kiosk,
    #[sea_orm(string_value = "DISPLAY_BOARD")]
    DisplayBoard,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "audit_action_enum")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    #[sea_orm(string_value = "POSTER_GENERATED")]
    PosterGenerated,
    #[sea_orm(string_value = "SECTION_UPDATED")]
    SectionUpdated,
    #[sea_orm(string_value = "USER_LOGIN")]
    UserLogin,
    #[sea_orm(string_value = "USER_LOGOUT")]
    UserLogout,
    #[sea_orm(string_value = "LOCATION_CREATED")]
    LocationCreated,
    #[sea_orm(string_value = "LOCATION_MODIFIED")]
    LocationModified,
    #[sea_orm(string_value = "ALERT_RECEIVED")]
    AlertReceived,
    #[sea_orm(string_value = "DATA_SYNC")]
    DataSync,
    #[sea_orm(string_value = "USER_CREATED")]
    UserCreated,
    #[sea_orm(string_value = "USER_MODIFIED")]
    UserModified,
    #[sea_orm(string_value = "SETTINGS_CHANGED")]
    SettingsChanged,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
