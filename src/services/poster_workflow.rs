//! Poster generation and everything that happens to a poster afterwards:
//! section re-renders, HTML previews, downloads and CKAN publishing.

use std::path::PathBuf;

use sea_orm::{DbErr, EntityTrait};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::beaches_api::BeachSummary;
use crate::ckan::CkanError;
use crate::db::entities::{alert, location, poster, poster_section, poster_template, prelude::Poster};
use crate::db::enums::{
    AuditAction, InvalidTemplateCode, PosterLanguage, PosterSize, SectionType, TemplateCode,
};
use crate::db::services::{audit_service, location_service, poster_service, template_service};
use crate::pdf_generation::{PdfError, PosterInput, save_pdf};
use crate::services::template_recommendation::{
    TemplateRecommendation, recommend_template, templates_for_classification,
};
use crate::web::AppState;
use crate::web::client_info::ClientInfo;
use crate::web::error::AppError;
use crate::web::models::CurrentOrganisation;
use crate::web::models::poster_models::GeneratePosterRequest;

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error(transparent)]
    InvalidTemplate(#[from] InvalidTemplateCode),
    #[error("Location {0} not found")]
    LocationNotFound(i32),
    #[error("Location {0} is not active")]
    LocationInactive(i32),
    #[error("Template {0} not found")]
    TemplateNotFound(TemplateCode),
    #[error("Template {0} is not active")]
    TemplateInactive(TemplateCode),
    #[error("Template {template} is not valid for {classification} locations")]
    ClassificationMismatch {
        template: TemplateCode,
        classification: &'static str,
    },
    #[error("Please provide a reason for overriding the recommended template.")]
    OverrideReasonRequired,
    #[error("Poster {0} not found")]
    PosterNotFound(i32),
    #[error("PDF file not found.")]
    MissingFile,
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("CKAN publishing is not configured.")]
    CkanNotConfigured,
    #[error("CKAN upload failed: {0}")]
    Ckan(CkanError),
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CkanError> for PosterError {
    fn from(err: CkanError) -> Self {
        match err {
            CkanError::NotConfigured => PosterError::CkanNotConfigured,
            other => PosterError::Ckan(other),
        }
    }
}

impl From<PosterError> for AppError {
    fn from(err: PosterError) -> Self {
        match err {
            PosterError::DbErr(e) => e.into(),
            PosterError::InvalidTemplate(_)
            | PosterError::LocationInactive(_)
            | PosterError::TemplateInactive(_)
            | PosterError::ClassificationMismatch { .. }
            | PosterError::OverrideReasonRequired
            | PosterError::Pdf(PdfError::InvalidSize(_)) => AppError::InvalidInput(err.to_string()),
            PosterError::LocationNotFound(_)
            | PosterError::TemplateNotFound(_)
            | PosterError::PosterNotFound(_)
            | PosterError::MissingFile => AppError::NotFound(err.to_string()),
            PosterError::CkanNotConfigured => AppError::ServiceUnavailable(err.to_string()),
            PosterError::Ckan(_) => AppError::ServiceUnavailable(err.to_string()),
            PosterError::Pdf(_) | PosterError::Io(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Options of a section or preview render that are not stored on a poster.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOverrides {
    pub size: Option<PosterSize>,
    pub language: Option<PosterLanguage>,
}

async fn scoped_location(
    state: &AppState,
    org: &CurrentOrganisation,
    location_id: i32,
) -> Result<location::Model, PosterError> {
    location_service::get_location(&state.db_pool, org.id(), location_id)
        .await?
        .filter(|l| org.user.can_access_location(l))
        .ok_or(PosterError::LocationNotFound(location_id))
}

async fn scoped_poster(
    state: &AppState,
    org: &CurrentOrganisation,
    poster_id: i32,
) -> Result<poster::Model, PosterError> {
    poster_service::get_poster(&state.db_pool, org.id(), poster_id)
        .await?
        .ok_or(PosterError::PosterNotFound(poster_id))
}

async fn poster_template(
    state: &AppState,
    poster: &poster::Model,
) -> Result<poster_template::Model, PosterError> {
    template_service::get_template(&state.db_pool, poster.template_id)
        .await?
        .ok_or(PosterError::PosterNotFound(poster.id))
}

/// Most recent active alert stored for the location.
async fn primary_alert(
    state: &AppState,
    location: &location::Model,
) -> Result<Option<alert::Model>, PosterError> {
    Ok(location_service::active_alerts(&state.db_pool, location.id).await?.into_iter().next())
}

/// Recommendation for a location from its live EPA data.
pub async fn recommend_for_location(
    state: &AppState,
    org: &CurrentOrganisation,
    location_id: i32,
) -> Result<(TemplateRecommendation, Vec<poster_template::Model>, BeachSummary), PosterError> {
    let location = scoped_location(state, org, location_id).await?;
    let epa = state.beach_source.format_for_poster(&location.beaches_ie_id).await;

    let recommendation = recommend_template(
        location.classification,
        epa.has_active_alerts,
        epa.alert_is_season_long(),
    );
    let templates =
        template_service::active_templates_for(&state.db_pool, location.classification).await?;
    Ok((recommendation, templates, epa))
}

/// Validates the request, renders the poster, stores it and audits it.
pub async fn generate_poster(
    state: &AppState,
    org: &CurrentOrganisation,
    client: &ClientInfo,
    req: GeneratePosterRequest,
) -> Result<poster::Model, PosterError> {
    let db = &state.db_pool;
    let code: TemplateCode = req.template.parse()?;

    let location = scoped_location(state, org, req.location_id).await?;
    if !location.is_active {
        return Err(PosterError::LocationInactive(location.id));
    }

    let template = template_service::get_by_code(db, code)
        .await?
        .ok_or(PosterError::TemplateNotFound(code))?;
    if !template.is_active {
        return Err(PosterError::TemplateInactive(code));
    }
    if !templates_for_classification(location.classification).contains(&code) {
        return Err(PosterError::ClassificationMismatch {
            template: code,
            classification: location.classification.label(),
        });
    }

    let recommended_code = match req.recommended_template.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(raw.parse::<TemplateCode>()?),
        _ => None,
    };
    let overridden = recommended_code.is_some_and(|rec| rec != code);
    let override_reason = req.override_reason.trim().to_string();
    if overridden && override_reason.is_empty() {
        return Err(PosterError::OverrideReasonRequired);
    }
    let recommended_template = match recommended_code {
        Some(rec) => template_service::get_by_code(db, rec).await?,
        None => None,
    };

    let custom_notification = req.custom_notification.trim().to_string();
    let mut epa = state.beach_source.format_for_poster(&location.beaches_ie_id).await;
    epa.custom_notification = custom_notification.clone();
    let stored_alert = primary_alert(state, &location).await?;

    let pdf_bytes = state.generator.generate_poster(PosterInput {
        location: &location,
        local_authority_name: &org.local_authority.name,
        template: code,
        size: req.size,
        orientation: req.orientation,
        language: req.language,
        epa: &epa,
        alert: stored_alert.as_ref(),
        dpi: state.generator.dpi(),
    })?;

    let poster = poster_service::create_poster(
        db,
        poster_service::NewPoster {
            location_id: location.id,
            template_id: template.id,
            size: req.size,
            orientation: req.orientation,
            language: req.language,
            recommended_template_id: recommended_template.as_ref().map(|t| t.id),
            template_was_overridden: overridden,
            override_reason: if overridden { override_reason.clone() } else { String::new() },
            custom_notification: custom_notification.clone(),
            water_quality_data: serde_json::to_value(&epa).unwrap_or(Value::Null),
            generated_by: Some(org.user.id),
        },
    )
    .await?;

    let filename =
        poster_service::poster_filename(&location.name_en, code, req.size, poster.generated_at);
    let relative = format!("posters/{}/{}", poster.generated_at.format("%Y/%m"), filename);
    if let Err(e) = save_pdf(&state.config.media_root().join(&relative), &pdf_bytes).await {
        error!(poster_id = poster.id, error = %e, "Failed to store poster PDF, removing record.");
        if let Err(del) = Poster::delete_by_id(poster.id).exec(db).await {
            error!(poster_id = poster.id, error = %del, "Failed to remove orphaned poster record.");
        }
        return Err(e.into());
    }
    let poster = poster_service::set_pdf_file(db, poster, relative).await?;

    let mut details = Map::new();
    details.insert("template".into(), json!(code));
    details.insert("size".into(), json!(req.size));
    details.insert("language".into(), json!(req.language));
    if overridden {
        details.insert("recommended_template".into(), json!(recommended_code));
        details.insert("override_reason".into(), json!(override_reason));
    }
    if !custom_notification.is_empty() {
        details.insert("custom_notification".into(), json!(custom_notification));
    }
    audit_service::record(
        db,
        client
            .audit(AuditAction::PosterGenerated)
            .user(org.user.id)
            .location(location.id)
            .poster(poster.id)
            .details(Value::Object(details)),
    )
    .await;

    info!(
        poster_id = poster.id,
        location_id = location.id,
        template = %code,
        overridden,
        "Poster generated."
    );
    Ok(poster)
}

/// Snapshot stored on the poster, or a fresh fetch when it cannot be read back.
async fn poster_summary(
    state: &AppState,
    poster: &poster::Model,
    location: &location::Model,
) -> BeachSummary {
    match serde_json::from_value::<BeachSummary>(poster.water_quality_data.clone()) {
        Ok(summary) => summary,
        Err(e) => {
            warn!(poster_id = poster.id, error = %e, "Stored EPA snapshot unreadable, refetching.");
            let mut summary = state.beach_source.format_for_poster(&location.beaches_ie_id).await;
            summary.custom_notification = poster.custom_notification.clone();
            summary
        }
    }
}

/// Re-renders one section of an existing poster from current EPA data.
pub async fn generate_section(
    state: &AppState,
    org: &CurrentOrganisation,
    client: &ClientInfo,
    poster_id: i32,
    section_type: SectionType,
) -> Result<poster_section::Model, PosterError> {
    let db = &state.db_pool;
    let poster = scoped_poster(state, org, poster_id).await?;
    let location = scoped_location(state, org, poster.location_id).await?;
    let template = poster_template(state, &poster).await?;

    let mut epa = state.beach_source.format_for_poster(&location.beaches_ie_id).await;
    epa.custom_notification = poster.custom_notification.clone();
    let stored_alert = primary_alert(state, &location).await?;

    let pdf_bytes = state.generator.generate_section(
        PosterInput {
            location: &location,
            local_authority_name: &org.local_authority.name,
            template: template.code,
            size: poster.size,
            orientation: poster.orientation,
            language: poster.language,
            epa: &epa,
            alert: stored_alert.as_ref(),
            dpi: state.generator.dpi(),
        },
        section_type,
    )?;

    let now = chrono::Utc::now();
    let filename = format!(
        "poster_{}_{}_{}.pdf",
        poster.id,
        section_type.to_string().to_lowercase(),
        now.format("%Y%m%d_%H%M%S")
    );
    let relative = format!("posters/sections/{}/{}", now.format("%Y/%m"), filename);
    save_pdf(&state.config.media_root().join(&relative), &pdf_bytes).await?;

    let section = poster_service::create_section(
        db,
        poster_service::NewSection {
            poster_id: poster.id,
            section_type,
            pdf_file: relative,
            content: serde_json::to_value(&epa).unwrap_or(Value::Null),
            generated_by: Some(org.user.id),
        },
    )
    .await?;

    audit_service::record(
        db,
        client
            .audit(AuditAction::SectionUpdated)
            .user(org.user.id)
            .location(location.id)
            .poster(poster.id)
            .details(json!({ "section_type": section_type, "section_id": section.id })),
    )
    .await;

    info!(poster_id = poster.id, section = %section_type, "Poster section regenerated.");
    Ok(section)
}

/// HTML rendition of a stored poster, optionally at another size or language.
pub async fn render_preview(
    state: &AppState,
    org: &CurrentOrganisation,
    poster_id: i32,
    overrides: RenderOverrides,
) -> Result<String, PosterError> {
    let poster = scoped_poster(state, org, poster_id).await?;
    let location = scoped_location(state, org, poster.location_id).await?;
    let template = poster_template(state, &poster).await?;
    let epa = poster_summary(state, &poster, &location).await;
    let stored_alert = primary_alert(state, &location).await?;

    let ctx = state.generator.build_context(PosterInput {
        location: &location,
        local_authority_name: &org.local_authority.name,
        template: template.code,
        size: overrides.size.unwrap_or(poster.size),
        orientation: poster.orientation,
        language: overrides.language.unwrap_or(poster.language),
        epa: &epa,
        alert: stored_alert.as_ref(),
        dpi: state.generator.dpi(),
    });
    Ok(state.generator.render_html(&ctx)?)
}

fn stored_path(state: &AppState, pdf_file: &str) -> Result<PathBuf, PosterError> {
    if pdf_file.is_empty() {
        return Err(PosterError::MissingFile);
    }
    Ok(state.config.media_root().join(pdf_file))
}

/// Reads the stored PDF of a poster.
pub async fn read_poster_pdf(
    state: &AppState,
    org: &CurrentOrganisation,
    poster_id: i32,
) -> Result<(poster::Model, Vec<u8>), PosterError> {
    let poster = scoped_poster(state, org, poster_id).await?;
    let path = stored_path(state, &poster.pdf_file)?;
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((poster, bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PosterError::MissingFile),
        Err(e) => Err(e.into()),
    }
}

/// Uploads the poster PDF to the configured CKAN package.
pub async fn publish_to_ckan(
    state: &AppState,
    org: &CurrentOrganisation,
    poster_id: i32,
) -> Result<poster::Model, PosterError> {
    if !state.ckan.is_configured() {
        return Err(PosterError::CkanNotConfigured);
    }
    let (poster, bytes) = read_poster_pdf(state, org, poster_id).await?;
    let location = scoped_location(state, org, poster.location_id).await?;
    let template = poster_template(state, &poster).await?;

    let filename = crate::web::models::poster_models::poster_file_name(&poster.pdf_file);
    let resource_id = state
        .ckan
        .upload_resource(
            &format!("{} - {}", location.name_en, template.code),
            &format!("Bathing water information poster for {}", location.name_en),
            &filename,
            bytes,
        )
        .await?;

    let poster = poster_service::mark_published(&state.db_pool, poster, resource_id).await?;
    info!(
        poster_id = poster.id,
        resource_id = %poster.ckan_resource_id,
        package = %state.ckan.package_id(),
        "Poster published to CKAN."
    );
    Ok(poster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::audit_log;
    use crate::db::enums::{Classification, Orientation};
    use crate::db::services::template_service;
    use crate::server::config::ServerConfig;
    use crate::test_support;
    use sea_orm::{ColumnTrait, QueryFilter};
    use std::sync::Arc;

    struct Fixture {
        state: AppState,
        org: CurrentOrganisation,
        client: ClientInfo,
        location: location::Model,
        _media: tempfile::TempDir,
    }

    async fn fixture(classification: Classification) -> Fixture {
        let db = test_support::test_db().await;
        template_service::ensure_templates(&db).await.unwrap();
        let la = test_support::authority(&db, "DCC").await;
        let user = test_support::user(&db, "officer@dublincity.ie", Some(la.id)).await;
        let location =
            test_support::location(&db, la.id, "IEEABWC090_0000_0200", classification).await;

        let media = tempfile::tempdir().unwrap();
        let state = AppState::new(db, Arc::new(ServerConfig::for_tests(media.path()))).unwrap();
        Fixture {
            state,
            org: CurrentOrganisation { user, local_authority: la },
            client: ClientInfo { ip_address: Some("10.0.0.1".into()), user_agent: "test".into() },
            location,
            _media: media,
        }
    }

    fn request(location_id: i32, template: &str) -> GeneratePosterRequest {
        GeneratePosterRequest {
            location_id,
            template: template.to_string(),
            size: PosterSize::A4,
            orientation: Orientation::Portrait,
            language: PosterLanguage::En,
            recommended_template: None,
            override_reason: String::new(),
            custom_notification: String::new(),
        }
    }

    #[tokio::test]
    async fn recommendation_uses_mock_epa_data() {
        let f = fixture(Classification::Identified).await;
        let (rec, templates, epa) =
            recommend_for_location(&f.state, &f.org, f.location.id).await.unwrap();
        assert_eq!(rec.recommended, TemplateCode::T1A);
        assert_eq!(templates.len(), 3);
        assert!(epa.debug_mode);
    }

    #[tokio::test]
    async fn generates_stores_and_audits_a_poster() {
        let f = fixture(Classification::Identified).await;
        let mut req = request(f.location.id, "1b");
        req.recommended_template = Some("1A".into());
        req.override_reason = "  Storm damage  ".into();
        req.custom_notification = "Lifeguards on duty from 11:00".into();

        let poster = generate_poster(&f.state, &f.org, &f.client, req).await.unwrap();
        assert!(poster.template_was_overridden);
        assert_eq!(poster.override_reason, "Storm damage");
        assert!(poster.recommended_template_id.is_some());
        assert!(poster.pdf_file.starts_with("posters/"));
        assert_eq!(poster.water_quality_data["custom_notification"], "Lifeguards on duty from 11:00");

        let bytes = tokio::fs::read(f.state.config.media_root().join(&poster.pdf_file))
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let entry = audit_log::Entity::find()
            .filter(audit_log::Column::PosterId.eq(poster.id))
            .one(&f.state.db_pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.action, AuditAction::PosterGenerated);
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(entry.details["template"], "1B");
        assert_eq!(entry.details["recommended_template"], "1A");
        assert_eq!(entry.details["override_reason"], "Storm damage");
    }

    #[tokio::test]
    async fn matching_recommendation_is_not_an_override() {
        let f = fixture(Classification::Identified).await;
        let mut req = request(f.location.id, "1A");
        req.recommended_template = Some("1a".into());
        req.override_reason = "ignored".into();

        let poster = generate_poster(&f.state, &f.org, &f.client, req).await.unwrap();
        assert!(!poster.template_was_overridden);
        assert!(poster.override_reason.is_empty());
    }

    #[tokio::test]
    async fn rejects_invalid_requests() {
        let f = fixture(Classification::Identified).await;

        let mut missing_reason = request(f.location.id, "1C");
        missing_reason.recommended_template = Some("1A".into());
        let err = generate_poster(&f.state, &f.org, &f.client, missing_reason).await.unwrap_err();
        assert!(matches!(err, PosterError::OverrideReasonRequired));

        let err = generate_poster(&f.state, &f.org, &f.client, request(f.location.id, "2A"))
            .await
            .unwrap_err();
        assert!(matches!(err, PosterError::ClassificationMismatch { .. }));

        let err = generate_poster(&f.state, &f.org, &f.client, request(f.location.id, "3Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, PosterError::InvalidTemplate(_)));

        let other = test_support::authority(&f.state.db_pool, "FCC").await;
        let foreign =
            test_support::location(&f.state.db_pool, other.id, "IEEAFOREIGN", Classification::Identified)
                .await;
        let err = generate_poster(&f.state, &f.org, &f.client, request(foreign.id, "1A"))
            .await
            .unwrap_err();
        assert!(matches!(err, PosterError::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn user_outside_the_authority_cannot_reach_its_locations() {
        let f = fixture(Classification::Identified).await;
        let mut detached = f.org.user.clone();
        detached.local_authority_id = None;
        let org = CurrentOrganisation { user: detached, local_authority: f.org.local_authority.clone() };

        let err = recommend_for_location(&f.state, &org, f.location.id).await.unwrap_err();
        assert!(matches!(err, PosterError::LocationNotFound(id) if id == f.location.id));
        let err = generate_poster(&f.state, &org, &f.client, request(f.location.id, "1A"))
            .await
            .unwrap_err();
        assert!(matches!(err, PosterError::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn sections_previews_and_downloads() {
        let f = fixture(Classification::NonIdentified).await;
        let poster = generate_poster(&f.state, &f.org, &f.client, request(f.location.id, "2B"))
            .await
            .unwrap();

        let section =
            generate_section(&f.state, &f.org, &f.client, poster.id, SectionType::QrCode)
                .await
                .unwrap();
        assert!(section.pdf_file.starts_with("posters/sections/"));
        assert!(f.state.config.media_root().join(&section.pdf_file).exists());

        let html = render_preview(
            &f.state,
            &f.org,
            poster.id,
            RenderOverrides { size: Some(PosterSize::A3), language: None },
        )
        .await
        .unwrap();
        assert!(html.contains("297mm 420mm"));

        let (_, bytes) = read_poster_pdf(&f.state, &f.org, poster.id).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        tokio::fs::remove_file(f.state.config.media_root().join(&poster.pdf_file))
            .await
            .unwrap();
        let err = read_poster_pdf(&f.state, &f.org, poster.id).await.unwrap_err();
        assert!(matches!(err, PosterError::MissingFile));
    }

    #[tokio::test]
    async fn publishing_requires_ckan_configuration() {
        let f = fixture(Classification::Identified).await;
        let poster = generate_poster(&f.state, &f.org, &f.client, request(f.location.id, "1A"))
            .await
            .unwrap();

        let err = publish_to_ckan(&f.state, &f.org, poster.id).await.unwrap_err();
        assert!(matches!(err, PosterError::CkanNotConfigured));
        let unchanged = Poster::find_by_id(poster.id).one(&f.state.db_pool).await.unwrap().unwrap();
        assert!(!unchanged.published_to_ckan);
    }
}
