use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

use crate::db::entities::poster_section;
use crate::db::enums::PosterSize;
use crate::db::services::poster_service::PosterListItem;
use crate::db::services::{
    Page, location_service, organisation_service, poster_service, template_service,
};
use crate::services::poster_workflow::{self, PosterError, RenderOverrides};
use crate::web::client_info::ClientInfo;
use crate::web::models::poster_models::{
    DashboardResponse, GeneratePosterRequest, PosterDetailResponse, PosterResponse, PreviewQuery,
    RecommendationResponse, SectionRequest, poster_file_name,
};
use crate::web::models::{CurrentOrganisation, PageQuery, PageResponse};
use crate::web::{AppError, AppState};

const DASHBOARD_RECENT: u64 = 10;

pub fn create_posters_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_posters))
        .route("/dashboard", get(dashboard))
        .route("/generate", post(generate_poster))
        .route("/template-recommendation/{location_id}", get(template_recommendation))
        .route("/{id}", get(poster_detail))
        .route("/{id}/download", get(download_poster))
        .route("/{id}/preview", get(preview_poster))
        .route("/{id}/sections", post(generate_section))
        .route("/{id}/publish", post(publish_poster))
}

async fn template_recommendation(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(location_id): Path<i32>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let (recommendation, templates, epa_data) =
        poster_workflow::recommend_for_location(&app_state, &org, location_id).await?;
    Ok(Json(RecommendationResponse {
        recommended_template: recommendation.recommended,
        recommendation_reason: recommendation.reason.to_string(),
        can_override: recommendation.can_override,
        templates: templates.into_iter().map(Into::into).collect(),
        epa_data,
    }))
}

async fn generate_poster(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(payload): Json<GeneratePosterRequest>,
) -> Result<(StatusCode, Json<PosterResponse>), AppError> {
    let poster = poster_workflow::generate_poster(&app_state, &org, &client, payload).await?;
    Ok((StatusCode::CREATED, Json(PosterResponse::new(poster))))
}

async fn dashboard(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, AppError> {
    let db = &app_state.db_pool;
    let map_data = location_service::map_data(db, org.id()).await?;
    let recent = poster_service::recent_posters(db, org.id(), DASHBOARD_RECENT).await?;
    Ok(Json(DashboardResponse {
        map_data,
        recent_posters: poster_service::with_details(db, recent).await?,
        location_count: organisation_service::active_location_count(db, org.id()).await?,
        poster_count: poster_service::poster_count(db, org.id()).await?,
    }))
}

async fn list_posters(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<PosterListItem>>, AppError> {
    let db = &app_state.db_pool;
    let Page { items, count, page, num_pages } =
        poster_service::list_posters(db, org.id(), query.page.unwrap_or(1)).await?;
    let items = poster_service::with_details(db, items).await?;
    Ok(Json(Page { items, count, page, num_pages }.into()))
}

async fn poster_detail(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<PosterDetailResponse>, AppError> {
    let db = &app_state.db_pool;
    let poster = poster_service::get_poster(db, org.id(), id)
        .await?
        .ok_or(PosterError::PosterNotFound(id))?;

    let location_name = location_service::get_location(db, org.id(), poster.location_id)
        .await?
        .map(|l| l.name_en)
        .unwrap_or_default();
    let template_code = template_service::get_template(db, poster.template_id)
        .await?
        .map(|t| t.code);
    let recommended_template_code = match poster.recommended_template_id {
        Some(tid) => template_service::get_template(db, tid).await?.map(|t| t.code),
        None => None,
    };
    let sections: Vec<poster_section::Model> = poster_service::sections_for(db, poster.id).await?;

    Ok(Json(PosterDetailResponse {
        poster: PosterResponse::new(poster),
        location_name,
        template_code,
        recommended_template_code,
        sections,
    }))
}

/// `Content-Disposition` needs a plain ASCII file name.
fn attachment_header(filename: &str) -> Result<HeaderValue, AppError> {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' { c } else { '_' })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{ascii}\""))
        .map_err(|e| AppError::InternalServerError(format!("Invalid download header: {e}")))
}

async fn download_poster(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let (poster, bytes) = poster_workflow::read_poster_pdf(&app_state, &org, id).await?;
    let disposition = attachment_header(&poster_file_name(&poster.pdf_file))?;

    let mut response = bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

async fn preview_poster(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let size = match query.size.as_deref() {
        Some(raw) => Some(raw.parse::<PosterSize>().map_err(PosterError::from)?),
        None => None,
    };
    let overrides = RenderOverrides { size, language: query.language };
    let html = poster_workflow::render_preview(&app_state, &org, id, overrides).await?;
    Ok(Html(html))
}

async fn generate_section(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    client: ClientInfo,
    Path(id): Path<i32>,
    Json(payload): Json<SectionRequest>,
) -> Result<(StatusCode, Json<poster_section::Model>), AppError> {
    let section =
        poster_workflow::generate_section(&app_state, &org, &client, id, payload.section_type).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

async fn publish_poster(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<PosterResponse>, AppError> {
    let poster = poster_workflow::publish_to_ckan(&app_state, &org, id).await?;
    Ok(Json(PosterResponse::new(poster)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode, header};
    use serde_json::json;

    use crate::db::entities::{local_authority, location, user};
    use crate::db::enums::Classification;
    use crate::test_support;
    use crate::web::test_helpers::{TestApp, body_bytes, body_json};

    async fn setup(app: &TestApp) -> (local_authority::Model, user::Model, location::Model) {
        let la = test_support::authority(app.db(), "DCC").await;
        let officer = test_support::user(app.db(), "officer@dublincity.ie", Some(la.id)).await;
        let location =
            test_support::location(app.db(), la.id, "IEEABWC090_0000_0200", Classification::Identified)
                .await;
        (la, officer, location)
    }

    #[tokio::test]
    async fn recommendation_lists_matching_templates() {
        let app = TestApp::new().await;
        let (_, officer, location) = setup(&app).await;
        let token = app.token_for(&officer);

        let response = app
            .get(&format!("/api/posters/template-recommendation/{}", location.id), Some(&token))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recommended_template"], "1A");
        assert_eq!(body["recommendation_reason"], "Identified bathing water with no restrictions");
        assert_eq!(body["can_override"], true);
        let codes: Vec<&str> =
            body["templates"].as_array().unwrap().iter().map(|t| t["code"].as_str().unwrap()).collect();
        assert_eq!(codes, ["1A", "1B", "1C"]);
        assert_eq!(body["epa_data"]["debug_mode"], true);
    }

    #[tokio::test]
    async fn generate_then_download_list_and_detail() {
        let app = TestApp::new().await;
        let (_, officer, location) = setup(&app).await;
        let token = app.token_for(&officer);

        let response = app
            .json(
                Method::POST,
                "/api/posters/generate",
                Some(&token),
                json!({ "location_id": location.id, "template": "1A", "size": "A4" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let poster = body_json(response).await;
        let id = poster["id"].as_i64().unwrap();
        assert!(poster["filename"].as_str().unwrap().ends_with(".pdf"));

        let response = app.get(&format!("/api/posters/{id}/download"), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"Beach_IEEABWC090_0000_0200_1A_A4_"));
        assert!(body_bytes(response).await.starts_with(b"%PDF"));

        let body = body_json(app.get("/api/posters", Some(&token)).await).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["template_code"], "1A");

        let body = body_json(app.get(&format!("/api/posters/{id}"), Some(&token)).await).await;
        assert_eq!(body["template_code"], "1A");
        assert_eq!(body["location_name"], "Beach IEEABWC090_0000_0200");

        let body = body_json(app.get("/api/posters/dashboard", Some(&token)).await).await;
        assert_eq!(body["poster_count"], 1);
        assert_eq!(body["location_count"], 1);
        assert_eq!(body["recent_posters"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn override_without_reason_is_a_bad_request() {
        let app = TestApp::new().await;
        let (_, officer, location) = setup(&app).await;
        let response = app
            .json(
                Method::POST,
                "/api/posters/generate",
                Some(&app.token_for(&officer)),
                json!({
                    "location_id": location.id,
                    "template": "1C",
                    "recommended_template": "1A"
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Please provide a reason for overriding the recommended template."
        );
    }

    #[tokio::test]
    async fn preview_sections_and_publish() {
        let app = TestApp::new().await;
        let (_, officer, location) = setup(&app).await;
        let token = app.token_for(&officer);
        let poster = body_json(
            app.json(
                Method::POST,
                "/api/posters/generate",
                Some(&token),
                json!({ "location_id": location.id, "template": "1A", "language": "bilingual" }),
            )
            .await,
        )
        .await;
        let id = poster["id"].as_i64().unwrap();

        let response = app.get(&format!("/api/posters/{id}/preview?size=A5"), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("148mm 210mm"));

        let response = app.get(&format!("/api/posters/{id}/preview?size=B2"), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .json(
                Method::POST,
                &format!("/api/posters/{id}/sections"),
                Some(&token),
                json!({ "section_type": "WATER_QUALITY" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let section = body_json(response).await;
        assert_eq!(section["section_type"], "WATER_QUALITY");

        let response = app
            .json(Method::POST, &format!("/api/posters/{id}/publish"), Some(&token), json!({}))
            .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn other_authorities_cannot_see_posters() {
        let app = TestApp::new().await;
        let (_, officer, location) = setup(&app).await;
        let poster = body_json(
            app.json(
                Method::POST,
                "/api/posters/generate",
                Some(&app.token_for(&officer)),
                json!({ "location_id": location.id, "template": "1A" }),
            )
            .await,
        )
        .await;
        let id = poster["id"].as_i64().unwrap();

        let fcc = test_support::authority(app.db(), "FCC").await;
        let outsider = test_support::user(app.db(), "officer@fingal.ie", Some(fcc.id)).await;
        let token = app.token_for(&outsider);
        let response = app.get(&format!("/api/posters/{id}"), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = app.get(&format!("/api/posters/{id}/download"), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
