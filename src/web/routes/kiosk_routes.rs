//! Read-only location API for kiosk devices, `/api/v1/locations/`.
//!
//! Responses follow the device-facing conventions: errors are
//! `{"detail": "..."}` and lists are `{count, next, previous, results}`.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DbErr;
use std::sync::Arc;
use tracing::error;

use crate::db::entities::location;
use crate::db::services::{Page, device_service, location_service, organisation_service};
use crate::web::AppState;
use crate::web::middleware::device_auth::AuthenticatedDevice;
use crate::web::models::PageQuery;
use crate::web::models::kiosk_models::{
    KioskAlert, KioskLocation, KioskLocationDetail, KioskPage, KioskWaterQuality,
};

const BASE_PATH: &str = "/api/v1/locations/";

pub fn create_kiosk_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/locations", get(list_locations))
        .route("/api/v1/locations/", get(list_locations))
        .route("/api/v1/locations/{id}", get(location_detail))
        .route("/api/v1/locations/{id}/", get(location_detail))
        .route("/api/v1/locations/{id}/water_quality", get(water_quality))
        .route("/api/v1/locations/{id}/water_quality/", get(water_quality))
        .route("/api/v1/locations/{id}/alerts", get(alerts))
        .route("/api/v1/locations/{id}/alerts/", get(alerts))
}

#[derive(Debug, thiserror::Error)]
pub enum KioskError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for KioskError {
    fn into_response(self) -> Response {
        let status = match self {
            KioskError::NotFound(_) => StatusCode::NOT_FOUND,
            KioskError::Database(ref e) => {
                error!(error = %e, "Kiosk request failed.");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

fn page_link(page: u64) -> String {
    format!("{BASE_PATH}?page={page}")
}

async fn visible_location(
    app_state: &AppState,
    device: &AuthenticatedDevice,
    id: i32,
) -> Result<location::Model, KioskError> {
    device_service::visible_location(&app_state.db_pool, &device.0, id)
        .await?
        .ok_or(KioskError::NotFound("Not found."))
}

async fn list_locations(
    Extension(device): Extension<AuthenticatedDevice>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<KioskPage<KioskLocation>>, KioskError> {
    let db = &app_state.db_pool;
    let all = device_service::visible_locations(db, &device.0).await?;
    let page = Page::from_vec(all, query.page.unwrap_or(1));

    let ids: Vec<i32> = page.items.iter().map(|l| l.id).collect();
    let alerted = location_service::locations_with_active_alerts(db, &ids).await?;
    let statuses = location_service::current_quality_statuses(db, &ids).await?;

    Ok(Json(KioskPage {
        count: page.count,
        next: page.has_next().then(|| page_link(page.page + 1)),
        previous: page.has_previous().then(|| page_link(page.page - 1)),
        results: page
            .items
            .into_iter()
            .map(|l| {
                let has_alert = alerted.contains(&l.id);
                let quality = statuses.get(&l.id).copied();
                KioskLocation::new(l, has_alert, quality)
            })
            .collect(),
    }))
}

async fn location_detail(
    Extension(device): Extension<AuthenticatedDevice>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<KioskLocationDetail>, KioskError> {
    let db = &app_state.db_pool;
    let location = visible_location(&app_state, &device, id).await?;

    let local_authority_name =
        organisation_service::get_local_authority(db, location.local_authority_id)
            .await?
            .map(|la| la.name)
            .unwrap_or_default();
    let current_water_quality = location_service::current_water_quality(db, location.id)
        .await?
        .map(KioskWaterQuality::from);
    let active_alerts = location_service::active_alerts(db, location.id)
        .await?
        .into_iter()
        .map(KioskAlert::from)
        .collect();

    Ok(Json(KioskLocationDetail {
        facilities: location.facilities(),
        id: location.id,
        name_en: location.name_en,
        name_ga: location.name_ga,
        beaches_ie_id: location.beaches_ie_id,
        classification: location.classification,
        latitude: location.latitude,
        longitude: location.longitude,
        local_authority_name,
        is_active: location.is_active,
        current_water_quality,
        active_alerts,
    }))
}

async fn water_quality(
    Extension(device): Extension<AuthenticatedDevice>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<KioskWaterQuality>, KioskError> {
    let location = visible_location(&app_state, &device, id).await?;
    location_service::current_water_quality(&app_state.db_pool, location.id)
        .await?
        .map(|wq| Json(wq.into()))
        .ok_or(KioskError::NotFound("No water quality data available."))
}

async fn alerts(
    Extension(device): Extension<AuthenticatedDevice>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<KioskAlert>>, KioskError> {
    let location = visible_location(&app_state, &device, id).await?;
    let alerts = location_service::active_alerts(&app_state.db_pool, location.id).await?;
    Ok(Json(alerts.into_iter().map(KioskAlert::from).collect()))
}
