use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::entities::device;
use crate::db::services::device_service::{self, NewDevice};
use crate::web::models::CurrentOrganisation;
use crate::web::{AppError, AppState};

pub fn create_devices_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_devices).post(create_device))
        .route("/{id}/tokens", post(issue_token))
        .route("/{id}/locations", put(set_locations))
}

#[derive(Serialize)]
struct DeviceResponse {
    #[serde(flatten)]
    device: device::Model,
    location_ids: Vec<i32>,
}

#[derive(Deserialize)]
struct IssueTokenRequest {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// The only response that carries the token value.
#[derive(Serialize)]
struct IssuedToken {
    id: i32,
    device_id: i32,
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct DeviceLocationsRequest {
    location_ids: Vec<i32>,
}

fn require_la_admin(org: &CurrentOrganisation) -> Result<(), AppError> {
    if org.user.is_la_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Local Authority administrator access required.".to_string()))
    }
}

async fn list_devices(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeviceResponse>>, AppError> {
    require_la_admin(&org)?;
    let db = &app_state.db_pool;
    let mut out = Vec::new();
    for device in device_service::list_devices(db, org.id()).await? {
        let location_ids = device_service::assigned_location_ids(db, device.id).await?;
        out.push(DeviceResponse { device, location_ids });
    }
    Ok(Json(out))
}

async fn create_device(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NewDevice>,
) -> Result<(StatusCode, Json<DeviceResponse>), AppError> {
    require_la_admin(&org)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Device name is required.".to_string()));
    }
    let device = device_service::create_device(&app_state.db_pool, org.id(), payload).await?;
    info!(device_id = device.id, local_authority_id = org.id(), "Device registered.");
    Ok((StatusCode::CREATED, Json(DeviceResponse { device, location_ids: Vec::new() })))
}

async fn issue_token(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<(StatusCode, Json<IssuedToken>), AppError> {
    require_la_admin(&org)?;
    let db = &app_state.db_pool;
    let device = device_service::get_device(db, org.id(), id).await?;

    let token = device_service::issue_token(db, device.id, request.expires_at).await?;
    info!(device_id = device.id, token_id = token.id, "Device token issued.");
    Ok((
        StatusCode::CREATED,
        Json(IssuedToken {
            id: token.id,
            device_id: token.device_id,
            token: token.token,
            expires_at: token.expires_at,
        }),
    ))
}

async fn set_locations(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<DeviceLocationsRequest>,
) -> Result<Json<DeviceResponse>, AppError> {
    require_la_admin(&org)?;
    let db = &app_state.db_pool;
    let location_ids =
        device_service::set_device_locations(db, org.id(), id, &payload.location_ids).await?;
    let device = device_service::get_device(db, org.id(), id).await?;
    Ok(Json(DeviceResponse { device, location_ids }))
}
