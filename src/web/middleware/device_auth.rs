//! Token authentication for kiosk devices.
//!
//! Devices send `Authorization: Token <key>`; `Bearer` is accepted too.
//! Failures answer 401 with `{"detail": "..."}`.

use axum::{
    Json,
    body::Body as AxumBody,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::db::entities::device;
use crate::db::services::device_service::{self, DeviceAuthError};
use crate::web::AppState;

/// The device behind a kiosk request.
#[derive(Debug, Clone)]
pub struct AuthenticatedDevice(pub device::Model);

impl IntoResponse for DeviceAuthError {
    fn into_response(self) -> Response {
        let status = match self {
            DeviceAuthError::DbErr(ref e) => {
                error!(error = %e, "Database error during device authentication.");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        };
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Extracts the key from an `Authorization` header value.
pub fn parse_token_header(value: Option<&str>) -> Result<&str, DeviceAuthError> {
    let value = value.ok_or(DeviceAuthError::MissingCredentials)?;
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [keyword, ..] if !is_token_keyword(keyword) => Err(DeviceAuthError::MissingCredentials),
        [] => Err(DeviceAuthError::MissingCredentials),
        [_] => Err(DeviceAuthError::NoCredentials),
        [_, token] => Ok(token),
        _ => Err(DeviceAuthError::TokenHasSpaces),
    }
}

fn is_token_keyword(keyword: &str) -> bool {
    keyword.eq_ignore_ascii_case("token") || keyword.eq_ignore_ascii_case("bearer")
}

pub async fn device_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, DeviceAuthError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = parse_token_header(header_value)?.to_string();

    let (device, _token) = device_service::authenticate(&state.db_pool, &token).await?;
    debug!(device_id = device.id, "Kiosk device authenticated.");

    req.extensions_mut().insert(AuthenticatedDevice(device));
    Ok(next.run(req).await)
}
