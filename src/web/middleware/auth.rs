use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use std::sync::Arc;
use tracing::warn;

use crate::db::services::user_service;
use crate::web::models::{AuthenticatedUser, Claims};
use crate::web::{AppState, error::AppError};

/// Bearer token from the Authorization header, else the login cookie.
fn session_token(req: &Request<AxumBody>, jar: &CookieJar) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
}

fn session_claims(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!(error = ?e, "JWT decoding error during auth middleware.");
        AppError::Unauthorized("Invalid or expired session.".to_string())
    })
}

/// Resolves the session to an active account, read from the database on
/// every request.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&req, &jar)
        .ok_or_else(|| AppError::Unauthorized("Authentication required.".to_string()))?;
    let claims = session_claims(&token, &state.config.jwt_secret)?;

    let user = user_service::get_user(&state.db_pool, claims.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            warn!(user_id = claims.user_id, "Session for a missing or inactive account.");
            AppError::Unauthorized("User account is not active.".to_string())
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });
    Ok(next.run(req).await)
}
