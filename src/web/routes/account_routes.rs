use axum::{
    Extension, Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;
use tracing::info;

use crate::db::enums::AuditAction;
use crate::db::services::{audit_service, organisation_service, user_service};
use crate::services::auth_service;
use crate::web::client_info::ClientInfo;
use crate::web::models::{AuthenticatedUser, LoginRequest, LoginResponse, ProfileResponse};
use crate::web::{AppError, AppState};

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login_handler))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/logout", post(logout_handler))
        .route("/profile", get(get_profile).put(update_profile))
}

fn with_cookie(mut response: Response, cookie: Cookie<'_>) -> Result<Response, AppError> {
    let value = cookie
        .to_string()
        .parse()
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie header: {e}")))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let db = &app_state.db_pool;
    let (user, token) = auth_service::login_user(db, payload, &app_state.config.jwt_secret).await?;

    let local_authority = match user.local_authority_id {
        Some(la_id) => organisation_service::get_local_authority(db, la_id).await?,
        None => None,
    };
    audit_service::record(db, client.audit(AuditAction::UserLogin).user(user.id)).await;
    info!(user_id = user.id, "User logged in.");

    let auth_cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    let body = LoginResponse {
        token,
        user: ProfileResponse::new(&user, local_authority.as_ref()),
    };
    with_cookie(Json(body).into_response(), auth_cookie)
}

async fn logout_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    client: ClientInfo,
) -> Result<Response, AppError> {
    audit_service::record(
        &app_state.db_pool,
        client.audit(AuditAction::UserLogout).user(auth_user.id()),
    )
    .await;
    info!(user_id = auth_user.id(), "User logged out.");

    let mut expired = Cookie::build(("token", "")).path("/").http_only(true).build();
    expired.make_removal();
    with_cookie(
        Json(serde_json::json!({ "message": "You have been logged out." })).into_response(),
        expired,
    )
}

async fn get_profile(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = auth_user.user;
    let local_authority = match user.local_authority_id {
        Some(la_id) => organisation_service::get_local_authority(&app_state.db_pool, la_id).await?,
        None => None,
    };
    Ok(Json(ProfileResponse::new(&user, local_authority.as_ref())))
}

async fn update_profile(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<user_service::ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let db = &app_state.db_pool;
    let user = user_service::update_profile(db, auth_user.id(), payload).await?;
    let local_authority = match user.local_authority_id {
        Some(la_id) => organisation_service::get_local_authority(db, la_id).await?,
        None => None,
    };
    Ok(Json(ProfileResponse::new(&user, local_authority.as_ref())))
}
