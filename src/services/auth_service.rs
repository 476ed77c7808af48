use std::sync::LazyLock;

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::DatabaseConnection;

use crate::db::entities::user;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginRequest};

// Verified against when the email is unknown so both paths cost one bcrypt check.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("bwip-timing-equaliser", DEFAULT_COST).ok());

async fn burn_verification(password: String) {
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify(password, dummy);
        }
    })
    .await;
}

/// bcrypt check on the blocking pool.
async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Password check did not complete: {e}")))?
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))
}

/// Checks the credentials and returns the active user and a fresh JWT.
pub async fn login_user(
    pool: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<(user::Model, String), AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput("Email and password are required.".to_string()));
    }

    let Some(user) = user_service::find_by_email(pool, &req.email).await? else {
        burn_verification(req.password).await;
        return Err(AppError::InvalidCredentials);
    };

    let valid_password = verify_password(req.password, user.password_hash.clone()).await?;

    if !valid_password || !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let user = user_service::record_login(pool, user).await?;
    let token = create_jwt_for_user(&user, jwt_secret)?;
    Ok((user, token))
}

pub fn create_jwt_for_user(user: &user::Model, jwt_secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    // Token valid for 24 hours
    let expiration = (now + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        exp: expiration,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(jwt_secret.as_ref()))
        .map_err(|e| AppError::TokenCreationError(format!("Failed to sign token: {e}")))
}
