use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

use crate::db::enums::InvalidTemplateCode;
use crate::db::services::device_service::DeviceError;
use crate::db::services::location_service::LocationError;
use crate::db::services::user_service::UserServiceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    PasswordHashingError(String),
    #[error("JWT creation failed: {0}")]
    TokenCreationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password.".to_string())
            }
            AppError::PasswordHashingError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Password hashing error: {msg}"),
            ),
            AppError::TokenCreationError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token creation error: {msg}"),
            ),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {msg}"),
            ),
            AppError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db_err))) => {
            db_err.is_unique_violation()
        }
        _ => false,
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if is_unique_violation(&err) {
            return AppError::Conflict("A record with these values already exists.".to_string());
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(format!("JSON serialization/deserialization error: {err}"))
    }
}

impl From<InvalidTemplateCode> for AppError {
    fn from(err: InvalidTemplateCode) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::DbErr(e) => e.into(),
            UserServiceError::EmailTaken(_) => AppError::Conflict(err.to_string()),
            UserServiceError::PasswordHashing(e) => AppError::PasswordHashingError(e),
            UserServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::DbErr(e) => e.into(),
            LocationError::NotFound(_) => AppError::NotFound(err.to_string()),
            LocationError::DuplicateBeachId(_) => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<DeviceError> for AppError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::DbErr(e) => e.into(),
            DeviceError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeviceError::ForeignLocation(_) => AppError::InvalidInput(err.to_string()),
        }
    }
}
