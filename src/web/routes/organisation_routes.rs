use axum::{Extension, Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::entities::local_authority;
use crate::db::services::organisation_service;
use crate::web::models::{AuthenticatedUser, LocalAuthorityDetail};
use crate::web::{AppError, AppState};

pub fn create_organisations_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_organisations))
        .route("/mine", get(my_organisation))
}

async fn list_organisations(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<local_authority::Model>>, AppError> {
    let user = auth_user.user;
    if !user.is_staff {
        return Err(AppError::Forbidden("Staff access required.".to_string()));
    }
    Ok(Json(organisation_service::list_local_authorities(&app_state.db_pool).await?))
}

async fn my_organisation(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<LocalAuthorityDetail>, AppError> {
    let db = &app_state.db_pool;
    let user = auth_user.user;
    let local_authority = match user.local_authority_id {
        Some(la_id) => organisation_service::get_local_authority(db, la_id).await?,
        None => None,
    }
    .ok_or_else(|| AppError::NotFound("You are not associated with a Local Authority.".to_string()))?;

    let users_count = organisation_service::active_user_count(db, local_authority.id).await?;
    let locations_count = organisation_service::active_location_count(db, local_authority.id).await?;
    Ok(Json(LocalAuthorityDetail { local_authority, users_count, locations_count }))
}
