//! Organisation guard: resolves the signed-in user's local authority for
//! every tenant-scoped route.

use axum::{
    body::Body as AxumBody,
    extract::{Extension, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::db::services::organisation_service;
use crate::web::models::{AuthenticatedUser, CurrentOrganisation};
use crate::web::{AppState, error::AppError};

pub async fn require_organisation(
    State(state): State<Arc<AppState>>,
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticated_user.user;

    let local_authority = match user.local_authority_id {
        Some(la_id) => organisation_service::get_local_authority(&state.db_pool, la_id).await?,
        None => None,
    };
    let Some(local_authority) = local_authority.filter(|la| la.is_active) else {
        warn!(user_id = user.id, "User has no active local authority.");
        return Err(AppError::Forbidden(
            "You are not associated with a Local Authority.".to_string(),
        ));
    };

    req.extensions_mut().insert(CurrentOrganisation { user, local_authority });
    Ok(next.run(req).await)
}
