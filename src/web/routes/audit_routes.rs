use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    routing::get,
};
use std::sync::Arc;

use crate::db::entities::audit_log;
use crate::db::services::audit_service::{self, AuditScope};
use crate::web::models::{AuthenticatedUser, PageQuery, PageResponse};
use crate::web::{AppError, AppState};

pub fn create_audit_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_audit_entries))
}

/// Staff see every entry; LA admins see entries made by their authority's users.
async fn list_audit_entries(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<audit_log::Model>>, AppError> {
    let user = auth_user.user;
    let scope = if user.is_staff {
        AuditScope::All
    } else {
        match (user.is_la_admin(), user.local_authority_id) {
            (true, Some(la_id)) => AuditScope::LocalAuthority(la_id),
            _ => return Err(AppError::Forbidden("You may not view the audit log.".to_string())),
        }
    };

    let page = audit_service::list_entries(&app_state.db_pool, scope, query.page.unwrap_or(1)).await?;
    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::db::enums::{AuditAction, UserRole};
    use crate::db::services::audit_service::{self, AuditEntry};
    use crate::test_support;
    use crate::web::test_helpers::{TestApp, body_json};

    #[tokio::test]
    async fn scope_follows_role() {
        let app = TestApp::new().await;
        let dcc = test_support::authority(app.db(), "DCC").await;
        let fcc = test_support::authority(app.db(), "FCC").await;
        let officer = test_support::user(app.db(), "officer@dublincity.ie", Some(dcc.id)).await;
        let outsider = test_support::user(app.db(), "officer@fingal.ie", Some(fcc.id)).await;
        let la_admin = test_support::user(app.db(), "admin@dublincity.ie", Some(dcc.id)).await;
        let la_admin = test_support::with_role(app.db(), la_admin, UserRole::LaAdmin, false).await;
        let staff = test_support::user(app.db(), "staff@example.com", None).await;
        let staff = test_support::with_role(app.db(), staff, UserRole::Admin, true).await;

        audit_service::record(app.db(), AuditEntry::new(AuditAction::UserLogin).user(officer.id)).await;
        audit_service::record(app.db(), AuditEntry::new(AuditAction::UserLogin).user(outsider.id)).await;

        let response = app.get("/api/audit", Some(&app.token_for(&officer))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(app.get("/api/audit", Some(&app.token_for(&la_admin))).await).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["user_id"], officer.id);

        let body = body_json(app.get("/api/audit", Some(&app.token_for(&staff))).await).await;
        assert_eq!(body["count"], 2);
    }
}
