use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::beaches_api::{BeachDataSource, BeachesApiClient};
use crate::ckan::CkanClient;
use crate::pdf_generation::PosterPdfGenerator;
use crate::server::config::ServerConfig;
use crate::version::VERSION;
use crate::web::middleware::{auth, device_auth, organisation};
use crate::web::routes::*;

pub mod client_info;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ServerConfig>,
    pub beach_source: Arc<dyn BeachDataSource>,
    pub generator: Arc<PosterPdfGenerator>,
    pub ckan: Arc<CkanClient>,
}

impl AppState {
    pub fn new(db_pool: DatabaseConnection, config: Arc<ServerConfig>) -> Result<Self, String> {
        let beach_source = BeachesApiClient::new(config.beaches_api.clone())
            .map_err(|e| format!("Failed to build beaches.ie client: {e}"))?;
        let generator = PosterPdfGenerator::new(config.pdf_dpi)
            .map_err(|e| format!("Failed to load poster templates: {e}"))?;
        let ckan = CkanClient::new(config.ckan.clone())
            .map_err(|e| format!("Failed to build CKAN client: {e}"))?;

        Ok(Self {
            db_pool,
            config,
            beach_source: Arc::new(beach_source),
            generator: Arc::new(generator),
            ckan: Arc::new(ckan),
        })
    }
}

async fn health_check_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    match app_state.db_pool.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "healthy", "database": "ok", "version": VERSION })),
        ),
        Err(e) => {
            error!(error = %e, "Health check database ping failed.");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "database": e.to_string(),
                    "version": VERSION,
                })),
            )
        }
    }
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let org_guard = || axum_middleware::from_fn_with_state(app_state.clone(), organisation::require_organisation);
    let auth_layer = || axum_middleware::from_fn_with_state(app_state.clone(), auth::auth);

    Router::new()
        .route("/health", get(health_check_handler))
        .nest(
            "/api/accounts",
            account_routes::create_public_router()
                .merge(account_routes::create_protected_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/organisations",
            organisation_routes::create_organisations_router().route_layer(auth_layer()),
        )
        .nest(
            "/api/locations",
            location_routes::create_locations_router()
                .route_layer(org_guard())
                .route_layer(auth_layer()),
        )
        .nest(
            "/api/posters",
            poster_routes::create_posters_router()
                .route_layer(org_guard())
                .route_layer(auth_layer()),
        )
        .nest(
            "/api/devices",
            device_routes::create_devices_router()
                .route_layer(org_guard())
                .route_layer(auth_layer()),
        )
        .nest(
            "/api/audit",
            audit_routes::create_audit_router().route_layer(auth_layer()),
        )
        .merge(kiosk_routes::create_kiosk_router().route_layer(
            axum_middleware::from_fn_with_state(app_state.clone(), device_auth::device_auth),
        ))
        .with_state(app_state.clone())
        .layer(cors)
}
