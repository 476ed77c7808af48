use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::db::entities::{alert, location, water_quality_data};
use crate::db::enums::AuditAction;
use crate::db::services::audit_service;
use crate::db::services::location_service::{
    self, LocationError, LocationFilter, LocationUpdate, MapPoint, NewLocation,
};
use crate::web::client_info::ClientInfo;
use crate::web::models::{CurrentOrganisation, PageResponse};
use crate::web::{AppError, AppState};

const HISTORY_LIMIT: u64 = 10;

pub fn create_locations_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/map", get(map_data))
        .route("/{id}", get(location_detail).put(update_location))
}

#[derive(Serialize)]
struct LocationDetailResponse {
    #[serde(flatten)]
    location: location::Model,
    facilities: BTreeMap<&'static str, bool>,
    current_water_quality: Option<water_quality_data::Model>,
    quality_history: Vec<water_quality_data::Model>,
    active_alerts: Vec<alert::Model>,
    has_active_alert: bool,
}

async fn list_locations(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<LocationFilter>,
) -> Result<Json<PageResponse<location::Model>>, AppError> {
    let page = location_service::list_locations(&app_state.db_pool, org.id(), &filter).await?;
    Ok(Json(page.into()))
}

async fn map_data(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<MapPoint>>, AppError> {
    Ok(Json(location_service::map_data(&app_state.db_pool, org.id()).await?))
}

async fn location_detail(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<LocationDetailResponse>, AppError> {
    let db = &app_state.db_pool;
    let location = location_service::get_location(db, org.id(), id)
        .await?
        .ok_or(LocationError::NotFound(id))?;

    let current_water_quality = location_service::current_water_quality(db, location.id).await?;
    let quality_history = location_service::quality_history(db, location.id, HISTORY_LIMIT).await?;
    let active_alerts = location_service::active_alerts(db, location.id).await?;
    Ok(Json(LocationDetailResponse {
        facilities: location.facilities(),
        has_active_alert: !active_alerts.is_empty(),
        location,
        current_water_quality,
        quality_history,
        active_alerts,
    }))
}

async fn create_location(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    client: ClientInfo,
    Json(payload): Json<NewLocation>,
) -> Result<(StatusCode, Json<location::Model>), AppError> {
    if payload.beaches_ie_id.trim().is_empty() || payload.name_en.trim().is_empty() {
        return Err(AppError::InvalidInput("beaches_ie_id and name_en are required.".to_string()));
    }
    let db = &app_state.db_pool;
    let location = location_service::create_location(db, org.id(), payload).await?;

    audit_service::record(
        db,
        client
            .audit(AuditAction::LocationCreated)
            .user(org.user.id)
            .location(location.id)
            .details(json!({ "beaches_ie_id": location.beaches_ie_id, "name": location.name_en })),
    )
    .await;
    info!(location_id = location.id, local_authority_id = org.id(), "Location created.");
    Ok((StatusCode::CREATED, Json(location)))
}

async fn update_location(
    Extension(org): Extension<CurrentOrganisation>,
    State(app_state): State<Arc<AppState>>,
    client: ClientInfo,
    Path(id): Path<i32>,
    Json(payload): Json<LocationUpdate>,
) -> Result<Json<location::Model>, AppError> {
    if payload.name_en.trim().is_empty() {
        return Err(AppError::InvalidInput("name_en is required.".to_string()));
    }
    let db = &app_state.db_pool;
    let details = serde_json::to_value(&payload)?;
    let location = location_service::update_location(db, org.id(), id, payload).await?;

    audit_service::record(
        db,
        client
            .audit(AuditAction::LocationModified)
            .user(org.user.id)
            .location(location.id)
            .details(json!({ "changes": details })),
    )
    .await;
    info!(location_id = location.id, "Location updated.");
    Ok(Json(location))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use serde_json::json;

    use crate::db::entities::audit_log;
    use crate::db::enums::{AuditAction, Classification};
    use crate::test_support;
    use crate::web::test_helpers::{TestApp, body_json};

    #[tokio::test]
    async fn users_without_an_authority_are_forbidden() {
        let app = TestApp::new().await;
        let user = test_support::user(app.db(), "nobody@example.com", None).await;
        let response = app.get("/api/locations", Some(&app.token_for(&user))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn list_and_detail_are_scoped() {
        let app = TestApp::new().await;
        let dcc = test_support::authority(app.db(), "DCC").await;
        let fcc = test_support::authority(app.db(), "FCC").await;
        let officer = test_support::user(app.db(), "officer@dublincity.ie", Some(dcc.id)).await;
        let own = test_support::location(app.db(), dcc.id, "IEEA_OWN", Classification::Identified).await;
        let foreign = test_support::location(app.db(), fcc.id, "IEEA_FOREIGN", Classification::Identified).await;
        test_support::alert(app.db(), own.id, false).await;
        let token = app.token_for(&officer);

        let body = body_json(app.get("/api/locations", Some(&token)).await).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["beaches_ie_id"], "IEEA_OWN");

        let body = body_json(app.get("/api/locations?has_alert=no", Some(&token)).await).await;
        assert_eq!(body["count"], 0);

        let response = app.get(&format!("/api/locations/{}", own.id), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["has_active_alert"], true);
        assert_eq!(body["facilities"]["dogs_allowed"], true);

        let response = app.get(&format!("/api/locations/{}", foreign.id), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(app.get("/api/locations/map", Some(&token)).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["has_alert"], true);
    }

    #[tokio::test]
    async fn create_and_update_are_audited() {
        let app = TestApp::new().await;
        let dcc = test_support::authority(app.db(), "DCC").await;
        let officer = test_support::user(app.db(), "officer@dublincity.ie", Some(dcc.id)).await;
        let token = app.token_for(&officer);

        let response = app
            .json(
                Method::POST,
                "/api/locations",
                Some(&token),
                json!({
                    "beaches_ie_id": "IEEABWC090_0000_0300",
                    "name_en": "Sandymount Strand",
                    "classification": "IDENTIFIED",
                    "latitude": 53.33,
                    "longitude": -6.21
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_i64().unwrap();

        let duplicate = app
            .json(
                Method::POST,
                "/api/locations",
                Some(&token),
                json!({
                    "beaches_ie_id": "IEEABWC090_0000_0300",
                    "name_en": "Again",
                    "classification": "IDENTIFIED"
                }),
            )
            .await;
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let response = app
            .json(
                Method::PUT,
                &format!("/api/locations/{id}"),
                Some(&token),
                json!({
                    "name_en": "Sandymount Strand",
                    "name_ga": "Dumhach Thrá",
                    "classification": "IDENTIFIED",
                    "latitude": 53.33,
                    "longitude": -6.21,
                    "is_active": true,
                    "has_toilets": true,
                    "has_parking": true,
                    "has_lifeguard": false,
                    "has_disability_access": false,
                    "has_blue_flag": false,
                    "dogs_allowed": false
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["name_ga"], "Dumhach Thrá");
        assert_eq!(updated["dogs_allowed"], false);

        let actions: Vec<AuditAction> = audit_log::Entity::find()
            .filter(audit_log::Column::LocationId.eq(id as i32))
            .all(app.db())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert!(actions.contains(&AuditAction::LocationCreated));
        assert!(actions.contains(&AuditAction::LocationModified));
    }
}
