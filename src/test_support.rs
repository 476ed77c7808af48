//! Fixtures for database-backed tests: an in-memory SQLite database with the
//! production schema and small builders for common rows.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::json;

use crate::db::entities::{alert, device, local_authority, location, user};
use crate::db::enums::{AlertType, Classification, DeviceType, UserRole};
use crate::db::schema::ensure_schema;
use crate::db::services::{device_service, organisation_service, user_service};

pub const PASSWORD: &str = "password123";

pub async fn test_db() -> DatabaseConnection {
    // A single connection so every query sees the same in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    ensure_schema(&db).await.unwrap();
    db
}

pub async fn authority(db: &DatabaseConnection, code: &str) -> local_authority::Model {
    let name = organisation_service::authority_name_for_code(code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{code} Council"));
    let domain = format!("{}.ie", code.to_ascii_lowercase());
    organisation_service::create_local_authority(
        db,
        organisation_service::NewLocalAuthority {
            name,
            code: code.to_string(),
            contact_email: format!("env@{domain}"),
            website: format!("https://www.{domain}"),
            email_domain: domain,
        },
    )
    .await
    .unwrap()
}

/// An active officer with password [`PASSWORD`].
pub async fn user(db: &DatabaseConnection, email: &str, local_authority_id: Option<i32>) -> user::Model {
    user_service::create_user(
        db,
        user_service::NewUser {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "Officer".to_string(),
            role: UserRole::Officer,
            local_authority_id,
            is_staff: false,
        },
    )
    .await
    .unwrap()
}

pub async fn with_role(db: &DatabaseConnection, user: user::Model, role: UserRole, is_staff: bool) -> user::Model {
    let mut active: user::ActiveModel = user.into();
    active.role = Set(role);
    active.is_staff = Set(is_staff);
    active.update(db).await.unwrap()
}

pub async fn location(
    db: &DatabaseConnection,
    local_authority_id: i32,
    beaches_ie_id: &str,
    classification: Classification,
) -> location::Model {
    let now = Utc::now();
    location::ActiveModel {
        local_authority_id: Set(local_authority_id),
        beaches_ie_id: Set(beaches_ie_id.to_string()),
        name_en: Set(format!("Beach {beaches_ie_id}")),
        name_ga: Set(String::new()),
        description_en: Set(String::new()),
        description_ga: Set(String::new()),
        classification: Set(classification),
        latitude: Set(Some(53.35)),
        longitude: Set(Some(-6.2)),
        is_active: Set(true),
        has_toilets: Set(false),
        has_parking: Set(false),
        has_lifeguard: Set(false),
        has_disability_access: Set(false),
        has_blue_flag: Set(false),
        dogs_allowed: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn alert(db: &DatabaseConnection, location_id: i32, season_long: bool) -> alert::Model {
    let now = Utc::now();
    alert::ActiveModel {
        location_id: Set(location_id),
        alert_type: Set(AlertType::Restriction),
        title_en: Set("Bathing restriction".to_string()),
        title_ga: Set(String::new()),
        message_en: Set("Bathing is not advised".to_string()),
        message_ga: Set(String::new()),
        start_date: Set(now),
        end_date: Set(None),
        is_active: Set(true),
        is_season_long: Set(season_long),
        beaches_ie_id: Set(String::new()),
        raw_data: Set(json!({})),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn device(db: &DatabaseConnection, local_authority_id: i32) -> device::Model {
    device_service::create_device(
        db,
        local_authority_id,
        device_service::NewDevice {
            name: "Promenade kiosk".to_string(),
            device_type: DeviceType::Kiosk,
            metadata: json!({}),
        },
    )
    .await
    .unwrap()
}
