//! Development data: authorities, templates, two users and a few beaches.
//! Every step is get-or-create, so running it twice changes nothing.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set};
use serde_json::json;
use tracing::info;

use crate::db::entities::{local_authority, location, prelude::Location};
use crate::db::enums::{Classification, QualityStatus, UserRole};
use crate::db::services::location_service::{self, NewWaterQuality};
use crate::db::services::organisation_service::{self, NewLocalAuthority};
use crate::db::services::template_service;
use crate::db::services::user_service::{self, NewUser, UserServiceError};

const AUTHORITIES: &[(&str, &str, &str)] = &[
    ("DCC", "Dublin City Council", "dublincity.ie"),
    ("FCC", "Fingal County Council", "fingal.ie"),
    ("DLRCC", "Dun Laoghaire-Rathdown County Council", "dlrcoco.ie"),
    ("SDCC", "South Dublin County Council", "sdcc.ie"),
    ("WCC", "Wicklow County Council", "wicklowcoco.ie"),
];

struct SampleBeach {
    name_en: &'static str,
    name_ga: &'static str,
    beaches_ie_id: &'static str,
    classification: Classification,
    latitude: f64,
    longitude: f64,
    // toilets, parking, lifeguard, disability access, blue flag, dogs
    flags: [bool; 6],
}

const BEACHES: &[SampleBeach] = &[
    SampleBeach {
        name_en: "Dollymount Strand",
        name_ga: "Trá Dhollymount",
        beaches_ie_id: "IEWEBWC170_0000_0200",
        classification: Classification::Identified,
        latitude: 53.2695,
        longitude: -6.1544,
        flags: [true, true, true, true, true, false],
    },
    SampleBeach {
        name_en: "Sandymount Strand",
        name_ga: "Trá Dhumhach",
        beaches_ie_id: "IEWEBWC170_0000_0300",
        classification: Classification::Identified,
        latitude: 53.3281,
        longitude: -6.2118,
        flags: [false, true, false, false, false, true],
    },
    SampleBeach {
        name_en: "Portmarnock Beach",
        name_ga: "Trá Phort Mearnóg",
        beaches_ie_id: "IEWEBWC170_0000_0400",
        classification: Classification::Identified,
        latitude: 53.4234,
        longitude: -6.1321,
        flags: [true, true, true, true, true, false],
    },
    SampleBeach {
        name_en: "Seapoint",
        name_ga: "Pointe na Mara",
        beaches_ie_id: "IEWEBWC170_0000_0500",
        classification: Classification::Identified,
        latitude: 53.2901,
        longitude: -6.1654,
        flags: [true, false, false, true, false, true],
    },
    SampleBeach {
        name_en: "Forty Foot",
        name_ga: "An Daichead Troigh",
        beaches_ie_id: "IEWEBWC170_0000_0600",
        classification: Classification::NonIdentified,
        latitude: 53.2886,
        longitude: -6.1145,
        flags: [false, true, false, false, false, true],
    },
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("User seeding failed: {0}")]
    User(#[from] UserServiceError),
}

/// Counts of rows created by one run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub authorities: usize,
    pub templates: usize,
    pub users: usize,
    pub locations: usize,
}

async fn seed_authorities(db: &DbConn, summary: &mut SeedSummary) -> Result<local_authority::Model, SeedError> {
    let mut first = None;
    for (code, name, domain) in AUTHORITIES {
        let authority = match organisation_service::get_by_code(db, code).await? {
            Some(existing) => existing,
            None => {
                summary.authorities += 1;
                info!(code, "Creating local authority.");
                organisation_service::create_local_authority(
                    db,
                    NewLocalAuthority {
                        name: name.to_string(),
                        code: code.to_string(),
                        email_domain: domain.to_string(),
                        contact_email: format!("env@{domain}"),
                        website: format!("https://www.{domain}"),
                    },
                )
                .await?
            }
        };
        first.get_or_insert(authority);
    }
    first.ok_or_else(|| DbErr::Custom("no authorities to seed".to_string()).into())
}

async fn seed_user(
    db: &DbConn,
    new: NewUser,
    summary: &mut SeedSummary,
) -> Result<(), SeedError> {
    if user_service::find_by_email(db, &new.email).await?.is_some() {
        return Ok(());
    }
    info!(email = %new.email, "Creating user.");
    user_service::create_user(db, new).await?;
    summary.users += 1;
    Ok(())
}

async fn seed_locations(
    db: &DbConn,
    authority: &local_authority::Model,
    summary: &mut SeedSummary,
) -> Result<(), SeedError> {
    let sample_date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default();
    for beach in BEACHES {
        let exists = Location::find()
            .filter(location::Column::BeachesIeId.eq(beach.beaches_ie_id))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let [toilets, parking, lifeguard, disability_access, blue_flag, dogs] = beach.flags;
        let now = Utc::now();
        let created = location::ActiveModel {
            local_authority_id: Set(authority.id),
            beaches_ie_id: Set(beach.beaches_ie_id.to_string()),
            name_en: Set(beach.name_en.to_string()),
            name_ga: Set(beach.name_ga.to_string()),
            description_en: Set(String::new()),
            description_ga: Set(String::new()),
            classification: Set(beach.classification),
            latitude: Set(Some(beach.latitude)),
            longitude: Set(Some(beach.longitude)),
            is_active: Set(true),
            has_toilets: Set(toilets),
            has_parking: Set(parking),
            has_lifeguard: Set(lifeguard),
            has_disability_access: Set(disability_access),
            has_blue_flag: Set(blue_flag),
            dogs_allowed: Set(dogs),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        location_service::record_water_quality(
            db,
            NewWaterQuality {
                location_id: created.id,
                sample_date,
                ecoli_value: Some(45.0),
                enterococci_value: Some(28.0),
                quality_status: QualityStatus::Excellent,
                classification_year: Some(2024),
                is_current: true,
                raw_data: json!({}),
            },
        )
        .await?;
        summary.locations += 1;
        info!(name = beach.name_en, "Created sample location.");
    }
    Ok(())
}

pub async fn run(db: &DbConn) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();

    let default_la = seed_authorities(db, &mut summary).await?;
    summary.templates = template_service::ensure_templates(db).await?;

    seed_user(
        db,
        NewUser {
            email: "admin@example.com".to_string(),
            password: "adminpassword".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Admin,
            local_authority_id: Some(default_la.id),
            is_staff: true,
        },
        &mut summary,
    )
    .await?;
    seed_user(
        db,
        NewUser {
            email: "demo@example.com".to_string(),
            password: "demopassword".to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Officer,
            local_authority_id: Some(default_la.id),
            is_staff: false,
        },
        &mut summary,
    )
    .await?;

    seed_locations(db, &default_la, &mut summary).await?;
    info!(?summary, "Seeding complete.");
    Ok(summary)
}
