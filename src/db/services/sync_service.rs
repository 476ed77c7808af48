//! Pulls EPA data for known locations into the local tables.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::beaches_api::{AlertDetails, BeachDataSource, RecentMeasurement};
use crate::db::entities::{alert, location, prelude::Alert};
use crate::db::enums::{AlertType, AuditAction, QualityStatus};
use crate::db::services::audit_service::{self, AuditEntry};
use crate::db::services::location_service::{self, NewAlert, NewWaterQuality};

/// What one location's sync changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub measurement_stored: bool,
    pub alerts_created: usize,
    pub alerts_updated: usize,
    pub alerts_deactivated: usize,
}

/// Totals over a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub locations: usize,
    pub failures: usize,
    pub measurements_stored: usize,
    pub alerts_created: usize,
    pub alerts_deactivated: usize,
}

fn id_text(value: &Value) -> String {
    match value.get("id").or_else(|| value.get("alert_id")) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn optional_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

async fn store_latest_measurement(
    db: &DbConn,
    source: &dyn BeachDataSource,
    location: &location::Model,
) -> Result<bool, DbErr> {
    let Some(raw) = source.get_latest_measurement(&location.beaches_ie_id).await else {
        return Ok(false);
    };
    let measurement = RecentMeasurement::from_value(&raw);
    let Some(sample_date) = parse_date(&measurement.date) else {
        warn!(
            location_id = location.id,
            date = %measurement.date,
            "EPA measurement has no usable sample date, skipping."
        );
        return Ok(false);
    };

    let current = location_service::current_water_quality(db, location.id).await?;
    if current.is_some_and(|c| c.sample_date == sample_date) {
        debug!(location_id = location.id, %sample_date, "Measurement already stored.");
        return Ok(false);
    }

    location_service::record_water_quality(
        db,
        NewWaterQuality {
            location_id: location.id,
            sample_date,
            ecoli_value: measurement.ecoli,
            enterococci_value: measurement.enterococci,
            quality_status: QualityStatus::from_epa_label(&measurement.quality),
            classification_year: raw
                .get("classification_year")
                .and_then(Value::as_i64)
                .map(|y| y as i32),
            is_current: true,
            raw_data: raw,
        },
    )
    .await?;
    Ok(true)
}

async fn upsert_alerts(
    db: &DbConn,
    source: &dyn BeachDataSource,
    location: &location::Model,
    outcome: &mut SyncOutcome,
) -> Result<(), DbErr> {
    let reported = match source.fetch_alerts(&location.beaches_ie_id).await {
        Ok(reported) => reported,
        Err(e) => {
            warn!(
                location_id = location.id,
                error = %e,
                "EPA alerts unavailable, keeping stored alerts as they are."
            );
            return Ok(());
        }
    };
    let now = Utc::now();
    let mut seen = HashSet::new();

    for raw in reported {
        let epa_id = id_text(&raw);
        if epa_id.is_empty() {
            debug!(location_id = location.id, "EPA alert without an id, skipping.");
            continue;
        }
        seen.insert(epa_id.clone());

        let details = AlertDetails::from_value(&raw);
        let start_date = details.start_date.as_deref().and_then(parse_timestamp).unwrap_or(now);
        let end_date = details.end_date.as_deref().and_then(parse_timestamp);
        let alert_type = AlertType::from_epa_label(&details.alert_type);

        let existing = Alert::find()
            .filter(alert::Column::LocationId.eq(location.id))
            .filter(alert::Column::BeachesIeId.eq(epa_id.clone()))
            .one(db)
            .await?;

        match existing {
            Some(found) => {
                let mut active: alert::ActiveModel = found.into();
                active.alert_type = Set(alert_type);
                active.title_en = Set(details.title);
                active.message_en = Set(details.message);
                active.start_date = Set(start_date);
                active.end_date = Set(end_date);
                active.is_season_long = Set(details.is_season_long);
                active.is_active = Set(true);
                active.raw_data = Set(raw);
                active.updated_at = Set(now);
                active.update(db).await?;
                outcome.alerts_updated += 1;
            }
            None => {
                let created = location_service::create_alert(
                    db,
                    NewAlert {
                        location_id: location.id,
                        alert_type,
                        title_en: details.title,
                        title_ga: optional_str(&raw, "title_ga").to_string(),
                        message_en: details.message,
                        message_ga: optional_str(&raw, "message_ga").to_string(),
                        start_date,
                        end_date,
                        is_season_long: details.is_season_long,
                        beaches_ie_id: epa_id.clone(),
                        raw_data: raw,
                    },
                )
                .await?;
                outcome.alerts_created += 1;
                audit_service::record(
                    db,
                    AuditEntry::new(AuditAction::AlertReceived)
                        .location(location.id)
                        .details(json!({
                            "alert_id": created.id,
                            "beaches_ie_id": epa_id,
                            "alert_type": created.alert_type,
                        })),
                )
                .await;
                info!(location_id = location.id, alert_id = created.id, "New EPA alert received.");
            }
        }
    }

    // Canned data carries no alerts and says nothing about real ones.
    if source.is_mock() {
        return Ok(());
    }

    // EPA alerts that are no longer reported have ended.
    let stale = Alert::find()
        .filter(alert::Column::LocationId.eq(location.id))
        .filter(alert::Column::IsActive.eq(true))
        .filter(alert::Column::BeachesIeId.ne(""))
        .all(db)
        .await?;
    for ended in stale.into_iter().filter(|a| !seen.contains(&a.beaches_ie_id)) {
        let end_date = ended.end_date.unwrap_or(now);
        let mut active: alert::ActiveModel = ended.into();
        active.is_active = Set(false);
        active.end_date = Set(Some(end_date));
        active.updated_at = Set(now);
        active.update(db).await?;
        outcome.alerts_deactivated += 1;
    }
    Ok(())
}

/// Refreshes the current measurement and the EPA alerts of one location.
pub async fn sync_location(
    db: &DbConn,
    source: &dyn BeachDataSource,
    location: &location::Model,
) -> Result<SyncOutcome, DbErr> {
    let mut outcome = SyncOutcome {
        measurement_stored: store_latest_measurement(db, source, location).await?,
        ..Default::default()
    };
    upsert_alerts(db, source, location, &mut outcome).await?;

    audit_service::record(
        db,
        AuditEntry::new(AuditAction::DataSync)
            .location(location.id)
            .details(json!({
                "beaches_ie_id": location.beaches_ie_id,
                "measurement_stored": outcome.measurement_stored,
                "alerts_created": outcome.alerts_created,
                "alerts_updated": outcome.alerts_updated,
                "alerts_deactivated": outcome.alerts_deactivated,
            })),
    )
    .await;
    Ok(outcome)
}

/// Syncs every active location. A failing location is logged and skipped.
pub async fn sync_all(db: &DbConn, source: &dyn BeachDataSource) -> Result<SyncReport, DbErr> {
    let locations = location_service::all_active_locations(db).await?;
    let mut report = SyncReport { locations: locations.len(), ..Default::default() };

    for location in &locations {
        match sync_location(db, source, location).await {
            Ok(outcome) => {
                report.measurements_stored += usize::from(outcome.measurement_stored);
                report.alerts_created += outcome.alerts_created;
                report.alerts_deactivated += outcome.alerts_deactivated;
            }
            Err(e) => {
                report.failures += 1;
                warn!(location_id = location.id, error = %e, "EPA sync failed for location.");
            }
        }
    }

    info!(
        locations = report.locations,
        failures = report.failures,
        measurements = report.measurements_stored,
        alerts_created = report.alerts_created,
        alerts_deactivated = report.alerts_deactivated,
        "EPA sync finished."
    );
    Ok(report)
}
