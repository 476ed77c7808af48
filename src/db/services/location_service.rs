use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, Query},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::db::entities::{alert, location, prelude::*, water_quality_data};
use crate::db::enums::{AlertType, Classification, QualityStatus};
use crate::db::services::{PAGE_SIZE, Page};

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("Location not found: {0}")]
    NotFound(i32),
    #[error("A location with beaches.ie ID '{0}' already exists.")]
    DuplicateBeachId(String),
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LocationFilter {
    pub search: Option<String>,
    pub classification: Option<Classification>,
    /// "yes" or "no"; anything else is ignored.
    pub has_alert: Option<String>,
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapPoint {
    pub id: i32,
    pub name_en: String,
    pub name_ga: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub classification: Classification,
    pub has_alert: bool,
    pub quality_status: Option<QualityStatus>,
    pub beaches_ie_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLocation {
    pub beaches_ie_id: String,
    pub name_en: String,
    #[serde(default)]
    pub name_ga: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ga: String,
    pub classification: Classification,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Fields an officer may edit on a location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationUpdate {
    pub name_en: String,
    #[serde(default)]
    pub name_ga: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ga: String,
    pub classification: Classification,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub has_toilets: bool,
    pub has_parking: bool,
    pub has_lifeguard: bool,
    pub has_disability_access: bool,
    pub has_blue_flag: bool,
    pub dogs_allowed: bool,
}

#[derive(Debug, Clone)]
pub struct NewWaterQuality {
    pub location_id: i32,
    pub sample_date: NaiveDate,
    pub ecoli_value: Option<f64>,
    pub enterococci_value: Option<f64>,
    pub quality_status: QualityStatus,
    pub classification_year: Option<i32>,
    pub is_current: bool,
    pub raw_data: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub location_id: i32,
    pub alert_type: AlertType,
    pub title_en: String,
    pub title_ga: String,
    pub message_en: String,
    pub message_ga: String,
    pub start_date: chrono::DateTime<Utc>,
    pub end_date: Option<chrono::DateTime<Utc>>,
    pub is_season_long: bool,
    pub beaches_ie_id: String,
    pub raw_data: serde_json::Value,
}

pub async fn get_location(
    db: &DbConn,
    local_authority_id: i32,
    location_id: i32,
) -> Result<Option<location::Model>, DbErr> {
    Location::find_by_id(location_id)
        .filter(location::Column::LocalAuthorityId.eq(local_authority_id))
        .one(db)
        .await
}

pub async fn active_locations_for_authority(
    db: &DbConn,
    local_authority_id: i32,
) -> Result<Vec<location::Model>, DbErr> {
    Location::find()
        .filter(location::Column::LocalAuthorityId.eq(local_authority_id))
        .filter(location::Column::IsActive.eq(true))
        .order_by_asc(location::Column::NameEn)
        .all(db)
        .await
}

/// Every active location of every authority, for the EPA sync.
pub async fn all_active_locations(db: &DbConn) -> Result<Vec<location::Model>, DbErr> {
    Location::find()
        .filter(location::Column::IsActive.eq(true))
        .order_by_asc(location::Column::Id)
        .all(db)
        .await
}

/// Ids among `location_ids` that have at least one active alert.
pub async fn locations_with_active_alerts<C: ConnectionTrait>(
    db: &C,
    location_ids: &[i32],
) -> Result<HashSet<i32>, DbErr> {
    if location_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids: Vec<i32> = Alert::find()
        .select_only()
        .column(alert::Column::LocationId)
        .filter(alert::Column::IsActive.eq(true))
        .filter(alert::Column::LocationId.is_in(location_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Current quality status keyed by location id.
pub async fn current_quality_statuses<C: ConnectionTrait>(
    db: &C,
    location_ids: &[i32],
) -> Result<HashMap<i32, QualityStatus>, DbErr> {
    if location_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = WaterQualityData::find()
        .filter(water_quality_data::Column::IsCurrent.eq(true))
        .filter(water_quality_data::Column::LocationId.is_in(location_ids.iter().copied()))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.location_id, r.quality_status)).collect())
}

/// Active locations of one authority, filtered and paginated in SQL.
pub async fn list_locations(
    db: &DbConn,
    local_authority_id: i32,
    filter: &LocationFilter,
) -> Result<Page<location::Model>, DbErr> {
    let mut query = Location::find()
        .filter(location::Column::LocalAuthorityId.eq(local_authority_id))
        .filter(location::Column::IsActive.eq(true))
        .order_by_asc(location::Column::NameEn)
        .order_by_asc(location::Column::Id);
    if let Some(classification) = filter.classification {
        query = query.filter(location::Column::Classification.eq(classification));
    }

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let escaped = search
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        let name_like = |column: location::Column| {
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };
        query = query.filter(
            Condition::any()
                .add(name_like(location::Column::NameEn))
                .add(name_like(location::Column::NameGa)),
        );
    }

    let alerted = Query::select()
        .column(alert::Column::LocationId)
        .from(Alert)
        .and_where(Expr::col(alert::Column::IsActive).eq(true))
        .to_owned();
    match filter.has_alert.as_deref() {
        Some("yes") => query = query.filter(location::Column::Id.in_subquery(alerted)),
        Some("no") => query = query.filter(location::Column::Id.not_in_subquery(alerted)),
        _ => {}
    }

    let paginator = query.paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;
    let num_pages = totals.number_of_pages.max(1);
    let page = filter.page.unwrap_or(1).clamp(1, num_pages);
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Page { items, count: totals.number_of_items, page, num_pages })
}

pub async fn map_data(db: &DbConn, local_authority_id: i32) -> Result<Vec<MapPoint>, DbErr> {
    let locations = active_locations_for_authority(db, local_authority_id).await?;
    let ids: Vec<i32> = locations.iter().map(|l| l.id).collect();
    let alerted = locations_with_active_alerts(db, &ids).await?;
    let statuses = current_quality_statuses(db, &ids).await?;

    Ok(locations
        .into_iter()
        .map(|l| MapPoint {
            id: l.id,
            has_alert: alerted.contains(&l.id),
            quality_status: statuses.get(&l.id).copied(),
            name_en: l.name_en,
            name_ga: l.name_ga,
            lat: l.latitude,
            lng: l.longitude,
            classification: l.classification,
            beaches_ie_id: l.beaches_ie_id,
        })
        .collect())
}

pub async fn current_water_quality(
    db: &DbConn,
    location_id: i32,
) -> Result<Option<water_quality_data::Model>, DbErr> {
    WaterQualityData::find()
        .filter(water_quality_data::Column::LocationId.eq(location_id))
        .filter(water_quality_data::Column::IsCurrent.eq(true))
        .order_by_desc(water_quality_data::Column::SampleDate)
        .one(db)
        .await
}

pub async fn quality_history(
    db: &DbConn,
    location_id: i32,
    limit: u64,
) -> Result<Vec<water_quality_data::Model>, DbErr> {
    WaterQualityData::find()
        .filter(water_quality_data::Column::LocationId.eq(location_id))
        .order_by_desc(water_quality_data::Column::SampleDate)
        .limit(limit)
        .all(db)
        .await
}

pub async fn active_alerts(db: &DbConn, location_id: i32) -> Result<Vec<alert::Model>, DbErr> {
    Alert::find()
        .filter(alert::Column::LocationId.eq(location_id))
        .filter(alert::Column::IsActive.eq(true))
        .order_by_desc(alert::Column::StartDate)
        .order_by_desc(alert::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn has_active_alert(db: &DbConn, location_id: i32) -> Result<bool, DbErr> {
    Ok(!locations_with_active_alerts(db, &[location_id]).await?.is_empty())
}

pub async fn create_location(
    db: &DbConn,
    local_authority_id: i32,
    new: NewLocation,
) -> Result<location::Model, LocationError> {
    let beaches_ie_id = new.beaches_ie_id.trim().to_string();
    let exists = Location::find()
        .filter(location::Column::BeachesIeId.eq(beaches_ie_id.clone()))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(LocationError::DuplicateBeachId(beaches_ie_id));
    }

    let now = Utc::now();
    let model = location::ActiveModel {
        local_authority_id: Set(local_authority_id),
        beaches_ie_id: Set(beaches_ie_id),
        name_en: Set(new.name_en),
        name_ga: Set(new.name_ga),
        description_en: Set(new.description_en),
        description_ga: Set(new.description_ga),
        classification: Set(new.classification),
        latitude: Set(new.latitude),
        longitude: Set(new.longitude),
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
    };
    Ok(model.insert(db).await?)
}

pub async fn update_location(
    db: &DbConn,
    local_authority_id: i32,
    location_id: i32,
    update: LocationUpdate,
) -> Result<location::Model, LocationError> {
    let existing = get_location(db, local_authority_id, location_id)
        .await?
        .ok_or(LocationError::NotFound(location_id))?;

    let mut active: location::ActiveModel = existing.into();
    active.name_en = Set(update.name_en);
    active.name_ga = Set(update.name_ga);
    active.description_en = Set(update.description_en);
    active.description_ga = Set(update.description_ga);
    active.classification = Set(update.classification);
    active.latitude = Set(update.latitude);
    active.longitude = Set(update.longitude);
    active.is_active = Set(update.is_active);
    active.has_toilets = Set(update.has_toilets);
    active.has_parking = Set(update.has_parking);
    active.has_lifeguard = Set(update.has_lifeguard);
    active.has_disability_access = Set(update.has_disability_access);
    active.has_blue_flag = Set(update.has_blue_flag);
    active.dogs_allowed = Set(update.dogs_allowed);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Stores a sample. A current sample clears the flag on the location's
/// other samples in the same transaction.
pub async fn record_water_quality(
    db: &DbConn,
    new: NewWaterQuality,
) -> Result<water_quality_data::Model, DbErr> {
    let txn = db.begin().await?;

    if new.is_current {
        WaterQualityData::update_many()
            .col_expr(water_quality_data::Column::IsCurrent, Expr::value(false))
            .filter(water_quality_data::Column::LocationId.eq(new.location_id))
            .filter(water_quality_data::Column::IsCurrent.eq(true))
            .exec(&txn)
            .await?;
    }

    let saved = water_quality_data::ActiveModel {
        location_id: Set(new.location_id),
        sample_date: Set(new.sample_date),
        ecoli_value: Set(new.ecoli_value),
        enterococci_value: Set(new.enterococci_value),
        quality_status: Set(new.quality_status),
        classification_year: Set(new.classification_year),
        is_current: Set(new.is_current),
        raw_data: Set(new.raw_data),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(saved)
}

pub async fn create_alert(db: &DbConn, new: NewAlert) -> Result<alert::Model, DbErr> {
    let now = Utc::now();
    alert::ActiveModel {
        location_id: Set(new.location_id),
        alert_type: Set(new.alert_type),
        title_en: Set(new.title_en),
        title_ga: Set(new.title_ga),
        message_en: Set(new.message_en),
        message_ga: Set(new.message_ga),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        is_active: Set(true),
        is_season_long: Set(new.is_season_long),
        beaches_ie_id: Set(new.beaches_ie_id),
        raw_data: Set(new.raw_data),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    fn sample(location_id: i32, day: u32, status: QualityStatus, is_current: bool) -> NewWaterQuality {
        NewWaterQuality {
            location_id,
            sample_date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            ecoli_value: Some(40.0),
            enterococci_value: Some(20.0),
            quality_status: status,
            classification_year: Some(2024),
            is_current,
            raw_data: json!({}),
        }
    }

    #[tokio::test]
    async fn only_one_current_sample_per_location() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let a = test_support::location(&db, la.id, "IE_A", Classification::Identified).await;
        let b = test_support::location(&db, la.id, "IE_B", Classification::Identified).await;

        record_water_quality(&db, sample(a.id, 1, QualityStatus::Good, true)).await.unwrap();
        record_water_quality(&db, sample(b.id, 1, QualityStatus::Poor, true)).await.unwrap();
        let latest = record_water_quality(&db, sample(a.id, 8, QualityStatus::Excellent, true))
            .await
            .unwrap();
        record_water_quality(&db, sample(a.id, 15, QualityStatus::Sufficient, false))
            .await
            .unwrap();

        let current_rows = WaterQualityData::find()
            .filter(water_quality_data::Column::LocationId.eq(a.id))
            .filter(water_quality_data::Column::IsCurrent.eq(true))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(current_rows.len(), 1);
        assert_eq!(current_rows[0].id, latest.id);

        let current_b = current_water_quality(&db, b.id).await.unwrap().unwrap();
        assert_eq!(current_b.quality_status, QualityStatus::Poor);

        let history = quality_history(&db, a.id, 10).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].sample_date, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
    }

    #[tokio::test]
    async fn locations_are_scoped_to_their_authority() {
        let db = test_support::test_db().await;
        let dcc = test_support::authority(&db, "DCC").await;
        let fcc = test_support::authority(&db, "FCC").await;
        let loc = test_support::location(&db, dcc.id, "IE_DCC", Classification::Identified).await;

        assert!(get_location(&db, dcc.id, loc.id).await.unwrap().is_some());
        assert!(get_location(&db, fcc.id, loc.id).await.unwrap().is_none());

        let page = list_locations(&db, fcc.id, &LocationFilter::default()).await.unwrap();
        assert_eq!(page.count, 0);
    }

    #[tokio::test]
    async fn list_hides_inactive_locations_and_pages_in_sql() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let retired = test_support::location(&db, la.id, "IE_RETIRED", Classification::Identified).await;
        let mut active: location::ActiveModel = retired.clone().into();
        active.is_active = Set(false);
        active.update(&db).await.unwrap();
        for n in 0..21 {
            test_support::location(&db, la.id, &format!("IE_{n:02}"), Classification::Identified).await;
        }

        let first = list_locations(&db, la.id, &LocationFilter::default()).await.unwrap();
        assert_eq!(first.count, 21);
        assert_eq!(first.num_pages, 2);
        assert_eq!(first.items.len(), 20);
        assert!(first.items.iter().all(|l| l.id != retired.id));

        let last = list_locations(
            &db,
            la.id,
            &LocationFilter { page: Some(9), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(last.page, 2);
        assert_eq!(last.items.len(), 1);

        let literal = list_locations(
            &db,
            la.id,
            &LocationFilter { search: Some("100%".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(literal.count, 0);
    }

    #[tokio::test]
    async fn list_filters_by_search_classification_and_alert() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let dollymount = test_support::location(&db, la.id, "IE_DOLLY", Classification::Identified).await;
        let mut active: location::ActiveModel = dollymount.clone().into();
        active.name_en = Set("Dollymount Strand".to_string());
        active.name_ga = Set("Trá Dhollaimh".to_string());
        let dollymount = active.update(&db).await.unwrap();
        let other = test_support::location(&db, la.id, "IE_OTHER", Classification::NonIdentified).await;

        test_support::alert(&db, other.id, false).await;

        let by_name = list_locations(
            &db,
            la.id,
            &LocationFilter { search: Some("dolly".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(by_name.items.iter().map(|l| l.id).collect::<Vec<_>>(), vec![dollymount.id]);

        let by_irish = list_locations(
            &db,
            la.id,
            &LocationFilter { search: Some("TRÁ".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(by_irish.count, 1);

        let non_identified = list_locations(
            &db,
            la.id,
            &LocationFilter { classification: Some(Classification::NonIdentified), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(non_identified.items[0].id, other.id);

        let alerted = list_locations(
            &db,
            la.id,
            &LocationFilter { has_alert: Some("yes".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(alerted.items.iter().map(|l| l.id).collect::<Vec<_>>(), vec![other.id]);

        let clear = list_locations(
            &db,
            la.id,
            &LocationFilter { has_alert: Some("no".to_string()), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(clear.items.iter().map(|l| l.id).collect::<Vec<_>>(), vec![dollymount.id]);

        assert!(has_active_alert(&db, other.id).await.unwrap());
        assert!(!has_active_alert(&db, dollymount.id).await.unwrap());
    }

    #[tokio::test]
    async fn map_data_reports_alert_and_quality() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let loc = test_support::location(&db, la.id, "IE_MAP", Classification::Identified).await;
        record_water_quality(&db, sample(loc.id, 3, QualityStatus::Excellent, true)).await.unwrap();
        test_support::alert(&db, loc.id, true).await;

        let points = map_data(&db, la.id).await.unwrap();
        assert_eq!(points.len(), 1);
        assert!(points[0].has_alert);
        assert_eq!(points[0].quality_status, Some(QualityStatus::Excellent));
        assert_eq!(points[0].beaches_ie_id, "IE_MAP");
    }

    #[tokio::test]
    async fn duplicate_beach_id_is_rejected() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        test_support::location(&db, la.id, "IE_DUP", Classification::Identified).await;

        let err = create_location(
            &db,
            la.id,
            NewLocation {
                beaches_ie_id: "IE_DUP".to_string(),
                name_en: "Duplicate".to_string(),
                name_ga: String::new(),
                description_en: String::new(),
                description_ga: String::new(),
                classification: Classification::Identified,
                latitude: None,
                longitude: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LocationError::DuplicateBeachId(id) if id == "IE_DUP"));
    }

    #[tokio::test]
    async fn update_is_scoped_and_applies_fields() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let other = test_support::authority(&db, "WCC").await;
        let loc = test_support::location(&db, la.id, "IE_UPD", Classification::Identified).await;

        let update = LocationUpdate {
            name_en: "Seapoint".to_string(),
            name_ga: "Rinn na Mara".to_string(),
            description_en: String::new(),
            description_ga: String::new(),
            classification: Classification::Identified,
            latitude: Some(53.29),
            longitude: Some(-6.16),
            is_active: true,
            has_toilets: true,
            has_parking: false,
            has_lifeguard: true,
            has_disability_access: false,
            has_blue_flag: false,
            dogs_allowed: false,
        };

        let err = update_location(&db, other.id, loc.id, update.clone()).await.unwrap_err();
        assert!(matches!(err, LocationError::NotFound(_)));

        let updated = update_location(&db, la.id, loc.id, update).await.unwrap();
        assert_eq!(updated.get_name("ga"), "Rinn na Mara");
        assert_eq!(updated.facilities()["toilets"], true);
        assert_eq!(updated.facilities()["dogs_allowed"], false);
    }
}
