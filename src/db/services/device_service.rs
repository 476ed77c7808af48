use chrono::{DateTime, Utc};
use rand::random;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::Value;

use crate::db::entities::{device, device_location, device_token, location, prelude::*};
use crate::db::enums::DeviceType;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("Device not found: {0}")]
    NotFound(i32),
    #[error("Location {0} does not belong to this local authority.")]
    ForeignLocation(i32),
}

/// Reasons a kiosk request is refused. Messages are returned verbatim.
#[derive(Debug, thiserror::Error)]
pub enum DeviceAuthError {
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,
    #[error("Invalid token header. No credentials provided.")]
    NoCredentials,
    #[error("Invalid token header. Token should not contain spaces.")]
    TokenHasSpaces,
    #[error("Invalid or inactive token.")]
    InvalidToken,
    #[error("Token has expired.")]
    Expired,
    #[error("Device is inactive.")]
    DeviceInactive,
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub device_type: DeviceType,
    #[serde(default)]
    pub metadata: Value,
}

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    hex::encode(random::<[u8; 32]>())
}

pub async fn create_device(
    db: &DbConn,
    local_authority_id: i32,
    new: NewDevice,
) -> Result<device::Model, DbErr> {
    let metadata = if new.metadata.is_null() {
        Value::Object(Default::default())
    } else {
        new.metadata
    };
    device::ActiveModel {
        name: Set(new.name),
        local_authority_id: Set(local_authority_id),
        device_type: Set(new.device_type),
        is_active: Set(true),
        last_seen: Set(None),
        metadata: Set(metadata),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn list_devices(db: &DbConn, local_authority_id: i32) -> Result<Vec<device::Model>, DbErr> {
    Device::find()
        .filter(device::Column::LocalAuthorityId.eq(local_authority_id))
        .order_by_asc(device::Column::Name)
        .all(db)
        .await
}

pub async fn get_device(
    db: &DbConn,
    local_authority_id: i32,
    device_id: i32,
) -> Result<device::Model, DeviceError> {
    Device::find_by_id(device_id)
        .filter(device::Column::LocalAuthorityId.eq(local_authority_id))
        .one(db)
        .await?
        .ok_or(DeviceError::NotFound(device_id))
}

pub async fn issue_token(
    db: &DbConn,
    device_id: i32,
    expires_at: Option<DateTime<Utc>>,
) -> Result<device_token::Model, DbErr> {
    device_token::ActiveModel {
        device_id: Set(device_id),
        token: Set(generate_token()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        last_used: Set(None),
        expires_at: Set(expires_at),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Resolves a presented token to its device and stamps usage times.
pub async fn authenticate(
    db: &DbConn,
    token: &str,
) -> Result<(device::Model, device_token::Model), DeviceAuthError> {
    let found = DeviceToken::find()
        .filter(device_token::Column::Token.eq(token))
        .filter(device_token::Column::IsActive.eq(true))
        .find_also_related(Device)
        .one(db)
        .await?;

    let (token_model, device_model) = match found {
        Some((t, Some(d))) => (t, d),
        _ => return Err(DeviceAuthError::InvalidToken),
    };

    let now = Utc::now();
    if token_model.expires_at.is_some_and(|exp| exp <= now) {
        return Err(DeviceAuthError::Expired);
    }
    if !device_model.is_active {
        return Err(DeviceAuthError::DeviceInactive);
    }

    let mut token_active: device_token::ActiveModel = token_model.into();
    token_active.last_used = Set(Some(now));
    let token_model = token_active.update(db).await?;

    let mut device_active: device::ActiveModel = device_model.into();
    device_active.last_seen = Set(Some(now));
    let device_model = device_active.update(db).await?;

    Ok((device_model, token_model))
}

pub async fn assigned_location_ids(db: &DbConn, device_id: i32) -> Result<Vec<i32>, DbErr> {
    DeviceLocation::find()
        .select_only()
        .column(device_location::Column::LocationId)
        .filter(device_location::Column::DeviceId.eq(device_id))
        .order_by_asc(device_location::Column::LocationId)
        .into_tuple()
        .all(db)
        .await
}

/// Replaces the device's assigned locations. An empty list means "all of the
/// authority's locations".
pub async fn set_device_locations(
    db: &DbConn,
    local_authority_id: i32,
    device_id: i32,
    location_ids: &[i32],
) -> Result<Vec<i32>, DeviceError> {
    get_device(db, local_authority_id, device_id).await?;

    let owned: Vec<i32> = Location::find()
        .select_only()
        .column(location::Column::Id)
        .filter(location::Column::LocalAuthorityId.eq(local_authority_id))
        .filter(location::Column::Id.is_in(location_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;
    if let Some(foreign) = location_ids.iter().find(|id| !owned.contains(id)) {
        return Err(DeviceError::ForeignLocation(*foreign));
    }

    let txn = db.begin().await?;
    DeviceLocation::delete_many()
        .filter(device_location::Column::DeviceId.eq(device_id))
        .exec(&txn)
        .await?;
    let mut ids: Vec<i32> = location_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    for location_id in &ids {
        device_location::ActiveModel {
            device_id: Set(device_id),
            location_id: Set(*location_id),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;
    Ok(ids)
}

fn visible_query(device: &device::Model, assigned: &[i32]) -> sea_orm::Select<Location> {
    let mut query = Location::find()
        .filter(location::Column::LocalAuthorityId.eq(device.local_authority_id))
        .filter(location::Column::IsActive.eq(true))
        .order_by_asc(location::Column::NameEn);
    if !assigned.is_empty() {
        query = query.filter(location::Column::Id.is_in(assigned.iter().copied()));
    }
    query
}

/// Active locations of the device's authority, narrowed to its assigned
/// locations when it has any.
pub async fn visible_locations(
    db: &DbConn,
    device: &device::Model,
) -> Result<Vec<location::Model>, DbErr> {
    let assigned = assigned_location_ids(db, device.id).await?;
    visible_query(device, &assigned).all(db).await
}

pub async fn visible_location(
    db: &DbConn,
    device: &device::Model,
    location_id: i32,
) -> Result<Option<location::Model>, DbErr> {
    let assigned = assigned_location_ids(db, device.id).await?;
    visible_query(device, &assigned)
        .filter(location::Column::Id.eq(location_id))
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::Classification;
    use crate::test_support;
    use chrono::Duration;

    #[test]
    fn tokens_are_64_hex_chars() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn authentication_outcomes() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let device = test_support::device(&db, la.id).await;

        let good = issue_token(&db, device.id, None).await.unwrap();
        let (authed, used) = authenticate(&db, &good.token).await.unwrap();
        assert_eq!(authed.id, device.id);
        assert!(authed.last_seen.is_some());
        assert!(used.last_used.is_some());

        assert!(matches!(
            authenticate(&db, "not-a-token").await,
            Err(DeviceAuthError::InvalidToken)
        ));

        let expired = issue_token(&db, device.id, Some(Utc::now() - Duration::hours(1)))
            .await
            .unwrap();
        let err = authenticate(&db, &expired.token).await.unwrap_err();
        assert_eq!(err.to_string(), "Token has expired.");

        let mut revoked: device_token::ActiveModel = good.clone().into();
        revoked.is_active = Set(false);
        revoked.update(&db).await.unwrap();
        let err = authenticate(&db, &good.token).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid or inactive token.");

        let fresh = issue_token(&db, device.id, Some(Utc::now() + Duration::days(30)))
            .await
            .unwrap();
        let mut disabled: device::ActiveModel = device.into();
        disabled.is_active = Set(false);
        disabled.update(&db).await.unwrap();
        let err = authenticate(&db, &fresh.token).await.unwrap_err();
        assert_eq!(err.to_string(), "Device is inactive.");
    }

    #[tokio::test]
    async fn assigned_locations_narrow_visibility() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let other = test_support::authority(&db, "FCC").await;
        let a = test_support::location(&db, la.id, "IE_A", Classification::Identified).await;
        let b = test_support::location(&db, la.id, "IE_B", Classification::Identified).await;
        let foreign = test_support::location(&db, other.id, "IE_F", Classification::Identified).await;
        let device = test_support::device(&db, la.id).await;

        let all = visible_locations(&db, &device).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(visible_location(&db, &device, foreign.id).await.unwrap().is_none());

        let err = set_device_locations(&db, la.id, device.id, &[a.id, foreign.id])
            .await
            .unwrap_err();
        assert!(matches!(err, DeviceError::ForeignLocation(id) if id == foreign.id));

        let ids = set_device_locations(&db, la.id, device.id, &[b.id, b.id]).await.unwrap();
        assert_eq!(ids, vec![b.id]);
        let narrowed = visible_locations(&db, &device).await.unwrap();
        assert_eq!(narrowed.iter().map(|l| l.id).collect::<Vec<_>>(), vec![b.id]);
        assert!(visible_location(&db, &device, a.id).await.unwrap().is_none());

        set_device_locations(&db, la.id, device.id, &[]).await.unwrap();
        assert_eq!(visible_locations(&db, &device).await.unwrap().len(), 2);
    }
}
