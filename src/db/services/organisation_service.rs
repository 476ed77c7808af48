use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::{local_authority, location, prelude::*, user};

/// Codes and names of the Irish Local Authorities.
pub const IRISH_LOCAL_AUTHORITIES: &[(&str, &str)] = &[
    ("CE", "Clare County Council"),
    ("CN", "Cavan County Council"),
    ("CO", "Cork County Council"),
    ("CW", "Carlow County Council"),
    ("DCC", "Dublin City Council"),
    ("DL", "Donegal County Council"),
    ("DLRCC", "Dún Laoghaire-Rathdown County Council"),
    ("FCC", "Fingal County Council"),
    ("GY", "Galway County Council"),
    ("KE", "Kildare County Council"),
    ("KK", "Kilkenny County Council"),
    ("KY", "Kerry County Council"),
    ("LD", "Longford County Council"),
    ("LH", "Louth County Council"),
    ("LK", "Limerick City and County Council"),
    ("LM", "Leitrim County Council"),
    ("LS", "Laois County Council"),
    ("MH", "Meath County Council"),
    ("MN", "Monaghan County Council"),
    ("MO", "Mayo County Council"),
    ("OY", "Offaly County Council"),
    ("RN", "Roscommon County Council"),
    ("SDCC", "South Dublin County Council"),
    ("SO", "Sligo County Council"),
    ("TA", "Tipperary County Council"),
    ("WD", "Waterford City and County Council"),
    ("WH", "Westmeath County Council"),
    ("WX", "Wexford County Council"),
    ("WW", "Wicklow County Council"),
];

/// Looks up the official name for an authority code.
pub fn authority_name_for_code(code: &str) -> Option<&'static str> {
    IRISH_LOCAL_AUTHORITIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone)]
pub struct NewLocalAuthority {
    pub name: String,
    pub code: String,
    pub email_domain: String,
    pub contact_email: String,
    pub website: String,
}

pub async fn list_local_authorities(db: &DbConn) -> Result<Vec<local_authority::Model>, DbErr> {
    LocalAuthority::find()
        .order_by_asc(local_authority::Column::Name)
        .all(db)
        .await
}

pub async fn get_local_authority(
    db: &DbConn,
    id: i32,
) -> Result<Option<local_authority::Model>, DbErr> {
    LocalAuthority::find_by_id(id).one(db).await
}

pub async fn get_by_code(db: &DbConn, code: &str) -> Result<Option<local_authority::Model>, DbErr> {
    LocalAuthority::find()
        .filter(local_authority::Column::Code.eq(code.to_ascii_uppercase()))
        .one(db)
        .await
}

pub async fn create_local_authority(
    db: &DbConn,
    new: NewLocalAuthority,
) -> Result<local_authority::Model, DbErr> {
    let now = Utc::now();
    local_authority::ActiveModel {
        name: Set(new.name),
        code: Set(new.code.to_ascii_uppercase()),
        email_domain: Set(new.email_domain),
        contact_email: Set(new.contact_email),
        primary_colour: Set("#0066CC".to_string()),
        secondary_colour: Set("#FFFFFF".to_string()),
        address: Set(String::new()),
        website: Set(new.website),
        phone: Set(String::new()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn active_user_count(db: &DbConn, local_authority_id: i32) -> Result<u64, DbErr> {
    User::find()
        .filter(user::Column::LocalAuthorityId.eq(local_authority_id))
        .filter(user::Column::IsActive.eq(true))
        .count(db)
        .await
}

pub async fn active_location_count(db: &DbConn, local_authority_id: i32) -> Result<u64, DbErr> {
    Location::find()
        .filter(location::Column::LocalAuthorityId.eq(local_authority_id))
        .filter(location::Column::IsActive.eq(true))
        .count(db)
        .await
}
