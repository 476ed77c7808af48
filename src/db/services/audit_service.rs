use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde_json::Value;
use tracing::{error, info};

use crate::db::entities::{audit_log, prelude::AuditLog, user};
use crate::db::enums::AuditAction;
use crate::db::services::{PAGE_SIZE, Page};

/// An audit record waiting to be written.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub user_id: Option<i32>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub details: Value,
    pub location_id: Option<i32>,
    pub poster_id: Option<i32>,
}

impl AuditEntry {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            user_id: None,
            ip_address: None,
            user_agent: String::new(),
            details: Value::Object(Default::default()),
            location_id: None,
            poster_id: None,
        }
    }

    pub fn user(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn client(mut self, ip_address: Option<String>, user_agent: &str) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn location(mut self, location_id: i32) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn poster(mut self, poster_id: i32) -> Self {
        self.poster_id = Some(poster_id);
        self
    }
}

/// Which entries a caller may read.
#[derive(Debug, Clone, Copy)]
pub enum AuditScope {
    All,
    LocalAuthority(i32),
}

pub async fn try_record(db: &DbConn, entry: AuditEntry) -> Result<audit_log::Model, DbErr> {
    audit_log::ActiveModel {
        user_id: Set(entry.user_id),
        action: Set(entry.action),
        timestamp: Set(Utc::now()),
        ip_address: Set(entry.ip_address),
        user_agent: Set(entry.user_agent),
        details: Set(entry.details),
        location_id: Set(entry.location_id),
        poster_id: Set(entry.poster_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Writes an entry. Failures are logged and swallowed so the action itself
/// still succeeds.
pub async fn record(db: &DbConn, entry: AuditEntry) {
    let action = entry.action;
    let user_id = entry.user_id;
    match try_record(db, entry).await {
        Ok(saved) => info!(audit_id = saved.id, %action, ?user_id, "Audit entry recorded."),
        Err(e) => error!(error = %e, %action, ?user_id, "Failed to write audit entry."),
    }
}

pub async fn list_entries(
    db: &DbConn,
    scope: AuditScope,
    page: u64,
) -> Result<Page<audit_log::Model>, DbErr> {
    let mut query = AuditLog::find()
        .order_by_desc(audit_log::Column::Timestamp)
        .order_by_desc(audit_log::Column::Id);
    if let AuditScope::LocalAuthority(la_id) = scope {
        query = query
            .join(JoinType::InnerJoin, audit_log::Relation::User.def())
            .filter(user::Column::LocalAuthorityId.eq(la_id));
    }

    let paginator = query.paginate(db, PAGE_SIZE);
    let count = paginator.num_items().await?;
    let num_pages = count.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, num_pages);
    let items = paginator.fetch_page(page - 1).await?;
    Ok(Page { items, count, page, num_pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn entries_are_written_with_details() {
        let db = test_support::test_db().await;
        let la = test_support::authority(&db, "DCC").await;
        let officer = test_support::user(&db, "audit@dublincity.ie", Some(la.id)).await;

        let saved = try_record(
            &db,
            AuditEntry::new(AuditAction::UserLogin)
                .user(officer.id)
                .client(Some("10.0.0.7".to_string()), "kiosk-test/1.0")
                .details(json!({"email": officer.email})),
        )
        .await
        .unwrap();

        assert_eq!(saved.action, AuditAction::UserLogin);
        assert_eq!(saved.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(saved.user_agent, "kiosk-test/1.0");
        assert_eq!(saved.details["email"], "audit@dublincity.ie");
    }

    #[tokio::test]
    async fn authority_scope_only_sees_its_users() {
        let db = test_support::test_db().await;
        let dcc = test_support::authority(&db, "DCC").await;
        let fcc = test_support::authority(&db, "FCC").await;
        let dcc_user = test_support::user(&db, "a@dublincity.ie", Some(dcc.id)).await;
        let fcc_user = test_support::user(&db, "b@fingal.ie", Some(fcc.id)).await;

        record(&db, AuditEntry::new(AuditAction::UserLogin).user(dcc_user.id)).await;
        record(&db, AuditEntry::new(AuditAction::UserLogout).user(dcc_user.id)).await;
        record(&db, AuditEntry::new(AuditAction::UserLogin).user(fcc_user.id)).await;
        record(&db, AuditEntry::new(AuditAction::DataSync)).await;

        let all = list_entries(&db, AuditScope::All, 1).await.unwrap();
        assert_eq!(all.count, 4);

        let dcc_page = list_entries(&db, AuditScope::LocalAuthority(dcc.id), 1).await.unwrap();
        assert_eq!(dcc_page.count, 2);
        assert_eq!(dcc_page.items[0].action, AuditAction::UserLogout);
        assert!(dcc_page.items.iter().all(|e| e.user_id == Some(dcc_user.id)));
    }
}
