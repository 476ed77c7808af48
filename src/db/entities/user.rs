use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::UserRole;

/// Login account and profile of a council officer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: UserRole,
    pub local_authority_id: Option<i32>,
    pub is_staff: bool,
    pub is_active: bool,
    pub last_login: Option<ChronoDateTimeUtc>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::local_authority::Entity",
        from = "Column::LocalAuthorityId",
        to = "super::local_authority::Column::Id",
        on_delete = "SetNull",
        on_update = "Cascade"
    )]
    LocalAuthority,
    #[sea_orm(has_many = "super::audit_log::Entity")]
    AuditLogs,
}

impl Related<super::local_authority::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalAuthority.def()
    }
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// "First Last", or the email when no name is set.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_la_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::LaAdmin)
    }

    pub fn can_manage_users(&self) -> bool {
        self.is_la_admin()
    }

    pub fn can_access_location(&self, location: &super::location::Model) -> bool {
        match self.local_authority_id {
            Some(la_id) => la_id == location.local_authority_id,
            None => false,
        }
    }
}
