use serde::{Deserialize, Serialize};

use crate::db::entities::{local_authority, user};
use crate::db::enums::UserRole;
use crate::db::services::Page;

pub mod kiosk_models;
pub mod poster_models;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: ProfileResponse,
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub user_id: i32,
    pub exp: usize,
}

/// The active account behind the session, inserted by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: user::Model,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }
}

/// The signed-in officer and the authority they act for. Inserted by the
/// organisation guard.
#[derive(Debug, Clone)]
pub struct CurrentOrganisation {
    pub user: user::Model,
    pub local_authority: local_authority::Model,
}

impl CurrentOrganisation {
    pub fn id(&self) -> i32 {
        self.local_authority.id
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    pub role: UserRole,
    pub local_authority_id: Option<i32>,
    pub local_authority_name: Option<String>,
    pub is_staff: bool,
    pub can_manage_users: bool,
}

impl ProfileResponse {
    pub fn new(user: &user::Model, local_authority: Option<&local_authority::Model>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            phone: user.phone.clone(),
            role: user.role,
            local_authority_id: user.local_authority_id,
            local_authority_name: local_authority.map(|la| la.name.clone()),
            is_staff: user.is_staff,
            can_manage_users: user.can_manage_users(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocalAuthorityDetail {
    #[serde(flatten)]
    pub local_authority: local_authority::Model,
    pub users_count: u64,
    pub locations_count: u64,
}

/// Paginated listing for the officer-facing API.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: u64,
    pub page: u64,
    pub num_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub results: Vec<T>,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            count: page.count,
            page: page.page,
            num_pages: page.num_pages,
            results: page.items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}
