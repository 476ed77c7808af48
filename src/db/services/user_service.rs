use bcrypt::{DEFAULT_COST, hash};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::db::entities::{prelude::User, user};
use crate::db::enums::UserRole;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("A user with the email '{0}' already exists.")]
    EmailTaken(String),
    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),
    #[error("User not found: {0}")]
    NotFound(i32),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub local_authority_id: Option<i32>,
    pub is_staff: bool,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Emails are stored lower-cased; login is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
}

pub async fn get_user(db: &DbConn, id: i32) -> Result<Option<user::Model>, DbErr> {
    User::find_by_id(id).one(db).await
}

pub async fn create_user(db: &DbConn, new: NewUser) -> Result<user::Model, UserServiceError> {
    let email = normalize_email(&new.email);
    if find_by_email(db, &email).await?.is_some() {
        return Err(UserServiceError::EmailTaken(email));
    }

    let password = new.password;
    let password_hash = tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| UserServiceError::PasswordHashing(e.to_string()))?
        .map_err(|e| UserServiceError::PasswordHashing(e.to_string()))?;

    let now = Utc::now();
    let model = user::ActiveModel {
        email: Set(email),
        password_hash: Set(password_hash),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        phone: Set(String::new()),
        role: Set(new.role),
        local_authority_id: Set(new.local_authority_id),
        is_staff: Set(new.is_staff),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

pub async fn update_profile(
    db: &DbConn,
    user_id: i32,
    update: ProfileUpdate,
) -> Result<user::Model, UserServiceError> {
    let existing = get_user(db, user_id)
        .await?
        .ok_or(UserServiceError::NotFound(user_id))?;

    let mut active: user::ActiveModel = existing.into();
    active.first_name = Set(update.first_name.trim().to_string());
    active.last_name = Set(update.last_name.trim().to_string());
    active.phone = Set(update.phone.trim().to_string());
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

pub async fn record_login(db: &DbConn, user: user::Model) -> Result<user::Model, DbErr> {
    let mut active: user::ActiveModel = user.into();
    active.last_login = Set(Some(Utc::now()));
    active.update(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn email_is_unique_and_case_insensitive() {
        let db = test_support::test_db().await;
        let user = test_support::user(&db, "Officer@DublinCity.ie", None).await;
        assert_eq!(user.email, "officer@dublincity.ie");

        let found = find_by_email(&db, "OFFICER@dublincity.ie").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let err = create_user(
            &db,
            NewUser {
                email: "officer@dublincity.ie".to_string(),
                password: "another-password".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: UserRole::Officer,
                local_authority_id: None,
                is_staff: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UserServiceError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn profile_update_trims_fields() {
        let db = test_support::test_db().await;
        let user = test_support::user(&db, "profile@fingal.ie", None).await;
        assert_eq!(user.full_name(), "profile@fingal.ie");

        let updated = update_profile(
            &db,
            user.id,
            ProfileUpdate {
                first_name: " Aoife ".to_string(),
                last_name: "Byrne".to_string(),
                phone: "01 555 0100".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.full_name(), "Aoife Byrne");
        assert_eq!(updated.phone, "01 555 0100");

        let missing = update_profile(
            &db,
            9999,
            ProfileUpdate { first_name: String::new(), last_name: String::new(), phone: String::new() },
        )
        .await;
        assert!(matches!(missing, Err(UserServiceError::NotFound(9999))));
    }
}
