use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::databases::fields::{optional, required};
use crate::error::ApiError;
use crate::services::password::provided;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The fields a user sees about themselves.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            address: user.address.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
}

impl RegisterPayload {
    /// Splits the payload into the stored profile and the raw password, if any.
    pub fn validate(self) -> Result<(NewUser, Option<String>), ApiError> {
        let user = NewUser {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
            mobile: required("mobile", self.mobile)?,
            address: required("address", self.address)?,
        };
        let password = provided(self.password.as_deref()).map(str::to_string);
        Ok((user, password))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub fn normalized(self) -> Result<ProfileUpdate, ApiError> {
        Ok(ProfileUpdate {
            email: required("email", self.email)?,
            name: optional(self.name),
            mobile: optional(self.mobile),
            address: optional(self.address),
        })
    }
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn user_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(exists.0)
}

pub async fn insert_user(
    pool: &PgPool,
    user: &NewUser,
    hashed_password: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, mobile, address, password)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.mobile)
    .bind(&user.address)
    .bind(hashed_password)
    .fetch_one(pool)
    .await
}

/// Applies the provided fields; absent ones keep their stored value.
pub async fn update_profile(pool: &PgPool, update: &ProfileUpdate) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            mobile = COALESCE($3, mobile),
            address = COALESCE($4, address)
        WHERE email = $1
        RETURNING *
        "#,
    )
    .bind(&update.email)
    .bind(&update.name)
    .bind(&update.mobile)
    .bind(&update.address)
    .fetch_optional(pool)
    .await
}

pub async fn set_password(pool: &PgPool, email: &str, hashed_password: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password = $2 WHERE email = $1")
        .bind(email)
        .bind(hashed_password)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Maya".into(),
            email: "maya@example.com".into(),
            mobile: "98".into(),
            address: "Bhaktapur".into(),
            password: Some("$argon2id$v=19$...".into()),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "maya@example.com");
    }

    #[test]
    fn blank_password_registers_without_credential() {
        let payload = RegisterPayload {
            name: "Maya".into(),
            email: "maya@example.com".into(),
            mobile: "98".into(),
            address: "Bhaktapur".into(),
            password: Some("   ".into()),
        };
        let (user, password) = payload.validate().unwrap();
        assert_eq!(user.email, "maya@example.com");
        assert!(password.is_none());
    }

    #[test]
    fn register_requires_email() {
        let payload = RegisterPayload {
            name: "Maya".into(),
            email: "".into(),
            mobile: "98".into(),
            address: "Bhaktapur".into(),
            password: None,
        };
        assert!(matches!(payload.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn profile_update_drops_blank_fields() {
        let update = ProfileUpdate {
            email: " maya@example.com ".into(),
            name: Some("".into()),
            mobile: Some("9801".into()),
            address: None,
        }
        .normalized()
        .unwrap();
        assert_eq!(update.email, "maya@example.com");
        assert_eq!(update.name, None);
        assert_eq!(update.mobile.as_deref(), Some("9801"));
    }
}
