//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use sqlx::Row;

/// User account as stored in the `users` table
///
/// The password hash is an opaque PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Username and hashed password, written on create and update
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
    pub password_hash: String,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_datetime_or_now(row.try_get("created_at")?),
            updated_at: parse_datetime_or_now(row.try_get("updated_at")?),
        })
    }
}
