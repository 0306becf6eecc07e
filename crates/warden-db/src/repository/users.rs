//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{User, UserCredentials};
use crate::repository::Database;

impl Database {
    /// Insert a new user
    ///
    /// Fails with [`DbError::Duplicate`] when the username is taken.
    pub async fn insert_user(&self, user: UserCredentials) -> Result<User, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_user_write(e, &user.username))?;

        let id: i64 = result.try_get("id")?;

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users in insertion order
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Replace a user's username and password hash
    ///
    /// Returns `None` when no user has the given ID.
    pub async fn update_user(
        &self,
        id: i64,
        changes: UserCredentials,
    ) -> Result<Option<User>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = ?, password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_user_write(e, &changes.username))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_user_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::temp_database;
    use crate::{DbError, UserCredentials};

    fn credentials(username: &str, hash: &str) -> UserCredentials {
        UserCredentials {
            username: username.to_string(),
            password_hash: hash.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let (db, _dir) = temp_database().await;

        let created = db.insert_user(credentials("alice", "hash-a")).await.unwrap();
        assert!(created.id > 0);

        let by_name = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.password_hash, "hash-a");

        let by_id = db.get_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(db.get_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (db, _dir) = temp_database().await;

        db.insert_user(credentials("alice", "hash-a")).await.unwrap();
        let err = db.insert_user(credentials("alice", "hash-b")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_list_users_in_id_order() {
        let (db, _dir) = temp_database().await;

        db.insert_user(credentials("zed", "h1")).await.unwrap();
        db.insert_user(credentials("amy", "h2")).await.unwrap();

        let names: Vec<String> = db
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }

    #[tokio::test]
    async fn test_update_user() {
        let (db, _dir) = temp_database().await;

        let created = db.insert_user(credentials("alice", "old")).await.unwrap();
        let updated = db
            .update_user(created.id, credentials("alicia", "new"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, "alicia");
        assert_eq!(updated.password_hash, "new");
        assert!(updated.updated_at >= created.updated_at);
        assert!(db.get_user_by_username("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let (db, _dir) = temp_database().await;

        let result = db.update_user(999, credentials("ghost", "h")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_username_is_duplicate() {
        let (db, _dir) = temp_database().await;

        db.insert_user(credentials("alice", "h1")).await.unwrap();
        let bob = db.insert_user(credentials("bob", "h2")).await.unwrap();

        let err = db
            .update_user(bob.id, credentials("alice", "h3"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }
}
