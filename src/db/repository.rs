//! User repository for huddle.

use sqlx::SqlitePool;

use super::user::{NewUser, User};
use crate::{HuddleError, Result};

/// Repository for user identity lookups.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (username, is_anonymous) VALUES (?, ?)")
            .bind(&new_user.username)
            .bind(new_user.is_anonymous)
            .execute(self.pool)
            .await
            .map_err(|e| HuddleError::Storage(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| HuddleError::Storage("user not found after insert".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT user_id, username, is_anonymous FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| HuddleError::Storage(e.to_string()))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("alice")).await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(!user.is_anonymous);

        let fetched = repo.get_by_id(user.user_id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "alice");
    }

    #[tokio::test]
    async fn test_create_anonymous() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::anonymous("lurker")).await.unwrap();
        assert!(user.is_anonymous);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let result = repo.get_by_id(9999).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let first = repo.create(&NewUser::new("alice")).await.unwrap();
        let second = repo.create(&NewUser::new("bob")).await.unwrap();
        assert!(second.user_id > first.user_id);
    }
}
