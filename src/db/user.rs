//! User identity model for huddle.

/// A sender identity row.
///
/// The chat core reads this table to enrich messages but never writes it
/// beyond the migration-seeded placeholder user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub user_id: i64,
    /// Display name.
    pub username: String,
    /// Whether the user posts anonymously.
    pub is_anonymous: bool,
}

/// Data for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub username: String,
    /// Whether the user posts anonymously.
    pub is_anonymous: bool,
}

impl NewUser {
    /// Create a new named user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_anonymous: false,
        }
    }

    /// Create a new anonymous user.
    pub fn anonymous(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_anonymous: true,
        }
    }
}
