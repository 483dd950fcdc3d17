//! User domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. The password hash never travels on this struct; stores return it
//! separately when verification needs it.

use chrono::{DateTime, Utc};

use villagecraft_core::{Email, UserId, UserRole};

/// A registered storefront user (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address, unique across accounts.
    pub email: Email,
    /// Account role chosen at registration.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
