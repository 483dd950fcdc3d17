//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use villagecraft_core::{Email, UserId, UserRole};

use crate::models::user::User;

/// Session-stored user identity.
///
/// A snapshot of the logged-in user plus the login instant, which drives the
/// absolute session lifetime check in the auth extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// User's role.
    pub role: UserRole,
    /// When this session was established.
    pub logged_in_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Snapshot a user into the session, stamped with the current time.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            logged_in_at: Utc::now(),
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
