//! Persisted client login state.
//!
//! The identity snapshot the server returns at login is stored locally so
//! every page (and every cart mutation) can consult it without a round trip.
//! Login and logout also clear the cart scope being vacated: a guest cart
//! never silently becomes a user cart, and a user cart does not survive the
//! account logging out.

use serde::{Deserialize, Serialize};

use villagecraft_core::{Email, UserId, UserRole};

use crate::error::ClientError;
use crate::scope::CartScope;
use crate::storage::StorageAdapter;

/// Storage key for the persisted identity.
pub const SESSION_KEY: &str = "vc_session";

/// The identity snapshot persisted at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(rename = "type")]
    pub role: UserRole,
}

/// The currently logged-in identity, if any.
///
/// A corrupt or unreadable stored identity reads as logged-out.
#[must_use]
pub fn current_identity<S: StorageAdapter>(storage: &S) -> Option<Identity> {
    let raw = storage.get(SESSION_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::warn!("discarding unreadable session state: {e}");
            None
        }
    }
}

/// Persist a login.
///
/// The guest cart scope is explicitly cleared: the new user starts from
/// their own cart, never from a merged guest cart.
///
/// # Errors
///
/// Returns `ClientError::Storage` if the backing store fails.
pub fn login<S: StorageAdapter>(storage: &mut S, identity: &Identity) -> Result<(), ClientError> {
    let encoded = serde_json::to_string(identity)
        .map_err(|e| ClientError::Storage(std::io::Error::other(e)))?;
    storage.set(SESSION_KEY, &encoded)?;
    storage.remove(&CartScope::Guest.storage_key())?;
    Ok(())
}

/// Clear the login state.
///
/// The logged-out user's cart scope is explicitly cleared along with the
/// identity.
///
/// # Errors
///
/// Returns `ClientError::Storage` if the backing store fails.
pub fn logout<S: StorageAdapter>(storage: &mut S) -> Result<(), ClientError> {
    if let Some(identity) = current_identity(storage) {
        storage.remove(&CartScope::User(identity.email).storage_key())?;
    }
    storage.remove(SESSION_KEY)?;
    Ok(())
}
