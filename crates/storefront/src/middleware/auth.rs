//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring session authentication in route
//! handlers. Every cart-mutating endpoint goes through [`RequireAuth`], so a
//! request without a valid session is rejected before any data access.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use tower_sessions::Session;

use crate::error::ErrorBody;
use crate::models::{CurrentUser, session_keys};

use super::session::SESSION_EXPIRY_SECONDS;

/// Extractor that requires an authenticated session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection returned when authentication is required but missing.
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                success: false,
                message: "Not authenticated. Please login again.".to_string(),
            }),
        )
            .into_response()
    }
}

/// Whether the session has outlived its absolute lifetime.
fn is_expired(user: &CurrentUser) -> bool {
    Utc::now() - user.logged_in_at > Duration::seconds(SESSION_EXPIRY_SECONDS)
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(Unauthenticated)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(Unauthenticated)?;

        if is_expired(&user) {
            return Err(Unauthenticated);
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in. An expired session reads as logged-out.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten()
                .filter(|user| !is_expired(user)),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use villagecraft_core::{Email, UserId, UserRole};

    fn current_user(logged_in_at: chrono::DateTime<Utc>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            name: "Meera".to_owned(),
            email: Email::parse("meera@example.com").unwrap(),
            role: UserRole::Buyer,
            logged_in_at,
        }
    }

    #[test]
    fn test_fresh_session_is_not_expired() {
        assert!(!is_expired(&current_user(Utc::now())));
    }

    #[test]
    fn test_day_old_session_is_expired() {
        let stale = Utc::now() - Duration::seconds(SESSION_EXPIRY_SECONDS + 60);
        assert!(is_expired(&current_user(stale)));
    }
}
