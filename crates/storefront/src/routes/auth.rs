//! Authentication route handlers.
//!
//! Registration, login, logout and session inspection. Login establishes the
//! server-side session; registration only creates the account and sends the
//! user to the login form.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use villagecraft_core::UserId;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, user::User};
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Account type: `artisan` or `buyer`.
    #[serde(rename = "type", default)]
    pub role: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User identity as exposed over the wire.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
        }
    }
}

impl From<&CurrentUser> for UserView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
        }
    }
}

/// Response for register/login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserView,
}

/// Plain success/message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Response for the session check endpoint.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle registration.
///
/// Creates the account; it does not establish a session.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let service = AuthService::new(state.users());
    let user = service
        .register(
            &request.name,
            &request.email,
            &request.password,
            &request.role,
        )
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(AuthResponse {
        success: true,
        message: "Registration successful".to_string(),
        user: UserView::from(&user),
    }))
}

/// Handle login.
///
/// Verifies credentials and stores the identity snapshot in the session.
/// A failed login leaves no session state behind.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let service = AuthService::new(state.users());
    let user = service.login(&request.email, &request.password).await?;

    let current = CurrentUser::from_user(&user);
    set_current_user(&session, &current).await.map_err(|e| {
        tracing::error!("Failed to set session: {e}");
        AppError::Internal("failed to establish session".to_string())
    })?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: UserView::from(&user),
    }))
}

/// Handle logout: clears the identity and destroys the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    session.flush().await.map_err(|e| {
        tracing::error!("Failed to flush session: {e}");
        AppError::Internal("Logout failed".to_string())
    })?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Logout successful".to_string(),
    }))
}

/// Report the current session identity.
///
/// Always responds 200; an absent or expired session is `success: false`.
pub async fn check_session(OptionalAuth(user): OptionalAuth) -> Json<SessionResponse> {
    match user {
        Some(user) => Json(SessionResponse {
            success: true,
            user: Some(UserView::from(&user)),
            message: None,
        }),
        None => Json(SessionResponse {
            success: false,
            user: None,
            message: Some("No active session".to_string()),
        }),
    }
}

/// Destroy the session on browser close; always reports success.
#[instrument(skip(session))]
pub async fn auto_logout(session: Session) -> Json<MessageResponse> {
    if let Err(e) = session.flush().await {
        tracing::warn!("Auto-logout flush failed: {e}");
    }

    Json(MessageResponse {
        success: true,
        message: "Auto-logged out due to browser closure".to_string(),
    })
}
