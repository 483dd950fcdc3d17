//! Authentication service.
//!
//! Registration and password login over the user store. Validation failures
//! surface before any data access, so a failed call never leaves partial
//! state behind.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use villagecraft_core::{Email, UserRole};

use crate::db::{NewUser, RepositoryError, UserStore};
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if the name is empty.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::InvalidRole` if the role is unknown.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }

        let email = Email::parse(email)?;

        let role: UserRole = role
            .parse()
            .map_err(|_| AuthError::InvalidRole(role.to_owned()))?;

        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                name: name.to_owned(),
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .find_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryUserStore::new();
        let service = AuthService::new(&store);

        let user = service
            .register("Meera", "meera@example.com", "claypots123", "artisan")
            .await
            .unwrap();
        assert_eq!(user.name, "Meera");
        assert_eq!(user.role, UserRole::Artisan);

        let logged_in = service
            .login("meera@example.com", "claypots123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let store = MemoryUserStore::new();
        let service = AuthService::new(&store);
        service
            .register("Meera", "meera@example.com", "claypots123", "buyer")
            .await
            .unwrap();

        let err = service
            .login("meera@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_indistinguishable() {
        let store = MemoryUserStore::new();
        let service = AuthService::new(&store);

        let err = service
            .login("nobody@example.com", "claypots123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = MemoryUserStore::new();
        let service = AuthService::new(&store);
        service
            .register("Meera", "meera@example.com", "claypots123", "buyer")
            .await
            .unwrap();

        let err = service
            .register("Other Meera", "meera@example.com", "jutebags456", "buyer")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_register_validation_failures() {
        let store = MemoryUserStore::new();
        let service = AuthService::new(&store);

        assert!(matches!(
            service
                .register("", "meera@example.com", "claypots123", "buyer")
                .await
                .unwrap_err(),
            AuthError::MissingField("name")
        ));
        assert!(matches!(
            service
                .register("Meera", "not-an-email", "claypots123", "buyer")
                .await
                .unwrap_err(),
            AuthError::InvalidEmail(_)
        ));
        assert!(matches!(
            service
                .register("Meera", "meera@example.com", "short", "buyer")
                .await
                .unwrap_err(),
            AuthError::WeakPassword(_)
        ));
        assert!(matches!(
            service
                .register("Meera", "meera@example.com", "claypots123", "admin")
                .await
                .unwrap_err(),
            AuthError::InvalidRole(_)
        ));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("claypots123").unwrap();
        assert!(verify_password("claypots123", &hash).is_ok());
        assert!(matches!(
            verify_password("other", &hash).unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }
}
