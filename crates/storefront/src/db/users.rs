//! User store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use villagecraft_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::user::User;

/// Data required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: UserRole,
}

/// Persistence contract for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Find a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Find a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Find a user together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;
}

// =============================================================================
// PostgreSQL implementation
// =============================================================================

/// `PostgreSQL`-backed user store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, RepositoryError> {
    let email: String = row.try_get("email")?;
    let email = Email::parse(&email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;

    let role: String = row.try_get("role")?;
    let role: UserRole = role
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email,
        role,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role, created_at, updated_at
            ",
        )
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row_to_user(&row)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, role, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = row_to_user(&row)?;
        let password_hash: String = row.try_get("password_hash")?;
        Ok(Some((user, password_hash)))
    }
}

// =============================================================================
// In-memory implementation
// =============================================================================

#[derive(Default)]
struct MemoryUsersInner {
    next_id: i32,
    users: HashMap<i32, (User, String)>,
}

/// In-memory user store with the same contract as the `PostgreSQL` one.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<MemoryUsersInner>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.lock().expect("user store lock poisoned");

        if inner.users.values().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = inner.next_id + 1;
        inner.next_id = id;

        let now = Utc::now();
        let created = User {
            id: UserId::new(id),
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.lock().expect("user store lock poisoned");
        Ok(inner
            .users
            .values()
            .find(|(u, _)| &u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.lock().expect("user store lock poisoned");
        Ok(inner.users.get(&id.as_i32()).map(|(u, _)| u.clone()))
    }

    async fn find_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let inner = self.inner.lock().expect("user store lock poisoned");
        Ok(inner
            .users
            .values()
            .find(|(u, _)| &u.email == email)
            .map(|(u, hash)| (u.clone(), hash.clone())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Meera".to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: "$argon2id$test".to_owned(),
            role: UserRole::Buyer,
        }
    }

    #[tokio::test]
    async fn test_memory_store_create_and_lookup() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("meera@example.com")).await.unwrap();

        let by_email = store
            .find_by_email(&Email::parse("meera@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, user.email);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("meera@example.com")).await.unwrap();

        let err = store
            .create(new_user("meera@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_memory_store_returns_password_hash() {
        let store = MemoryUserStore::new();
        store.create(new_user("meera@example.com")).await.unwrap();

        let (_, hash) = store
            .find_with_password(&Email::parse("meera@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hash, "$argon2id$test");
    }
}
