//! Persistence adapters for the storefront.
//!
//! # Tables
//!
//! - `users` - Registered accounts (name, unique email, argon2 hash, role)
//! - `products` - The seeded catalog
//! - `carts` - One cart document per user (JSON-encoded line items, derived
//!   total, CAS version counter)
//! - `session` - Tower-sessions storage
//!
//! Each store is an object-safe trait with a `PostgreSQL` implementation and
//! an in-memory implementation. The in-memory stores back the test suite and
//! honor the same contracts (unique emails, compare-and-set versions).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p villagecraft-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod carts;
pub mod products;
pub mod users;

pub use carts::{CartStore, MemoryCartStore, PgCartStore, StoredCart};
pub use products::{MemoryProductStore, PgProductStore, ProductStore};
pub use users::{MemoryUserStore, NewUser, PgUserStore, UserStore};

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique email, stale cart version).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
