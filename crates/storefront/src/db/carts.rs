//! Cart store.
//!
//! One cart document per user. Writes go through a compare-and-set version
//! counter: each save names the version it read, and a mismatch fails with
//! `Conflict` instead of silently overwriting a concurrent update. Version 0
//! means "no document yet" and turns the save into an insert.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use villagecraft_core::{LineItemRecord, UserId};

use super::RepositoryError;

/// A persisted cart document.
#[derive(Debug, Clone)]
pub struct StoredCart {
    /// CAS version counter, >= 1 for a stored document.
    pub version: i64,
    /// The persisted line items, not yet filtered.
    pub items: Vec<LineItemRecord>,
}

/// Persistence contract for cart documents.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the cart document for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn load(&self, user_id: UserId) -> Result<Option<StoredCart>, RepositoryError>;

    /// Save a cart document, guarded by the version read at load time.
    ///
    /// `expected_version` 0 inserts a new document. Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the stored version no longer
    /// matches (a concurrent writer got there first).
    async fn save(
        &self,
        user_id: UserId,
        items: &[LineItemRecord],
        total: Decimal,
        expected_version: i64,
    ) -> Result<i64, RepositoryError>;

    /// Delete the cart document for a user. A no-op if none exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn delete(&self, user_id: UserId) -> Result<(), RepositoryError>;
}

// =============================================================================
// PostgreSQL implementation
// =============================================================================

/// `PostgreSQL`-backed cart store.
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn encode_items(items: &[LineItemRecord]) -> Result<String, RepositoryError> {
    serde_json::to_string(items)
        .map_err(|e| RepositoryError::DataCorruption(format!("failed to encode cart items: {e}")))
}

/// Decode persisted items leniently: a document that no longer parses reads
/// as an empty item list rather than poisoning every cart request.
fn decode_items(user_id: UserId, raw: &str) -> Vec<LineItemRecord> {
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(user_id = %user_id, "discarding unreadable cart items: {e}");
            Vec::new()
        }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn load(&self, user_id: UserId) -> Result<Option<StoredCart>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT items, version
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row.try_get("items")?;
        Ok(Some(StoredCart {
            version: row.try_get("version")?,
            items: decode_items(user_id, &raw),
        }))
    }

    async fn save(
        &self,
        user_id: UserId,
        items: &[LineItemRecord],
        total: Decimal,
        expected_version: i64,
    ) -> Result<i64, RepositoryError> {
        let encoded = encode_items(items)?;

        if expected_version == 0 {
            sqlx::query(
                r"
                INSERT INTO carts (user_id, items, total, version)
                VALUES ($1, $2, $3, 1)
                ",
            )
            .bind(user_id.as_i32())
            .bind(&encoded)
            .bind(total)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("cart was created concurrently".to_owned());
                }
                RepositoryError::Database(e)
            })?;
            return Ok(1);
        }

        let result = sqlx::query(
            r"
            UPDATE carts
            SET items = $2, total = $3, version = version + 1, updated_at = now()
            WHERE user_id = $1 AND version = $4
            ",
        )
        .bind(user_id.as_i32())
        .bind(&encoded)
        .bind(total)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(
                "cart version is stale".to_owned(),
            ));
        }

        Ok(expected_version + 1)
    }

    async fn delete(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// In-memory cart store honoring the same CAS contract.
#[derive(Default)]
pub struct MemoryCartStore {
    inner: Mutex<HashMap<i32, StoredCart>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self, user_id: UserId) -> Result<Option<StoredCart>, RepositoryError> {
        let inner = self.inner.lock().expect("cart store lock poisoned");
        Ok(inner.get(&user_id.as_i32()).cloned())
    }

    async fn save(
        &self,
        user_id: UserId,
        items: &[LineItemRecord],
        _total: Decimal,
        expected_version: i64,
    ) -> Result<i64, RepositoryError> {
        let mut inner = self.inner.lock().expect("cart store lock poisoned");
        let current = inner.get(&user_id.as_i32()).map_or(0, |c| c.version);

        if current != expected_version {
            return Err(RepositoryError::Conflict(
                "cart version is stale".to_owned(),
            ));
        }

        let version = expected_version + 1;
        inner.insert(
            user_id.as_i32(),
            StoredCart {
                version,
                items: items.to_vec(),
            },
        );
        Ok(version)
    }

    async fn delete(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("cart store lock poisoned");
        inner.remove(&user_id.as_i32());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use villagecraft_core::ProductId;

    fn record(id: i32, quantity: i64) -> LineItemRecord {
        LineItemRecord {
            product_id: Some(ProductId::new(id)),
            quantity,
            price: Some(Decimal::from(100)),
            name: Some("Jute Basket".to_owned()),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_insert_then_update() {
        let store = MemoryCartStore::new();
        let user = UserId::new(1);

        let v1 = store
            .save(user, &[record(1, 1)], Decimal::from(100), 0)
            .await
            .unwrap();
        assert_eq!(v1, 1);

        let loaded = store.load(user).await.unwrap().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.items.len(), 1);

        let v2 = store
            .save(user, &[record(1, 2)], Decimal::from(200), v1)
            .await
            .unwrap();
        assert_eq!(v2, 2);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_stale_version() {
        let store = MemoryCartStore::new();
        let user = UserId::new(1);

        store
            .save(user, &[record(1, 1)], Decimal::from(100), 0)
            .await
            .unwrap();

        // A writer that read version 0 loses to the one that already saved.
        let err = store
            .save(user, &[record(2, 1)], Decimal::from(100), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        // The stored document is untouched.
        let loaded = store.load(user).await.unwrap().unwrap();
        assert_eq!(loaded.items.first().unwrap().product_id.unwrap().as_i32(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_delete_is_idempotent() {
        let store = MemoryCartStore::new();
        let user = UserId::new(1);

        store
            .save(user, &[record(1, 1)], Decimal::from(100), 0)
            .await
            .unwrap();
        store.delete(user).await.unwrap();
        store.delete(user).await.unwrap();
        assert!(store.load(user).await.unwrap().is_none());
    }

    #[test]
    fn test_decode_items_tolerates_garbage() {
        let items = decode_items(UserId::new(1), "not json at all");
        assert!(items.is_empty());
    }
}
