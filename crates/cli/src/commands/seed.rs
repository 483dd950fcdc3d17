//! Seed the product catalog.

use tracing::info;

use villagecraft_core::seed;
use villagecraft_storefront::db::{PgProductStore, ProductStore};

/// Insert the canonical catalog into the products table.
///
/// Refuses a non-empty table unless `force` is set, in which case the table
/// is emptied first.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the insert fails.
pub async fn products(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let store = PgProductStore::new(pool.clone());

    let existing = store.count().await?;
    if existing > 0 {
        if !force {
            return Err(format!(
                "products table already has {existing} rows; rerun with --force to replace them"
            )
            .into());
        }
        sqlx::query("DELETE FROM products").execute(&pool).await?;
        info!(removed = existing, "Cleared existing catalog");
    }

    let inserted = store.insert_many(&seed::products()).await?;
    info!(count = inserted, "Seeded product catalog");
    Ok(())
}
