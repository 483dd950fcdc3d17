//! Product store.

use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use villagecraft_core::{Catalog, Category, Price, Product, ProductId, seed};

use super::RepositoryError;

/// Persistence contract for the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// All products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn by_category(&self, category: Category) -> Result<Vec<Product>, RepositoryError>;

    /// Number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Insert products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when a product id already exists.
    async fn insert_many(&self, products: &[Product]) -> Result<u64, RepositoryError>;
}

/// Seed the product table from the canonical catalog when it is empty.
///
/// Mirrors the server startup behavior: an already-populated table is left
/// untouched.
///
/// # Errors
///
/// Returns `RepositoryError` if counting or inserting fails.
pub async fn seed_if_empty(store: &dyn ProductStore) -> Result<bool, RepositoryError> {
    if store.count().await? > 0 {
        return Ok(false);
    }

    let products = seed::products();
    let inserted = store.insert_many(&products).await?;
    tracing::info!(count = inserted, "seeded product catalog");
    Ok(true)
}

// =============================================================================
// PostgreSQL implementation
// =============================================================================

/// `PostgreSQL`-backed product store.
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &sqlx::postgres::PgRow) -> Result<Product, RepositoryError> {
    let category: String = row.try_get("category")?;
    let category: Category = category.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
    })?;

    let price: rust_decimal::Decimal = row.try_get("price")?;
    let price = Price::new(price).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
    })?;

    let stock: Option<i32> = row.try_get("stock")?;

    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        category,
        price,
        image: row.try_get("image")?,
        description: row.try_get("description")?,
        artisan: row.try_get("artisan")?,
        stock: stock.and_then(|s| u32::try_from(s).ok()),
    })
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, category, price, image, description, artisan, stock
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, category, price, image, description, artisan, stock
            FROM products
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn by_category(&self, category: Category) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, category, price, image, description, artisan, stock
            FROM products
            WHERE category = $1
            ORDER BY id
            ",
        )
        .bind(category.slug())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn insert_many(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0_u64;

        for product in products {
            let stock = product.stock.and_then(|s| i32::try_from(s).ok());
            sqlx::query(
                r"
                INSERT INTO products (id, name, category, price, image, description, artisan, stock)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(product.id.as_i32())
            .bind(&product.name)
            .bind(product.category.slug())
            .bind(product.price.amount())
            .bind(&product.image)
            .bind(&product.description)
            .bind(&product.artisan)
            .bind(stock)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "product {} already exists",
                        product.id
                    ));
                }
                RepositoryError::Database(e)
            })?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// In-memory product store wrapping a [`Catalog`].
pub struct MemoryProductStore {
    catalog: Mutex<Catalog>,
}

impl MemoryProductStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Mutex::new(Catalog::default()),
        }
    }

    /// A store pre-populated with the canonical seed catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            catalog: Mutex::new(Catalog::from_products(seed::products())),
        }
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let catalog = self.catalog.lock().expect("product store lock poisoned");
        Ok(catalog.lookup(id).cloned())
    }

    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let catalog = self.catalog.lock().expect("product store lock poisoned");
        Ok(catalog.all().to_vec())
    }

    async fn by_category(&self, category: Category) -> Result<Vec<Product>, RepositoryError> {
        let catalog = self.catalog.lock().expect("product store lock poisoned");
        Ok(catalog
            .by_category(category)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let catalog = self.catalog.lock().expect("product store lock poisoned");
        Ok(catalog.len() as i64)
    }

    async fn insert_many(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut catalog = self.catalog.lock().expect("product store lock poisoned");
        for product in products {
            if catalog.lookup(product.id).is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "product {} already exists",
                    product.id
                )));
            }
        }

        let mut all = catalog.all().to_vec();
        all.extend_from_slice(products);
        *catalog = Catalog::from_products(all);
        Ok(products.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_if_empty_populates_once() {
        let store = MemoryProductStore::new();

        assert!(seed_if_empty(&store).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 24);

        // Second run leaves the populated store untouched.
        assert!(!seed_if_empty(&store).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 24);
    }

    #[tokio::test]
    async fn test_memory_store_category_filter() {
        let store = MemoryProductStore::seeded();
        let jute = store.by_category(Category::JuteProducts).await.unwrap();
        assert_eq!(jute.len(), 6);
        assert!(jute.iter().all(|p| p.category == Category::JuteProducts));
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_insert() {
        let store = MemoryProductStore::seeded();
        let existing = store.get(ProductId::new(1)).await.unwrap().unwrap();
        let err = store.insert_many(&[existing]).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
