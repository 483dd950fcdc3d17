//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use villagecraft_core::{Product, ProductId};

use crate::config::StorefrontConfig;
use crate::db::{
    CartStore, MemoryCartStore, MemoryProductStore, MemoryUserStore, PgCartStore, PgProductStore,
    PgUserStore, ProductStore, RepositoryError, UserStore,
};

/// How long a product snapshot may be served from cache.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the persistence stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    users: Arc<dyn UserStore>,
    carts: Arc<dyn CartStore>,
    products: Arc<dyn ProductStore>,
    product_cache: Cache<ProductId, Product>,
}

impl AppState {
    /// Create application state backed by `PostgreSQL` stores.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self::build(
            config,
            Some(pool.clone()),
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgCartStore::new(pool.clone())),
            Arc::new(PgProductStore::new(pool)),
        )
    }

    /// Create application state over explicit stores.
    ///
    /// Used by the test suite (in-memory stores) and usable for ephemeral
    /// runs without a database.
    #[must_use]
    pub fn with_stores(
        config: StorefrontConfig,
        users: Arc<dyn UserStore>,
        carts: Arc<dyn CartStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        Self::build(config, None, users, carts, products)
    }

    /// Create application state with in-memory stores and the seed catalog.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryCartStore::new()),
            Arc::new(MemoryProductStore::seeded()),
        )
    }

    fn build(
        config: StorefrontConfig,
        pool: Option<PgPool>,
        users: Arc<dyn UserStore>,
        carts: Arc<dyn CartStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(1024)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
                carts,
                products,
                product_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the database connection pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn carts(&self) -> &dyn CartStore {
        self.inner.carts.as_ref()
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    /// Look up a product for an add-to-cart snapshot, via the moka cache.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying store lookup fails.
    pub async fn product_snapshot(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        if let Some(product) = self.inner.product_cache.get(&id).await {
            return Ok(Some(product));
        }

        let fetched = self.inner.products.get(id).await?;
        if let Some(ref product) = fetched {
            self.inner.product_cache.insert(id, product.clone()).await;
        }
        Ok(fetched)
    }
}
