//! Cart service - the server half of the cart mutation engine.
//!
//! Each operation is a read-modify-write cycle against the user's single
//! cart document: load the stored records, rebuild a [`Cart`] (which filters
//! malformed entries and recomputes the total), apply the core mutation, and
//! save back guarded by the version read at load time. A stale version fails
//! the save, and the whole cycle retries; two concurrent mutations for the
//! same user therefore serialize instead of losing one update.

use tracing::instrument;

use villagecraft_core::{Cart, ProductId, UserId};

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::state::AppState;

/// How many attempts a mutation gets before giving up on contention.
const MAX_CAS_ATTEMPTS: u32 = 5;

/// Cart service over the application state's stores.
pub struct CartService<'a> {
    state: &'a AppState,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// The user's current cart; an empty cart when none is stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: UserId) -> Result<Cart, AppError> {
        let stored = self.state.carts().load(user_id).await?;
        Ok(stored.map_or_else(Cart::new, |cart| Cart::from_records(cart.items)))
    }

    /// Add `quantity` units of a product to the user's cart.
    ///
    /// Creates the cart document if none exists. The product's price, name
    /// and image are snapshotted into the line item at this moment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, AppError> {
        let product = self
            .state
            .product_snapshot(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

        self.mutate(user_id, true, |cart| {
            cart.add(&product, quantity);
            Ok(())
        })
        .await
    }

    /// Set the quantity of a line item; 0 or less removes it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user has no cart or the product
    /// has no line item.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, AppError> {
        self.mutate(user_id, false, |cart| {
            cart.set_quantity(product_id, quantity)
                .map_err(|_| AppError::NotFound("Item not found in cart".to_owned()))
        })
        .await
    }

    /// Remove a product's line item.
    ///
    /// Removing an absent item - or from an absent cart - still succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<Cart, AppError> {
        if self.state.carts().load(user_id).await?.is_none() {
            return Ok(Cart::new());
        }

        self.mutate(user_id, false, |cart| {
            cart.remove(product_id);
            Ok(())
        })
        .await
    }

    /// Delete the user's persisted cart record entirely.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<(), AppError> {
        self.state.carts().delete(user_id).await?;
        Ok(())
    }

    /// Run one mutation under the compare-and-set retry loop.
    ///
    /// `create_if_missing` distinguishes add (which creates the document)
    /// from update (where a missing cart is a `NotFound`).
    async fn mutate<F>(
        &self,
        user_id: UserId,
        create_if_missing: bool,
        apply: F,
    ) -> Result<Cart, AppError>
    where
        F: Fn(&mut Cart) -> Result<(), AppError>,
    {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let stored = self.state.carts().load(user_id).await?;
            let (version, mut cart) = match stored {
                Some(stored) => (stored.version, Cart::from_records(stored.items)),
                None if create_if_missing => (0, Cart::new()),
                None => return Err(AppError::NotFound("Cart not found".to_owned())),
            };

            apply(&mut cart)?;

            match self
                .state
                .carts()
                .save(user_id, &cart.to_records(), cart.total(), version)
                .await
            {
                Ok(_) => return Ok(cart),
                Err(RepositoryError::Conflict(_)) => {
                    tracing::debug!(
                        user_id = %user_id,
                        attempt,
                        "cart version conflict, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal("cart update contention".to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    fn test_state() -> AppState {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        AppState::in_memory(config)
    }

    #[tokio::test]
    async fn test_add_twice_merges_and_totals() {
        let state = test_state();
        let service = CartService::new(&state);
        let user = UserId::new(1);
        let pot = ProductId::new(1); // Clay Water Pot, 450

        let cart = service.add(user, pot, 1).await.unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total(), Decimal::from(450));

        let cart = service.add(user, pot, 1).await.unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(pot), Some(2));
        assert_eq!(cart.total(), Decimal::from(900));
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let state = test_state();
        let service = CartService::new(&state);

        let err = service
            .add(UserId::new(1), ProductId::new(999), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let state = test_state();
        let service = CartService::new(&state);
        let user = UserId::new(1);
        let pot = ProductId::new(1);

        service.add(user, pot, 2).await.unwrap();
        let cart = service.update(user, pot, 0).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_missing_cart_and_item() {
        let state = test_state();
        let service = CartService::new(&state);
        let user = UserId::new(1);

        let err = service.update(user, ProductId::new(1), 2).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        service.add(user, ProductId::new(1), 1).await.unwrap();
        let err = service.update(user, ProductId::new(2), 2).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_is_forgiving() {
        let state = test_state();
        let service = CartService::new(&state);
        let user = UserId::new(1);

        // No cart at all.
        let cart = service.remove(user, ProductId::new(1)).await.unwrap();
        assert!(cart.is_empty());

        // Absent item in an existing cart.
        service.add(user, ProductId::new(1), 1).await.unwrap();
        let cart = service.remove(user, ProductId::new(2)).await.unwrap();
        assert_eq!(cart.items().len(), 1);
    }

    #[tokio::test]
    async fn test_get_defaults_to_empty() {
        let state = test_state();
        let service = CartService::new(&state);

        let cart = service.get(UserId::new(1)).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_clear_deletes_record() {
        let state = test_state();
        let service = CartService::new(&state);
        let user = UserId::new(1);

        service.add(user, ProductId::new(1), 1).await.unwrap();
        service.clear(user).await.unwrap();

        assert!(state.carts().load(user).await.unwrap().is_none());
        let cart = service.get(user).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_serialize() {
        let state = test_state();
        let user = UserId::new(1);
        let pot = ProductId::new(1);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                CartService::new(&state).add(user, pot, 1).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let cart = CartService::new(&state).get(user).await.unwrap();
        assert_eq!(cart.quantity_of(pot), Some(4));
        assert_eq!(cart.total(), Decimal::from(450 * 4));
    }
}
