//! The client-side cart.
//!
//! An explicitly constructed cart object: loaded from a storage scope,
//! mutated through methods that persist on every change, rendered through
//! [`CartView`]. The cart math itself is the shared engine in
//! `villagecraft_core::Cart`; loading goes through `Cart::from_records`,
//! which silently drops malformed persisted entries.
//!
//! Every mutation that adds to the cart first consults the login state: an
//! unauthenticated add is refused with [`ClientError::LoginRequired`] and
//! nothing - not even the in-memory cart - changes.

use rust_decimal::Decimal;

use villagecraft_core::{Cart, Catalog, LineItem, Product, ProductId};

use crate::error::ClientError;
use crate::scope::CartScope;
use crate::session;
use crate::storage::StorageAdapter;

/// A rendered cart: ordered line items plus derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total_quantity: u32,
    pub total_price: Decimal,
}

/// The locally persisted cart for one storage scope.
#[derive(Debug)]
pub struct ClientCart {
    scope: CartScope,
    cart: Cart,
}

impl ClientCart {
    /// Load the cart for the current identity's scope.
    ///
    /// Malformed persisted entries are dropped silently; a document that no
    /// longer parses at all reads as an empty cart.
    #[must_use]
    pub fn load<S: StorageAdapter>(storage: &S) -> Self {
        let identity = session::current_identity(storage);
        let scope = CartScope::for_identity(identity.as_ref().map(|i| &i.email));
        Self::load_scope(storage, scope)
    }

    /// Load the cart persisted under an explicit scope.
    #[must_use]
    pub fn load_scope<S: StorageAdapter>(storage: &S, scope: CartScope) -> Self {
        let records = storage
            .get(&scope.storage_key())
            .ok()
            .flatten()
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(records) => Some(records),
                Err(e) => {
                    tracing::warn!("discarding unreadable cart state: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            scope,
            cart: Cart::from_records(records),
        }
    }

    /// The scope this cart persists under.
    #[must_use]
    pub const fn scope(&self) -> &CartScope {
        &self.scope
    }

    /// Render the current state.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView {
            items: self.cart.items().to_vec(),
            total_quantity: self.cart.total_quantity(),
            total_price: self.cart.total(),
        }
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Add a product, gated on login.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoginRequired` (with no mutation at all) when
    /// nobody is logged in.
    pub fn add<S: StorageAdapter>(
        &mut self,
        storage: &mut S,
        product: &Product,
        quantity: u32,
    ) -> Result<(), ClientError> {
        if session::current_identity(storage).is_none() {
            return Err(ClientError::LoginRequired);
        }

        self.cart.add(product, quantity);
        self.persist(storage)
    }

    /// Add a product by id, resolving it through the loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ProductNotFound` if the catalog has no such
    /// product, or `ClientError::LoginRequired` when nobody is logged in.
    pub fn add_by_id<S: StorageAdapter>(
        &mut self,
        storage: &mut S,
        catalog: &Catalog,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        let product = catalog
            .lookup(product_id)
            .ok_or(ClientError::ProductNotFound(product_id))?;
        self.add(storage, product, 1)
    }

    /// Increase a line's quantity by one.
    ///
    /// A no-op when the product has no line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisting fails.
    pub fn increment<S: StorageAdapter>(
        &mut self,
        storage: &mut S,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        if let Some(quantity) = self.cart.quantity_of(product_id) {
            let _ = self
                .cart
                .set_quantity(product_id, i64::from(quantity) + 1);
            self.persist(storage)?;
        }
        Ok(())
    }

    /// Decrease a line's quantity by one; reaching zero removes the line.
    ///
    /// A no-op when the product has no line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisting fails.
    pub fn decrement<S: StorageAdapter>(
        &mut self,
        storage: &mut S,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        if let Some(quantity) = self.cart.quantity_of(product_id) {
            let _ = self
                .cart
                .set_quantity(product_id, i64::from(quantity) - 1);
            self.persist(storage)?;
        }
        Ok(())
    }

    /// Set a line's quantity; 0 or less removes the line.
    ///
    /// A no-op when the product has no line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisting fails.
    pub fn set_quantity<S: StorageAdapter>(
        &mut self,
        storage: &mut S,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), ClientError> {
        if self.cart.set_quantity(product_id, quantity).is_ok() {
            self.persist(storage)?;
        }
        Ok(())
    }

    /// Remove a line. A no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisting fails.
    pub fn remove<S: StorageAdapter>(
        &mut self,
        storage: &mut S,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        self.cart.remove(product_id);
        self.persist(storage)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisting fails.
    pub fn clear<S: StorageAdapter>(&mut self, storage: &mut S) -> Result<(), ClientError> {
        self.cart.clear();
        self.persist(storage)
    }

    fn persist<S: StorageAdapter>(&self, storage: &mut S) -> Result<(), ClientError> {
        let encoded = serde_json::to_string(&self.cart.to_records())
            .map_err(|e| ClientError::Storage(std::io::Error::other(e)))?;
        storage.set(&self.scope.storage_key(), &encoded)
    }
}
