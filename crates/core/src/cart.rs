//! The cart mutation engine.
//!
//! One implementation of the cart consistency rules, shared by the server
//! store and the client-side cart. The invariants:
//!
//! - a product id appears in at most one line item
//! - line item quantity is always >= 1; a line reaching 0 is removed, never
//!   stored at zero
//! - the total equals the sum of `price * quantity` over the current lines,
//!   recomputed from scratch after every mutation - never patched
//! - line items carry an add-time snapshot of price, name and image; the
//!   catalog is not re-read on render
//!
//! Persisted carts travel as [`LineItemRecord`] collections.
//! [`Cart::from_records`] tolerates and silently drops malformed entries
//! (missing id, non-positive quantity) so a corrupted persisted cart degrades
//! gracefully instead of failing the render.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// Errors from cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product has no line item in this cart.
    #[error("item not found in cart")]
    ItemNotFound,
}

/// One product entry in a cart with its quantity and price snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Number of units, always >= 1.
    pub quantity: u32,
    /// Unit price captured when the line was first added.
    pub price: Price,
    /// Product name captured when the line was first added.
    pub name: String,
    /// Product image captured when the line was first added.
    pub image: String,
}

impl LineItem {
    /// The extended price of this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.extended(self.quantity)
    }
}

/// The wire/persistence shape of a line item.
///
/// Every field is lenient so that a malformed persisted entry can be
/// inspected and dropped rather than failing the whole document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemRecord {
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    pub price: Option<Decimal>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<&LineItem> for LineItemRecord {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: Some(item.product_id),
            quantity: i64::from(item.quantity),
            price: Some(item.price.amount()),
            name: Some(item.name.clone()),
            image: Some(item.image.clone()),
        }
    }
}

/// An ordered collection of line items with a derived total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    total: Decimal,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The derived total (`sum of price * quantity`).
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The quantity currently held for a product, if any.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    /// Add `quantity` units of a product.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line is appended with a price/name/image snapshot
    /// taken from the product now. A quantity of 0 is treated as 1.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(LineItem {
                product_id: product.id,
                quantity,
                price: product.price,
                name: product.name.clone(),
                image: product.image.clone(),
            });
        }
        self.recompute_total();
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of 0 or less removes the line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line exists for the product.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or(CartError::ItemNotFound)?;

        if quantity <= 0 {
            self.items.remove(index);
        } else if let Some(item) = self.items.get_mut(index) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.recompute_total();
        Ok(())
    }

    /// Remove the line for a product.
    ///
    /// A no-op (not an error) if no such line exists.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product_id != product_id);
        self.recompute_total();
    }

    /// Empty the cart; the total becomes 0.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }

    /// Rebuild a cart from persisted records.
    ///
    /// Entries with a missing product id or a non-positive quantity are
    /// silently dropped. A missing or negative price snapshot is read as
    /// zero. Duplicate product ids are merged by summing quantities. The
    /// total is always recomputed here - a stored total is never trusted.
    #[must_use]
    pub fn from_records(records: Vec<LineItemRecord>) -> Self {
        let mut cart = Self::new();
        for record in records {
            let Some(product_id) = record.product_id else {
                continue;
            };
            let Ok(quantity) = u32::try_from(record.quantity) else {
                continue;
            };
            if quantity == 0 {
                continue;
            }

            let price = record
                .price
                .map_or(Price::ZERO, |amount| Price::new(amount).unwrap_or(Price::ZERO));

            if let Some(item) = cart
                .items
                .iter_mut()
                .find(|item| item.product_id == product_id)
            {
                item.quantity = item.quantity.saturating_add(quantity);
            } else {
                cart.items.push(LineItem {
                    product_id,
                    quantity,
                    price,
                    name: record.name.unwrap_or_default(),
                    image: record.image.unwrap_or_default(),
                });
            }
        }
        cart.recompute_total();
        cart
    }

    /// The persistence shape of this cart's lines.
    #[must_use]
    pub fn to_records(&self) -> Vec<LineItemRecord> {
        self.items.iter().map(LineItemRecord::from).collect()
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(LineItem::line_total).sum();
    }
}
