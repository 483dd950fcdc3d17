//! Checkout flow.
//!
//! Reads the current items and totals, refuses when the cart is empty or
//! nobody is logged in, and clears the cart on success. The cart is cleared
//! before any downstream order recording is confirmed durable; there is no
//! compensating action if that later step fails. Callers that need
//! durability must record the order before calling [`place_order`].

use rust_decimal::Decimal;

use crate::cart::ClientCart;
use crate::error::ClientError;
use crate::session;
use crate::storage::StorageAdapter;

/// What the checkout observed at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub total_quantity: u32,
    pub total_price: Decimal,
}

/// Place an order from the current cart contents.
///
/// # Errors
///
/// Returns `ClientError::EmptyCart` for an empty cart and
/// `ClientError::LoginRequired` when nobody is logged in; in both cases the
/// cart is left untouched.
pub fn place_order<S: StorageAdapter>(
    storage: &mut S,
    cart: &mut ClientCart,
) -> Result<OrderSummary, ClientError> {
    if cart.is_empty() {
        return Err(ClientError::EmptyCart);
    }

    if session::current_identity(storage).is_none() {
        return Err(ClientError::LoginRequired);
    }

    let view = cart.view();
    let summary = OrderSummary {
        total_quantity: view.total_quantity,
        total_price: view.total_price,
    };

    cart.clear(storage)?;
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::seeded_catalog;
    use crate::session::{Identity, login, logout};
    use crate::storage::MemoryStorage;
    use villagecraft_core::{Email, ProductId, UserId, UserRole};

    fn storage_with_cart() -> (MemoryStorage, ClientCart) {
        let mut storage = MemoryStorage::new();
        login(
            &mut storage,
            &Identity {
                id: UserId::new(1),
                name: "Meera".to_owned(),
                email: Email::parse("meera@example.com").unwrap(),
                role: UserRole::Buyer,
            },
        )
        .unwrap();

        let catalog = seeded_catalog();
        let mut cart = ClientCart::load(&storage);
        cart.add_by_id(&mut storage, &catalog, ProductId::new(1)).unwrap();
        cart.add_by_id(&mut storage, &catalog, ProductId::new(1)).unwrap();
        cart.add_by_id(&mut storage, &catalog, ProductId::new(13)).unwrap();
        (storage, cart)
    }

    #[test]
    fn test_checkout_summarizes_and_clears() {
        let (mut storage, mut cart) = storage_with_cart();

        let summary = place_order(&mut storage, &mut cart).unwrap();
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.total_price, Decimal::from(450 * 2 + 150));

        assert!(cart.is_empty());
        assert!(ClientCart::load(&storage).is_empty());
    }

    #[test]
    fn test_checkout_refuses_empty_cart() {
        let mut storage = MemoryStorage::new();
        let mut cart = ClientCart::load(&storage);

        let err = place_order(&mut storage, &mut cart).unwrap_err();
        assert!(matches!(err, ClientError::EmptyCart));
    }

    #[test]
    fn test_checkout_refuses_logged_out_and_keeps_cart() {
        let (mut storage, mut cart) = storage_with_cart();
        // The user logs out between filling the cart and checking out; the
        // user-scoped stored cart is cleared, but the in-memory one remains.
        logout(&mut storage).unwrap();

        let err = place_order(&mut storage, &mut cart).unwrap_err();
        assert!(matches!(err, ClientError::LoginRequired));
        assert!(!cart.is_empty());
    }
}
