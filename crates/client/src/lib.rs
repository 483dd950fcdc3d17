//! VillageCraft client library.
//!
//! The browser-side half of the storefront as a library: a locally persisted
//! cart, a persisted login state, catalog loading, and the HTTP client for
//! the storefront API.
//!
//! There is exactly one cart implementation here. It is keyed by an explicit
//! persistence scope ([`scope::CartScope`]): the guest scope when nobody is
//! logged in, a per-identity scope otherwise. Scopes are separate carts;
//! login and logout clear the scope being vacated rather than merging it.
//!
//! The local cart and the server cart are intentionally independent. The
//! local cart is the browsing cart; the server cart is only touched through
//! explicit [`api::ApiClient`] calls. There is no background reconciliation
//! between the two.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod scope;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use cart::{CartView, ClientCart};
pub use checkout::OrderSummary;
pub use error::ClientError;
pub use scope::CartScope;
pub use session::Identity;
pub use storage::{FileStorage, MemoryStorage, StorageAdapter};
