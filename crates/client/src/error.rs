//! Client error types.

use thiserror::Error;

use villagecraft_core::ProductId;

/// Errors from client-side operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A mutation was attempted without a logged-in identity.
    #[error("login required")]
    LoginRequired,

    /// The product does not exist in the loaded catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Checkout was attempted on an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Local storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// An HTTP request to the storefront failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A URL could not be constructed.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a failure envelope.
    #[error("server rejected request: {0}")]
    Rejected(String),
}
