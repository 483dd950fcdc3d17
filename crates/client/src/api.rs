//! HTTP client for the storefront API.
//!
//! A thin, typed wrapper over reqwest with a cookie store, so the session
//! cookie established at login rides along on every later call. These calls
//! are the only channel through which the server cart is touched; the local
//! cart never syncs in the background.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use villagecraft_core::{Category, LineItemRecord, Product, ProductId};

use crate::error::ClientError;
use crate::session::Identity;

/// Typed client for the storefront endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(rename = "type")]
    role: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRequest {
    product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<i64>,
}

/// `{success, message?, user?}` envelope for auth endpoints.
#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<Identity>,
}

/// The server cart payload.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<LineItemRecord>,
    #[serde(default)]
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
struct CartEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cart: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    user: Option<Identity>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

impl ApiClient {
    /// Create a client for a storefront base URL.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Url` for an unparseable base URL and
    /// `ClientError::Http` if the underlying client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    fn rejected(status: StatusCode, message: Option<String>) -> ClientError {
        if status == StatusCode::UNAUTHORIZED {
            return ClientError::LoginRequired;
        }
        ClientError::Rejected(
            message.unwrap_or_else(|| format!("request failed with status {status}")),
        )
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register an account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` with the server's message on failure.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Identity, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/register")?)
            .json(&RegisterRequest {
                name,
                email,
                password,
                role,
            })
            .send()
            .await?;

        let status = response.status();
        let envelope: AuthEnvelope = response.json().await?;
        match envelope.user {
            Some(user) if envelope.success => Ok(user),
            _ => Err(Self::rejected(status, envelope.message)),
        }
    }

    /// Log in; the session cookie is retained for later calls.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoginRequired` on bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/login")?)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        let envelope: AuthEnvelope = response.json().await?;
        match envelope.user {
            Some(user) if envelope.success => Ok(user),
            _ => Err(Self::rejected(status, envelope.message)),
        }
    }

    /// Log out the server session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` if the server reports failure.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.endpoint("/logout")?).send().await?;
        let status = response.status();
        let envelope: MessageEnvelope = response.json().await?;
        if envelope.success {
            Ok(())
        } else {
            Err(Self::rejected(status, envelope.message))
        }
    }

    /// The server-side session identity, if any.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` when the request fails.
    pub async fn check_session(&self) -> Result<Option<Identity>, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/api/check-session")?)
            .send()
            .await?;
        let envelope: SessionEnvelope = response.json().await?;
        Ok(envelope.user.filter(|_| envelope.success))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    async fn cart_call(&self, request: reqwest::RequestBuilder) -> Result<CartPayload, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let envelope: CartEnvelope = response.json().await?;
        match envelope.cart {
            Some(cart) if envelope.success => Ok(cart),
            _ => Err(Self::rejected(status, envelope.message)),
        }
    }

    /// Fetch the server cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoginRequired` without a valid session.
    pub async fn cart(&self) -> Result<CartPayload, ClientError> {
        self.cart_call(self.http.get(self.endpoint("/api/cart")?)).await
    }

    /// Add a product to the server cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoginRequired` without a valid session and
    /// `ClientError::Rejected` for an unknown product.
    pub async fn cart_add(
        &self,
        product_id: ProductId,
        quantity: Option<i64>,
    ) -> Result<CartPayload, ClientError> {
        self.cart_call(
            self.http
                .post(self.endpoint("/api/cart/add")?)
                .json(&CartItemRequest {
                    product_id,
                    quantity,
                }),
        )
        .await
    }

    /// Set a line quantity in the server cart; <= 0 removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when the cart or line is missing.
    pub async fn cart_update(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartPayload, ClientError> {
        self.cart_call(
            self.http
                .put(self.endpoint("/api/cart/update")?)
                .json(&CartItemRequest {
                    product_id,
                    quantity: Some(quantity),
                }),
        )
        .await
    }

    /// Remove a line from the server cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoginRequired` without a valid session.
    pub async fn cart_remove(&self, product_id: ProductId) -> Result<CartPayload, ClientError> {
        self.cart_call(
            self.http
                .delete(self.endpoint("/api/cart/remove")?)
                .json(&CartItemRequest {
                    product_id,
                    quantity: None,
                }),
        )
        .await
    }

    /// Delete the server cart record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LoginRequired` without a valid session.
    pub async fn cart_clear(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.endpoint("/api/cart/clear")?)
            .send()
            .await?;
        let status = response.status();
        let envelope: MessageEnvelope = response.json().await?;
        if envelope.success {
            Ok(())
        } else {
            Err(Self::rejected(status, envelope.message))
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` when the request fails.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.http.get(self.endpoint("/api/products")?).send().await?;
        let envelope: ProductsEnvelope = response.json().await?;
        Ok(envelope.products)
    }

    /// Fetch the products in one category.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` when the request fails.
    pub async fn products_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Product>, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&format!("/api/products/{}", category.slug()))?)
            .send()
            .await?;
        let envelope: ProductsEnvelope = response.json().await?;
        Ok(envelope.products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_payload_decodes_server_shape() {
        let json = r#"{
            "success": true,
            "cart": {
                "items": [
                    {"productId": 1, "quantity": 2, "price": 450, "name": "Clay Water Pot", "image": "water1.jpg"}
                ],
                "total": 900
            }
        }"#;
        let envelope: CartEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        let cart = envelope.cart.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, Decimal::from(900));
    }

    #[test]
    fn test_error_envelope_decodes_without_cart() {
        let json = r#"{"success": false, "message": "Product not found"}"#;
        let envelope: CartEnvelope = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert!(envelope.cart.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Product not found"));
    }

    #[test]
    fn test_rejected_maps_unauthorized_to_login_required() {
        let err = ApiClient::rejected(StatusCode::UNAUTHORIZED, None);
        assert!(matches!(err, ClientError::LoginRequired));

        let err = ApiClient::rejected(StatusCode::NOT_FOUND, Some("Product not found".into()));
        assert!(matches!(err, ClientError::Rejected(_)));
    }

    #[test]
    fn test_endpoint_join() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        let url = client.endpoint("/api/cart/add").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/cart/add");
    }
}
