//! Cart route handlers.
//!
//! All cart endpoints require an authenticated session; [`RequireAuth`]
//! rejects with 401 before any data access. Responses always carry the full
//! current cart so the client can re-render without a second fetch.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use villagecraft_core::{Cart, LineItem, ProductId};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::auth::MessageResponse;
use crate::services::CartService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove-item request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Cart line item as exposed over the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    pub name: String,
    pub image: String,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price.amount(),
            name: item.name.clone(),
            image: item.image.clone(),
        }
    }
}

/// Cart as exposed over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total(),
        }
    }
}

/// Response envelope for cart endpoints.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub cart: CartView,
}

impl CartResponse {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            success: true,
            cart: CartView::from(cart),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Get the current cart.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn show(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(&state).get(user.0.id).await?;
    Ok(Json(CartResponse::from_cart(&cart)))
}

/// Add a product to the cart.
#[instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn add(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let quantity = request.quantity.unwrap_or(1);
    let cart = CartService::new(&state)
        .add(user.0.id, request.product_id, quantity)
        .await?;
    Ok(Json(CartResponse::from_cart(&cart)))
}

/// Set a line item quantity; 0 or less removes the line.
#[instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn update(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(&state)
        .update(user.0.id, request.product_id, request.quantity)
        .await?;
    Ok(Json(CartResponse::from_cart(&cart)))
}

/// Remove a line item; removing an absent item still succeeds.
#[instrument(skip(state, user, request), fields(user_id = %user.0.id))]
pub async fn remove(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(&state)
        .remove(user.0.id, request.product_id)
        .await?;
    Ok(Json(CartResponse::from_cart(&cart)))
}

/// Delete the persisted cart record entirely.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn clear(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<MessageResponse>> {
    CartService::new(&state).clear(user.0.id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Cart cleared".to_string(),
    }))
}
