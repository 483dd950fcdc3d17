//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check (wired in main)
//!
//! # Auth
//! POST /register               - Create an account
//! POST /login                  - Login, establishes the session
//! POST /logout                 - Destroy the session
//! GET  /api/check-session      - Current session identity, if any
//! POST /api/auto-logout        - Session destroy for browser-close handling
//!
//! # Cart (session required)
//! GET    /api/cart             - Current cart ({items: [], total: 0} default)
//! POST   /api/cart/add         - Add a product (quantity defaults to 1)
//! PUT    /api/cart/update      - Set a line quantity (<= 0 removes)
//! DELETE /api/cart/remove      - Remove a line (absent line still succeeds)
//! DELETE /api/cart/clear       - Delete the persisted cart record
//!
//! # Catalog
//! GET  /api/products             - All products
//! GET  /api/products/{category}  - Products in one category
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router (rate limited at binary assembly).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", put(cart::update))
        .route("/remove", delete(cart::remove))
        .route("/clear", delete(cart::clear))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{category}", get(products::by_category))
}

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .route("/check-session", get(auth::check_session))
            .route("/auto-logout", post(auth::auto_logout))
            .nest("/cart", cart_routes())
            .nest("/products", product_routes()),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    auth_routes().merge(api_routes())
}
