//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use villagecraft_core::{Category, Product};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Response for the full product listing.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

/// Response for a category listing.
#[derive(Debug, Serialize)]
pub struct CategoryProductsResponse {
    pub products: Vec<Product>,
}

/// List all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = state.products().all().await?;
    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// List the products in one category.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CategoryProductsResponse>> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown category: {category}")))?;

    let products = state.products().by_category(category).await?;
    Ok(Json(CategoryProductsResponse { products }))
}
