//! Catalog loading.
//!
//! The catalog load is an explicit asynchronous step with a success/failure
//! result. Pages either render the fetched catalog or report the failure;
//! nothing waits around for a global to appear.

use villagecraft_core::{Catalog, seed};

use crate::api::ApiClient;
use crate::error::ClientError;

/// Fetch the catalog from the storefront.
///
/// # Errors
///
/// Returns `ClientError::Http` when the request fails and
/// `ClientError::Rejected` when the server answers with a failure envelope.
pub async fn fetch_catalog(api: &ApiClient) -> Result<Catalog, ClientError> {
    let products = api.products().await?;
    Ok(Catalog::from_products(products))
}

/// The bundled seed catalog, for offline use and tests.
#[must_use]
pub fn seeded_catalog() -> Catalog {
    Catalog::from_products(seed::products())
}

#[cfg(test)]
mod tests {
    use super::*;
    use villagecraft_core::{Category, ProductId};

    #[test]
    fn test_seeded_catalog_matches_seed_data() {
        let catalog = seeded_catalog();
        assert_eq!(catalog.len(), 24);
        assert_eq!(catalog.by_category(Category::CeramicProducts).len(), 6);
        assert!(catalog.lookup(ProductId::new(1)).is_some());
    }
}
