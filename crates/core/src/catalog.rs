//! Products and the in-memory catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

/// A purchasable product.
///
/// Immutable after seeding: the cart snapshots price/name/image at add time
/// instead of referencing live catalog state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub image: String,
    pub description: String,
    /// Name of the artisan who made the product.
    pub artisan: String,
    /// Units in stock, when tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// A fixed set of products indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// A later product with a duplicate id replaces the earlier one.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        for product in products {
            if let Some(index) = catalog.by_id.get(&product.id).copied() {
                if let Some(slot) = catalog.products.get_mut(index) {
                    *slot = product;
                }
            } else {
                let index = catalog.products.len();
                catalog.by_id.insert(product.id, index);
                catalog.products.push(product);
            }
        }
        catalog
    }

    /// Look up a product by id.
    #[must_use]
    pub fn lookup(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).and_then(|&index| self.products.get(index))
    }

    /// All products in a category, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.category == category)
            .collect()
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_seeded_catalog_lookup() {
        let catalog = Catalog::from_products(seed::products());
        let pot = catalog.lookup(ProductId::new(1)).expect("seed product 1");
        assert_eq!(pot.name, "Clay Water Pot");
        assert_eq!(pot.category, Category::WaterUsage);
        assert!(catalog.lookup(ProductId::new(999)).is_none());
    }

    #[test]
    fn test_by_category_counts() {
        let catalog = Catalog::from_products(seed::products());
        assert_eq!(catalog.len(), 24);
        for category in Category::ALL {
            assert_eq!(catalog.by_category(category).len(), 6);
        }
    }

    #[test]
    fn test_duplicate_ids_replace() {
        let mut products = seed::products();
        let mut replacement = products.first().expect("seed not empty").clone();
        replacement.name = "Replacement".to_owned();
        products.push(replacement);

        let catalog = Catalog::from_products(products);
        assert_eq!(catalog.len(), 24);
        assert_eq!(
            catalog.lookup(ProductId::new(1)).map(|p| p.name.as_str()),
            Some("Replacement")
        );
    }
}
