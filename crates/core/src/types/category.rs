//! Product categories.
//!
//! The category set is fixed: each of the four storefront listing pages maps
//! 1:1 onto one category.

use serde::{Deserialize, Serialize};

/// Error returned when a category slug does not match any known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A product category.
///
/// Serialized using the URL slugs the listing pages use
/// (`water-usage`, `kitchen-usage`, `jute-products`, `ceramic-products`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WaterUsage,
    KitchenUsage,
    JuteProducts,
    CeramicProducts,
}

impl Category {
    /// All categories, in listing-page order.
    pub const ALL: [Self; 4] = [
        Self::WaterUsage,
        Self::KitchenUsage,
        Self::JuteProducts,
        Self::CeramicProducts,
    ];

    /// The URL slug for this category.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::WaterUsage => "water-usage",
            Self::KitchenUsage => "kitchen-usage",
            Self::JuteProducts => "jute-products",
            Self::CeramicProducts => "ceramic-products",
        }
    }

    /// Resolve a listing page number (1-4) to its category.
    #[must_use]
    pub const fn for_listing_page(page: u8) -> Option<Self> {
        match page {
            1 => Some(Self::WaterUsage),
            2 => Some(Self::KitchenUsage),
            3 => Some(Self::JuteProducts),
            4 => Some(Self::CeramicProducts),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water-usage" => Ok(Self::WaterUsage),
            "kitchen-usage" => Ok(Self::KitchenUsage),
            "jute-products" => Ok(Self::JuteProducts),
            "ceramic-products" => Ok(Self::CeramicProducts),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}
