//! The canonical product seed data.
//!
//! Six products per category, 24 in total. The storefront seeds its product
//! table from this list when the table is empty; the client uses it as the
//! offline catalog fallback.

use rust_decimal::Decimal;

use crate::catalog::Product;
use crate::types::{Category, Price, ProductId};

fn product(
    id: i32,
    name: &str,
    price: i64,
    image: &str,
    category: Category,
    artisan: &str,
    description: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        category,
        price: Price::new(Decimal::from(price)).expect("seed prices are non-negative"),
        image: image.to_owned(),
        description: description.to_owned(),
        artisan: artisan.to_owned(),
        stock: None,
    }
}

/// The full seed catalog.
#[must_use]
pub fn products() -> Vec<Product> {
    use Category::{CeramicProducts, JuteProducts, KitchenUsage, WaterUsage};

    vec![
        // Water usage
        product(1, "Clay Water Pot", 450, "water1.jpg", WaterUsage, "Rajesh", "Handmade pot"),
        product(2, "Terracotta Jug", 380, "water2.jpg", WaterUsage, "Meera", "Carved jug"),
        product(3, "Matka Cooler", 520, "water3.jpg", WaterUsage, "Arjun", "Natural cooler"),
        product(4, "Hand-Painted Surahi", 490, "water4.jpg", WaterUsage, "Priya", "Floral design"),
        product(5, "Earthen Filter", 680, "water5.jpg", WaterUsage, "Vikram", "No electricity"),
        product(6, "Mini Matka Set", 320, "water6.jpg", WaterUsage, "Kiran", "Set of 3"),
        // Kitchen usage
        product(7, "Clay Cooking Pot", 650, "kitchen1.jpg", KitchenUsage, "Vikram", "Slow cooking"),
        product(8, "Earthen Griddle", 280, "kitchen2.jpg", KitchenUsage, "Kiran", "For roti"),
        product(9, "Surahi Pitcher", 420, "kitchen3.jpg", KitchenUsage, "Rajesh", "Serving"),
        product(10, "Clay Tawa", 350, "kitchen4.jpg", KitchenUsage, "Sita", "Even heat"),
        product(11, "Handi Set", 890, "kitchen5.jpg", KitchenUsage, "Ramesh", "3 pieces"),
        product(12, "Earthen Kadai", 720, "kitchen6.jpg", KitchenUsage, "Meera", "Deep fry"),
        // Jute products
        product(13, "Jute Shopping Bag", 150, "jute1.jpg", JuteProducts, "Sita", "Reusable"),
        product(14, "Jute Basket", 220, "jute2.jpg", JuteProducts, "Ramesh", "Storage"),
        product(15, "Jute Coasters", 80, "jute3.jpg", JuteProducts, "Meera", "Set of 6"),
        product(16, "Jute Wall Hanging", 380, "jute4.jpg", JuteProducts, "Priya", "Tribal art"),
        product(17, "Jute Table Runner", 260, "jute5.jpg", JuteProducts, "Arjun", "Natural"),
        product(18, "Jute Planter", 190, "jute6.jpg", JuteProducts, "Rajesh", "Biodegradable"),
        // Ceramic products
        product(19, "Ceramic Vase", 915, "ceramic20.jpg", CeramicProducts, "Rajesh", "Floral paint"),
        product(20, "Ceramic Bowl", 900, "ceramic21.jpg", CeramicProducts, "Meera", "Blue glaze"),
        product(21, "Ceramic Plate", 820, "ceramic22.jpg", CeramicProducts, "Arjun", "Microwave safe"),
        product(22, "Ceramic Mug", 1000, "ceramic23.jpg", CeramicProducts, "Vikram", "350ml"),
        product(23, "Ceramic Teapot", 720, "ceramic24.jpg", CeramicProducts, "Kiran", "Set with cups"),
        product(24, "Ceramic Sculpture", 320, "ceramic25.jpg", CeramicProducts, "Rajesh", "Abstract"),
    ]
}
