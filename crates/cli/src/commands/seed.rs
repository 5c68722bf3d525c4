//! Seed the catalog with demo products.
//!
//! # Usage
//!
//! ```bash
//! minicart-cli seed
//! ```
//!
//! Only inserts when the catalog is empty, so it is safe to run on a
//! freshly migrated database but will not duplicate products on reruns.

use rust_decimal::Decimal;

use minicart_api::db::ProductRepository;
use minicart_api::db::products::ProductFields;

use super::CliError;

/// Demo catalog: (name, price, category, description).
const DEMO_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    (
        "Wireless Headphones",
        "79.99",
        "electronics",
        "Over-ear headphones with 30-hour battery life.",
    ),
    (
        "Ceramic Mug",
        "12.50",
        "kitchen",
        "Stoneware mug, holds 350ml, dishwasher safe.",
    ),
    (
        "Canvas Backpack",
        "54.00",
        "accessories",
        "Water-resistant 20L backpack with laptop sleeve.",
    ),
    (
        "Desk Lamp",
        "34.90",
        "home",
        "Dimmable LED lamp with adjustable arm.",
    ),
    (
        "Running Socks (3-pack)",
        "15.00",
        "apparel",
        "Breathable ankle socks, one size fits most.",
    ),
];

/// Insert the demo products if the catalog is empty.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn products() -> Result<(), CliError> {
    let pool = super::connect().await?;
    let repo = ProductRepository::new(&pool);

    let existing = repo.count().await?;
    if existing > 0 {
        tracing::info!(existing, "catalog is not empty, nothing to seed");
        return Ok(());
    }

    for &(name, price, category, description) in DEMO_PRODUCTS {
        let price: Decimal = price
            .parse()
            .map_err(|_| CliError::InvalidArgument(format!("bad demo price for {name}")))?;
        let product = repo
            .create(&ProductFields {
                name,
                price,
                category,
                description: Some(description),
                image: None,
            })
            .await?;
        tracing::info!(product = %product.id, name = %product.name, "seeded");
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "catalog seeded");
    Ok(())
}
