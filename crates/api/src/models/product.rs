//! Product domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use minicart_core::ProductId;

/// A catalog product.
///
/// Mutable by administrators, read by everyone. Orders snapshot the name
/// and price at purchase time, so later edits never alter past orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price.
    pub price: Decimal,
    /// Category label used for browsing.
    pub category: String,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional image reference (URL or asset key).
    #[serde(default)]
    pub image: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
