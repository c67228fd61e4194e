//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use echo_ember_core::{Category, OptionGroup, ProductId};

/// A catalog product (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Current price. Orders snapshot this at creation time.
    pub price: Decimal,
    /// Units in stock.
    pub stock: i32,
    /// Category this product is listed under.
    pub category: Category,
    /// Primary image URL; kept in sync with the first gallery image.
    pub image: String,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Gallery video URLs.
    pub videos: Vec<String>,
    /// Option groups (size, color, ...) offered for this product.
    pub options: Vec<OptionGroup>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
