//! Product model as managed by the admin service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use echo_ember_core::{Category, OptionGroup, ProductId};

/// Fallback primary image when a product has no uploaded images.
pub const FALLBACK_IMAGE: &str = "/image1.jpeg";

/// A catalog product, including its media gallery and option groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Category,
    /// Primary image: the first gallery image, or the fallback.
    pub image: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub options: Vec<OptionGroup>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The primary image a gallery implies: its first entry, or the fallback.
    #[must_use]
    pub fn primary_image(images: &[String]) -> String {
        images
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_IMAGE.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_image_prefers_first_upload() {
        let images = vec!["https://cdn.test/a.jpg".to_owned(), "b.jpg".to_owned()];
        assert_eq!(Product::primary_image(&images), "https://cdn.test/a.jpg");
    }

    #[test]
    fn primary_image_falls_back_when_empty() {
        assert_eq!(Product::primary_image(&[]), FALLBACK_IMAGE);
    }
}
