//! Product repository (read-only catalog access).
//!
//! The storefront never mutates products directly; stock changes go through
//! the order engine and everything else is the admin service's job.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use echo_ember_core::{Category, ProductId, parse_option_groups};

use super::RepositoryError;
use crate::models::Product;

/// Raw product row as stored in `shop.products`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub options: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid category in database: {}",
                row.category
            ))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            stock: row.stock,
            category,
            image: row.image,
            images: row.images,
            videos: row.videos,
            // Options are parsed leniently: malformed JSON renders as "no options"
            options: parse_option_groups(row.options.as_ref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) const PRODUCT_COLUMNS: &str = "id, title, description, price, stock, category, \
     image, images, videos, options, created_at, updated_at";

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, with optional filters.
    ///
    /// `category` matches exactly (the enum is already canonical); `search`
    /// is a case-insensitive contains match on the title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<Category>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM shop.products
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "
        ))
        .bind(category.map(|c| c.as_str().to_owned()))
        .bind(search)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }
}
