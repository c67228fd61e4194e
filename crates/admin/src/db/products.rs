//! Product repository (full CRUD).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use echo_ember_core::{Category, ProductId, parse_option_groups};

use super::RepositoryError;
use crate::models::Product;

/// Raw product row as stored in `shop.products`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
    description: String,
    price: Decimal,
    stock: i32,
    category: String,
    image: String,
    images: Vec<String>,
    videos: Vec<String>,
    options: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
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
            options: parse_option_groups(row.options.as_ref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, title, description, price, stock, category, \
     image, images, videos, options, created_at, updated_at";

/// Fields persisted on create and update. The route layer assembles this
/// after media uploads resolve, so the arrays here are final URLs.
#[derive(Debug, Clone)]
pub struct ProductWrite {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Category,
    pub image: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    /// Option groups as raw JSON; lenient parse happens on read.
    pub options: serde_json::Value,
}

/// Repository for catalog management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products ORDER BY created_at DESC"
        ))
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

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, write: &ProductWrite) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO shop.products
                (id, title, description, price, stock, category, image, images, videos, options)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(ProductId::generate())
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.price)
        .bind(write.stock)
        .bind(write.category.as_str())
        .bind(&write.image)
        .bind(&write.images)
        .bind(&write.videos)
        .bind(&write.options)
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }

    /// Overwrite a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        write: &ProductWrite,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE shop.products
            SET title = $2, description = $3, price = $4, stock = $5, category = $6,
                image = $7, images = $8, videos = $9, options = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.price)
        .bind(write.stock)
        .bind(write.category.as_str())
        .bind(&write.image)
        .bind(&write.images)
        .bind(&write.videos)
        .bind(&write.options)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Product::try_from)
    }

    /// Delete a product. Order items keep their snapshots; their
    /// `product_id` goes NULL via the foreign key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
