//! Review repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use echo_ember_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::{NewReview, Review};

/// Raw review row as stored in `shop.reviews`.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    user_id: UserId,
    user_name: String,
    rating: i16,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating).map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid rating in database: {}", row.rating))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            user_name: row.user_name,
            rating,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

const REVIEW_COLUMNS: &str = "id, product_id, user_id, user_name, rating, comment, created_at";

/// Aggregate rating for one product.
#[derive(Debug, Clone, Copy)]
pub struct RatingSummary {
    pub average: Option<Decimal>,
    pub count: i64,
}

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            r"
            SELECT {REVIEW_COLUMNS} FROM shop.reviews
            WHERE product_id = $1
            ORDER BY created_at DESC
            "
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Average rating and review count for a product.
    ///
    /// The average is `None` when the product has no reviews.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<RatingSummary, RepositoryError> {
        let (average, count): (Option<Decimal>, i64) = sqlx::query_as(
            "SELECT AVG(rating), COUNT(*) FROM shop.reviews WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(RatingSummary { average, count })
    }

    /// Insert a review. The caller validates the rating range; the product
    /// must exist (foreign key) or `NotFound` comes back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the product does not exist,
    /// or `Database` on any other failure.
    pub async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        let row: ReviewRow = sqlx::query_as(&format!(
            r"
            INSERT INTO shop.reviews (id, product_id, user_id, user_name, rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REVIEW_COLUMNS}
            "
        ))
        .bind(ReviewId::generate())
        .bind(review.product_id)
        .bind(review.user_id)
        .bind(&review.user_name)
        .bind(i16::from(review.rating))
        .bind(&review.comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            _ => RepositoryError::Database(e),
        })?;

        Review::try_from(row)
    }
}
