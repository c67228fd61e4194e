//! Dashboard aggregates.
//!
//! Everything here is recomputed per request; there is no materialized
//! state to drift. Cancelled orders never count toward revenue.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use echo_ember_core::{OrderId, OrderStatus, ProductId};

use super::RepositoryError;
use crate::models::order::UNKNOWN_PRODUCT;

/// Days covered by the daily series, today included.
const SERIES_DAYS: i64 = 30;

/// Daily revenue buckets. Days are UTC calendar days; the fill anchor below
/// is a UTC date, so the bucketing must not follow the database session
/// timezone.
const DAILY_SERIES_SQL: &str = r"
    SELECT (created_at AT TIME ZONE 'UTC')::date AS day,
           COALESCE(SUM(total), 0) AS revenue,
           COUNT(*) AS order_count
    FROM shop.orders
    WHERE status <> 'CANCELLED'
      AND created_at >= NOW() - INTERVAL '30 days'
    GROUP BY day
";

/// One day of the trailing revenue series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub order_count: i64,
}

/// A recent order on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: OrderId,
    pub customer: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A product ranked by units sold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSeller {
    pub product_id: Option<ProductId>,
    pub title: String,
    pub units_sold: i64,
}

/// A product ranked by average rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRated {
    pub product_id: ProductId,
    pub title: String,
    pub average_rating: Decimal,
    pub review_count: i64,
}

/// The full dashboard payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub revenue: Decimal,
    pub order_count: i64,
    pub product_count: i64,
    pub user_count: i64,
    pub recent_orders: Vec<RecentOrder>,
    pub daily: Vec<DailyPoint>,
    pub top_selling: Vec<TopSeller>,
    pub top_rated: Vec<TopRated>,
}

/// Zero-fill a sparse per-day aggregate into a dense ascending series
/// ending at `today`.
#[must_use]
pub fn fill_daily_series(
    today: NaiveDate,
    rows: &[(NaiveDate, Decimal, i64)],
) -> Vec<DailyPoint> {
    let start = today - Duration::days(SERIES_DAYS - 1);

    (0..SERIES_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let found = rows.iter().find(|(d, _, _)| *d == date);
            match found {
                Some(&(_, revenue, order_count)) => DailyPoint {
                    date,
                    revenue,
                    order_count,
                },
                None => DailyPoint {
                    date,
                    revenue: Decimal::ZERO,
                    order_count: 0,
                },
            }
        })
        .collect()
}

/// Repository for dashboard aggregates.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute the full dashboard payload.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let (revenue,): (Option<Decimal>,) = sqlx::query_as(
            "SELECT SUM(total) FROM shop.orders WHERE status <> 'CANCELLED'",
        )
        .fetch_one(self.pool)
        .await?;

        let (order_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shop.orders")
            .fetch_one(self.pool)
            .await?;
        let (product_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shop.products")
            .fetch_one(self.pool)
            .await?;
        let (user_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shop.users")
            .fetch_one(self.pool)
            .await?;

        let recent_orders = self.recent_orders().await?;
        let daily = self.daily_series().await?;
        let top_selling = self.top_selling().await?;
        let top_rated = self.top_rated().await?;

        Ok(DashboardStats {
            revenue: revenue.unwrap_or(Decimal::ZERO),
            order_count,
            product_count,
            user_count,
            recent_orders,
            daily,
            top_selling,
            top_rated,
        })
    }

    async fn recent_orders(&self) -> Result<Vec<RecentOrder>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: OrderId,
            customer_name: Option<String>,
            customer_email: String,
            total: Decimal,
            status: String,
            created_at: DateTime<Utc>,
        }

        let rows: Vec<Row> = sqlx::query_as(
            r"
            SELECT o.id, u.name AS customer_name, u.email AS customer_email,
                   o.total, o.status, o.created_at
            FROM shop.orders o
            JOIN shop.users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            LIMIT 5
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let status: OrderStatus = row.status.parse().map_err(|_| {
                    RepositoryError::DataCorruption(format!(
                        "invalid order status: {}",
                        row.status
                    ))
                })?;
                Ok(RecentOrder {
                    id: row.id,
                    customer: row
                        .customer_name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or(row.customer_email),
                    total: row.total,
                    status,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    async fn daily_series(&self) -> Result<Vec<DailyPoint>, RepositoryError> {
        let rows: Vec<(NaiveDate, Decimal, i64)> = sqlx::query_as(DAILY_SERIES_SQL)
            .fetch_all(self.pool)
            .await?;

        Ok(fill_daily_series(Utc::now().date_naive(), &rows))
    }

    async fn top_selling(&self) -> Result<Vec<TopSeller>, RepositoryError> {
        // LEFT JOIN: deleted products still sold units once
        let rows: Vec<(Option<ProductId>, Option<String>, i64)> = sqlx::query_as(
            r"
            SELECT oi.product_id, p.title, SUM(oi.quantity)::bigint AS units
            FROM shop.order_items oi
            LEFT JOIN shop.products p ON p.id = oi.product_id
            GROUP BY oi.product_id, p.title
            ORDER BY units DESC
            LIMIT 5
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, title, units_sold)| TopSeller {
                product_id,
                title: title.unwrap_or_else(|| UNKNOWN_PRODUCT.to_owned()),
                units_sold,
            })
            .collect())
    }

    async fn top_rated(&self) -> Result<Vec<TopRated>, RepositoryError> {
        let rows: Vec<(ProductId, String, Decimal, i64)> = sqlx::query_as(
            r"
            SELECT r.product_id, p.title, AVG(r.rating) AS average, COUNT(*) AS reviews
            FROM shop.reviews r
            JOIN shop.products p ON p.id = r.product_id
            GROUP BY r.product_id, p.title
            ORDER BY average DESC, reviews DESC
            LIMIT 5
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(product_id, title, average_rating, review_count)| TopRated {
                product_id,
                title,
                average_rating,
                review_count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("date literal")
    }

    #[test]
    fn series_is_dense_and_ascending() {
        let today = date("2026-08-30");
        let series = fill_daily_series(today, &[]);

        assert_eq!(series.len(), 30);
        assert_eq!(series[0].date, date("2026-08-01"));
        assert_eq!(series[29].date, today);
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert!(series.iter().all(|p| p.revenue.is_zero() && p.order_count == 0));
    }

    #[test]
    fn series_places_sparse_rows() {
        let today = date("2026-08-30");
        let rows = vec![
            (date("2026-08-30"), d("120.00"), 3),
            (date("2026-08-05"), d("25.00"), 1),
        ];
        let series = fill_daily_series(today, &rows);

        assert_eq!(series[29].revenue, d("120.00"));
        assert_eq!(series[29].order_count, 3);
        assert_eq!(series[4].revenue, d("25.00"));
        assert_eq!(series[3].revenue, Decimal::ZERO);
    }

    #[test]
    fn series_ignores_rows_outside_window() {
        let today = date("2026-08-30");
        let rows = vec![(date("2026-07-01"), d("999.00"), 9)];
        let series = fill_daily_series(today, &rows);

        assert!(series.iter().all(|p| p.revenue.is_zero()));
    }

    #[test]
    fn daily_buckets_use_utc_days() {
        // The fill anchor is Utc::now().date_naive(); a session-timezone
        // cast would shift midnight-adjacent orders into the wrong bucket
        assert!(DAILY_SERIES_SQL.contains("AT TIME ZONE 'UTC'"));
    }
}
