//! Order repository for the back office.
//!
//! Reads join the customer for display; the only write is the status
//! transition, validated against the order state machine before anything
//! is persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use echo_ember_core::{OrderId, OrderStatus, ProductId, UserId, parse_selected_options};

use super::RepositoryError;
use crate::models::order::{AdminOrder, AdminOrderItem, AdminOrderSummary, UNKNOWN_PRODUCT};

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: OrderId,
    user_id: UserId,
    customer_name: Option<String>,
    customer_email: String,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct DetailRow {
    id: OrderId,
    user_id: UserId,
    customer_name: Option<String>,
    customer_email: String,
    total: Decimal,
    status: String,
    shipping_address: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_id: Option<ProductId>,
    product_title: Option<String>,
    quantity: i32,
    price: Decimal,
    options: Option<serde_json::Value>,
}

fn parse_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    raw.parse()
        .map_err(|_| RepositoryError::DataCorruption(format!("invalid order status: {raw}")))
}

fn display_name(name: Option<String>, email: &str) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.to_owned())
}

/// Repository for back-office order access.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first, with customer names attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminOrderSummary>, RepositoryError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r"
            SELECT o.id, o.user_id, u.name AS customer_name, u.email AS customer_email,
                   o.total, o.status, o.created_at
            FROM shop.orders o
            JOIN shop.users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(AdminOrderSummary {
                    id: row.id,
                    user_id: row.user_id,
                    customer: display_name(row.customer_name, &row.customer_email),
                    total: row.total,
                    status: parse_status(&row.status)?,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    /// Get one order with items and customer details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<AdminOrder>, RepositoryError> {
        let row: Option<DetailRow> = sqlx::query_as(
            r"
            SELECT o.id, o.user_id, u.name AS customer_name, u.email AS customer_email,
                   o.total, o.status, o.shipping_address, o.created_at, o.updated_at
            FROM shop.orders o
            JOIN shop.users u ON u.id = o.user_id
            WHERE o.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let item_rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT oi.product_id, p.title AS product_title, oi.quantity, oi.price, oi.options
            FROM shop.order_items oi
            LEFT JOIN shop.products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.position ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(|item| AdminOrderItem {
                product_id: item.product_id,
                product_title: item
                    .product_title
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_owned()),
                quantity: u32::try_from(item.quantity).unwrap_or_default(),
                price: item.price,
                options: parse_selected_options(item.options.as_ref()),
            })
            .collect();

        Ok(Some(AdminOrder {
            id: row.id,
            user_id: row.user_id,
            customer: display_name(row.customer_name, &row.customer_email),
            customer_email: row.customer_email,
            total: row.total,
            status: parse_status(&row.status)?,
            shipping_address: row.shipping_address,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    /// Move an order to a new status.
    ///
    /// The transition is validated against the state machine first; nothing
    /// is written for an illegal move.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` when the order does not exist.
    /// - `RepositoryError::IllegalTransition` when the state machine forbids
    ///   the move.
    #[instrument(skip(self), fields(order_id = %id, to = %to))]
    pub async fn update_status(
        &self,
        id: OrderId,
        to: OrderStatus,
    ) -> Result<OrderStatus, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so two concurrent transitions serialize
        let current: Option<(String,)> =
            sqlx::query_as("SELECT status FROM shop.orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((raw,)) = current else {
            return Err(RepositoryError::NotFound);
        };
        let from = parse_status(&raw)?;

        if !from.can_transition_to(to) {
            return Err(RepositoryError::IllegalTransition { from, to });
        }

        sqlx::query("UPDATE shop.orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(to.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(from = %from, "order status updated");
        Ok(to)
    }
}
