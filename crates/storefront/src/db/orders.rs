//! Order engine repository.
//!
//! Order creation is the one write path with real invariants:
//!
//! - prices are snapshotted from the catalog inside the transaction, never
//!   trusted from the client;
//! - stock is decremented with a *relative* update so concurrent checkouts
//!   serialize at the storage engine;
//! - line items whose product has vanished are dropped and reported back,
//!   not fatal;
//! - an optional client request token makes retries idempotent.
//!
//! After creation only `status` ever changes (admin service); total and
//! items are immutable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use echo_ember_core::{
    OrderId, OrderStatus, ProductId, UserId, line_total, parse_selected_options,
};

use super::RepositoryError;
use crate::models::order::{NewOrderLine, Order, OrderItem, ShippingDetails, UNKNOWN_PRODUCT};

/// Result of a successful (or deduplicated) order submission.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: OrderId,
    pub total: Decimal,
    /// Products that were in the cart but no longer exist; their lines were
    /// dropped from the order.
    pub skipped: Vec<ProductId>,
    /// True when the request token matched an already-committed order and
    /// nothing new was written.
    pub duplicate: bool,
}

/// Raw order row as stored in `shop.orders`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total: Decimal,
    status: String,
    shipping_address: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Order item row joined against the (possibly deleted) product.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    order_id: OrderId,
    product_id: Option<ProductId>,
    product_title: Option<String>,
    product_image: Option<String>,
    quantity: i32,
    price: Decimal,
    options: Option<serde_json::Value>,
}

impl ItemRow {
    fn into_item(self) -> OrderItem {
        OrderItem {
            product_id: self.product_id,
            // Weak reference: the product may have been deleted since
            product_title: self
                .product_title
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_owned()),
            product_image: self.product_image,
            quantity: u32::try_from(self.quantity).unwrap_or_default(),
            price: self.price,
            options: parse_selected_options(self.options.as_ref()),
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid order status: {}", self.status))
        })?;

        // Lenient: a malformed stored payload degrades to "no address on file"
        let shipping: Option<ShippingDetails> =
            serde_json::from_value(self.shipping_address).ok();

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            total: self.total,
            status,
            shipping,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, total, status, shipping_address, created_at, updated_at";

const ITEM_JOIN: &str = r"
    SELECT oi.order_id, oi.product_id, p.title AS product_title,
           p.image AS product_image, oi.quantity, oi.price, oi.options
    FROM shop.order_items oi
    LEFT JOIN shop.products p ON p.id = oi.product_id
    WHERE oi.order_id = ANY($1)
    ORDER BY oi.position ASC
";

/// Repository for the order engine.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order from a cart snapshot, atomically with its items and
    /// the stock decrements.
    ///
    /// See the module docs for the contract. The submitted shipping details
    /// are serialized onto the order and their non-empty phone/address are
    /// written back to the user's profile (last-submission-wins).
    ///
    /// # Errors
    ///
    /// - `RepositoryError::EmptyOrder` when every line item referenced a
    ///   missing product; nothing is committed.
    /// - `RepositoryError::Database` on any storage failure; the transaction
    ///   rolls back and the caller's cart stays intact for retry.
    #[instrument(skip(self, lines, shipping), fields(user_id = %user_id, lines = lines.len()))]
    pub async fn create(
        &self,
        user_id: UserId,
        lines: &[NewOrderLine],
        shipping: &ShippingDetails,
        request_token: Option<&str>,
    ) -> Result<CreatedOrder, RepositoryError> {
        // Idempotency: a retried submission with the same token returns the
        // order it already created.
        if let Some(token) = request_token
            && let Some(existing) = self.find_by_token(user_id, token).await?
        {
            return Ok(existing);
        }

        let mut tx = self.pool.begin().await?;

        let mut total = Decimal::ZERO;
        let mut skipped = Vec::new();
        let mut items: Vec<(ProductId, i32, Decimal, serde_json::Value)> = Vec::new();

        for line in lines {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                RepositoryError::DataCorruption("line item quantity overflow".to_owned())
            })?;

            // Fresh fetch: the client's idea of the price is irrelevant
            let found: Option<(Decimal,)> =
                sqlx::query_as("SELECT price FROM shop.products WHERE id = $1")
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let Some((price,)) = found else {
                skipped.push(line.product_id);
                continue;
            };

            // Relative decrement: two concurrent checkouts against the same
            // product serialize here without an application-level lock.
            let (new_stock,): (i32,) = sqlx::query_as(
                r"
                UPDATE shop.products
                SET stock = stock - $2, updated_at = NOW()
                WHERE id = $1
                RETURNING stock
                ",
            )
            .bind(line.product_id)
            .bind(quantity)
            .fetch_one(&mut *tx)
            .await?;

            if new_stock < 0 {
                tracing::warn!(
                    product_id = %line.product_id,
                    stock = new_stock,
                    "stock went negative; oversold or stale inventory"
                );
            }

            total += line_total(price, line.quantity);
            let options = serde_json::to_value(&line.options).unwrap_or_default();
            items.push((line.product_id, quantity, price, options));
        }

        if items.is_empty() {
            // Do not commit an empty order; the decrements above never ran
            // for skipped lines, so dropping the transaction loses nothing.
            return Err(RepositoryError::EmptyOrder);
        }

        let order_id = OrderId::generate();
        let shipping_json = serde_json::to_value(shipping).map_err(|e| {
            RepositoryError::DataCorruption(format!("unserializable shipping details: {e}"))
        })?;

        let inserted = sqlx::query(
            r"
            INSERT INTO shop.orders (id, user_id, total, status, shipping_address, request_token)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .bind(total)
        .bind(OrderStatus::Confirmed.as_str())
        .bind(&shipping_json)
        .bind(request_token)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            // Two in-flight submissions raced on the same token: the loser
            // rolls back and reports the winner's order.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
                && let Some(token) = request_token
            {
                drop(tx);
                if let Some(existing) = self.find_by_token(user_id, token).await? {
                    return Ok(existing);
                }
            }
            return Err(RepositoryError::Database(e));
        }

        for (position, (product_id, quantity, price, options)) in items.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO shop.order_items (order_id, product_id, position, quantity, price, options)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(i32::try_from(position).unwrap_or_default())
            .bind(quantity)
            .bind(price)
            .bind(options)
            .execute(&mut *tx)
            .await?;
        }

        // Opportunistic profile write-back: overwrite only with non-empty values
        sqlx::query(
            r"
            UPDATE shop.users
            SET phone = COALESCE(NULLIF($2, ''), phone),
                address = COALESCE(NULLIF($3, ''), address),
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .bind(shipping.phone.trim())
        .bind(shipping.address.trim())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, %total, skipped = skipped.len(), "order created");

        Ok(CreatedOrder {
            order_id,
            total,
            skipped,
            duplicate: false,
        })
    }

    /// Look up a previously committed order by idempotency token.
    async fn find_by_token(
        &self,
        user_id: UserId,
        token: &str,
    ) -> Result<Option<CreatedOrder>, RepositoryError> {
        let row: Option<(OrderId, Decimal)> = sqlx::query_as(
            "SELECT id, total FROM shop.orders WHERE user_id = $1 AND request_token = $2",
        )
        .bind(user_id)
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(order_id, total)| CreatedOrder {
            order_id,
            total,
            skipped: Vec::new(),
            duplicate: true,
        }))
    }

    /// List a user's orders, newest first, items included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r"
            SELECT {ORDER_COLUMNS} FROM shop.orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Get one order, scoped to its owner.
    ///
    /// Returns `None` both for a missing order and for someone else's order;
    /// the caller cannot tell the difference, by construction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };
        let mut orders = self.attach_items(vec![row]).await?;
        Ok(orders.pop())
    }

    /// Fetch items for a batch of orders and zip them together.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<uuid::Uuid> = rows.iter().map(|r| r.id.as_uuid()).collect();

        let item_rows: Vec<ItemRow> = sqlx::query_as(ITEM_JOIN)
            .bind(&ids)
            .fetch_all(self.pool)
            .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            by_order
                .entry(item.order_id)
                .or_default()
                .push(item.into_item());
        }

        rows.into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}
