//! Order views for the back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use echo_ember_core::{OrderId, OrderStatus, ProductId, SelectedOptions, UserId};

/// Fallback title for items whose product has been deleted.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// A row of the admin order listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderSummary {
    pub id: OrderId,
    pub user_id: UserId,
    /// Customer display name, falling back to their email.
    pub customer: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line item on the admin order detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderItem {
    pub product_id: Option<ProductId>,
    pub product_title: String,
    pub quantity: u32,
    pub price: Decimal,
    pub options: SelectedOptions,
}

/// Full order detail for the back office.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer: String,
    pub customer_email: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub shipping_address: serde_json::Value,
    pub items: Vec<AdminOrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
