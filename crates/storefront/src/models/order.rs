//! Order domain types and the customer-facing status timeline.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use echo_ember_core::{OrderId, OrderStatus, ProductId, SelectedOptions, TIMELINE, UserId};

/// Shipping details submitted at checkout and serialized onto the order.
///
/// Field names are wire-visible (camelCase in the stored payload). All
/// fields are required as non-empty but carry no further format validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl ShippingDetails {
    /// Names of required fields that are empty (after trimming).
    ///
    /// An empty return value means the details pass presence validation.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("zip", &self.zip),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }
}

/// One line of a cart being submitted as an order.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub options: SelectedOptions,
}

/// A committed order line item.
///
/// `price` is a snapshot of the product price at order time and never tracks
/// later price changes. `product_id` is a weak reference: the product may be
/// deleted afterwards, in which case `product_title` falls back to
/// "Unknown Product".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Option<ProductId>,
    pub product_title: String,
    pub product_image: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub options: SelectedOptions,
}

/// Fallback title for items whose product has been deleted.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// A committed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub status: OrderStatus,
    /// Parsed shipping payload; `None` when the stored JSON is malformed
    /// (lenient read, the order still displays).
    pub shipping: Option<ShippingDetails>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One step of the customer-facing order timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub status: OrderStatus,
    pub label: &'static str,
    /// This step has been reached or passed.
    pub done: bool,
    /// This step is the order's current position.
    pub active: bool,
}

/// Derive the display timeline for an order status.
///
/// Returns the five linear steps plus a `cancelled` flag. A cancelled order
/// renders a full overlay with every step dimmed, regardless of how far the
/// order had progressed before cancellation.
#[must_use]
pub fn timeline_for(status: OrderStatus) -> (Vec<TimelineStep>, bool) {
    let cancelled = status.is_cancelled();
    let current = status.timeline_index();

    let steps = TIMELINE
        .iter()
        .enumerate()
        .map(|(index, step)| TimelineStep {
            status: *step,
            label: step.label(),
            done: !cancelled && current.is_some_and(|c| index <= c),
            active: !cancelled && current == Some(index),
        })
        .collect();

    (steps, cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_shipping() -> ShippingDetails {
        ShippingDetails {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
            phone: "9999999999".into(),
            address: "12 Rose Lane".into(),
            city: "Jaipur".into(),
            zip: "302001".into(),
        }
    }

    #[test]
    fn test_missing_fields_none_when_complete() {
        assert!(valid_shipping().missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields_reports_blank_and_whitespace() {
        let mut shipping = valid_shipping();
        shipping.phone = String::new();
        shipping.city = "   ".into();
        assert_eq!(shipping.missing_fields(), vec!["phone", "city"]);
    }

    #[test]
    fn test_shipping_deserializes_camel_case_leniently() {
        let shipping: ShippingDetails =
            serde_json::from_str(r#"{"firstName":"Asha","zip":"302001"}"#).expect("parses");
        assert_eq!(shipping.first_name, "Asha");
        assert_eq!(shipping.zip, "302001");
        // Absent fields default to empty and fail presence validation
        assert!(shipping.missing_fields().contains(&"email"));
    }

    #[test]
    fn test_timeline_mid_progress() {
        let (steps, cancelled) = timeline_for(OrderStatus::Dispatched);
        assert!(!cancelled);
        assert_eq!(steps.len(), 5);
        assert!(steps[0].done && steps[1].done && steps[2].done);
        assert!(!steps[3].done && !steps[4].done);
        assert!(steps[2].active);
        assert_eq!(steps.iter().filter(|s| s.active).count(), 1);
    }

    #[test]
    fn test_timeline_delivered_completes_all() {
        let (steps, cancelled) = timeline_for(OrderStatus::Delivered);
        assert!(!cancelled);
        assert!(steps.iter().all(|s| s.done));
        assert!(steps[4].active);
    }

    #[test]
    fn test_timeline_cancelled_dims_everything() {
        let (steps, cancelled) = timeline_for(OrderStatus::Cancelled);
        assert!(cancelled);
        assert!(steps.iter().all(|s| !s.done && !s.active));
    }
}
