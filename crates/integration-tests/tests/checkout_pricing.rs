//! Integration tests for checkout pricing and submission validation.
//!
//! Exercises the money arithmetic and shipping rules the storefront quote
//! endpoint composes, plus the presence validation applied to shipping
//! details before an order is accepted.

use echo_ember_core::{SiteSettings, line_total, order_total, shipping_for_subtotal};
use echo_ember_integration_tests::dec;
use echo_ember_storefront::models::ShippingDetails;
use rust_decimal::Decimal;

fn complete_shipping() -> ShippingDetails {
    ShippingDetails {
        first_name: "Meera".into(),
        last_name: "Pillai".into(),
        email: "meera@example.com".into(),
        phone: "9876543210".into(),
        address: "4 Lotus Street".into(),
        city: "Kochi".into(),
        zip: "682001".into(),
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

#[test]
fn test_two_bows_and_a_crown_total() {
    // Two 12.50 bows plus one 32.00 crown
    let cart = [(dec("12.50"), 2), (dec("32.00"), 1)];
    assert_eq!(order_total(cart), dec("57.00"));
}

#[test]
fn test_total_uses_price_snapshots_not_live_prices() {
    // The snapshot taken at submission is what the total is built from;
    // a later catalog price change must not move it.
    let snapshot = dec("10.00");
    let total_at_submission = line_total(snapshot, 2);

    let live_price_after_markup = dec("14.00");
    assert_ne!(line_total(live_price_after_markup, 2), total_at_submission);
    assert_eq!(total_at_submission, dec("20.00"));
}

#[test]
fn test_skipped_lines_contribute_nothing() {
    // Lines for deleted products are dropped before totalling
    let surviving = [(dec("12.50"), 2)];
    assert_eq!(order_total(surviving), dec("25.00"));
}

#[test]
fn test_empty_cart_totals_zero() {
    assert_eq!(order_total([]), Decimal::ZERO);
}

// =============================================================================
// Shipping Quote
// =============================================================================

#[test]
fn test_quote_below_threshold_charges_flat_rate() {
    let settings = SiteSettings::default();
    let subtotal = dec("500.00");
    let shipping =
        shipping_for_subtotal(subtotal, settings.shipping_cost, settings.free_shipping_threshold);
    assert_eq!(shipping, dec("49.00"));
    assert_eq!(subtotal + shipping, dec("549.00"));
}

#[test]
fn test_quote_at_threshold_is_free() {
    let settings = SiteSettings::default();
    let shipping = shipping_for_subtotal(
        settings.free_shipping_threshold,
        settings.shipping_cost,
        settings.free_shipping_threshold,
    );
    assert_eq!(shipping, Decimal::ZERO);
}

#[test]
fn test_quote_tracks_updated_settings() {
    // Back-office settings changes flow straight into the quote
    let settings = SiteSettings {
        shipping_cost: dec("99.00"),
        free_shipping_threshold: dec("1500.00"),
        ..SiteSettings::default()
    };

    let shipping = shipping_for_subtotal(
        dec("1200.00"),
        settings.shipping_cost,
        settings.free_shipping_threshold,
    );
    assert_eq!(shipping, dec("99.00"));
}

#[test]
fn test_zero_subtotal_still_quotes_flat_rate() {
    let settings = SiteSettings::default();
    let shipping = shipping_for_subtotal(
        Decimal::ZERO,
        settings.shipping_cost,
        settings.free_shipping_threshold,
    );
    assert_eq!(shipping, settings.shipping_cost);
}

// =============================================================================
// Shipping Details Validation
// =============================================================================

#[test]
fn test_complete_shipping_passes() {
    assert!(complete_shipping().missing_fields().is_empty());
}

#[test]
fn test_missing_fields_use_wire_names() {
    let mut shipping = complete_shipping();
    shipping.first_name = String::new();
    shipping.zip = "  ".into();
    assert_eq!(shipping.missing_fields(), vec!["firstName", "zip"]);
}

#[test]
fn test_shipping_round_trips_as_camel_case_json() {
    // Details are stored on the order as JSON and re-read for display
    let original = complete_shipping();
    let stored = serde_json::to_value(&original).expect("serializes");
    assert_eq!(stored["firstName"], "Meera");
    assert_eq!(stored["zip"], "682001");

    let read: ShippingDetails = serde_json::from_value(stored).expect("deserializes");
    assert!(read.missing_fields().is_empty());
    assert_eq!(read.city, original.city);
}
