//! Money arithmetic for order totals and checkout shipping.
//!
//! Prices are [`rust_decimal::Decimal`] throughout; floats never touch a
//! total. Totals are computed once at order creation from price snapshots
//! and persisted - they are never recomputed from live product prices.

use rust_decimal::Decimal;

/// Contribution of one line item: `price * quantity`.
#[must_use]
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Order total: sum of line contributions over `(price, quantity)` pairs.
#[must_use]
pub fn order_total<I>(items: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    items
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum()
}

/// Shipping charge for a cart subtotal: free at or above the threshold,
/// otherwise the flat configured cost.
#[must_use]
pub fn shipping_for_subtotal(subtotal: Decimal, cost: Decimal, free_threshold: Decimal) -> Decimal {
    if subtotal >= free_threshold {
        Decimal::ZERO
    } else {
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(d("10.00"), 2), d("20.00"));
        assert_eq!(line_total(d("5.00"), 1), d("5.00"));
    }

    #[test]
    fn test_order_total_sums_lines() {
        // The two-bows cart: 10.00 x 2 + 5.00 x 1 = 25.00
        let total = order_total([(d("10.00"), 2), (d("5.00"), 1)]);
        assert_eq!(total, d("25.00"));
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total([]), Decimal::ZERO);
    }

    #[test]
    fn test_shipping_below_threshold() {
        assert_eq!(
            shipping_for_subtotal(d("500.00"), d("49.00"), d("999.00")),
            d("49.00")
        );
    }

    #[test]
    fn test_shipping_at_and_above_threshold() {
        assert_eq!(
            shipping_for_subtotal(d("999.00"), d("49.00"), d("999.00")),
            Decimal::ZERO
        );
        assert_eq!(
            shipping_for_subtotal(d("2000.00"), d("49.00"), d("999.00")),
            Decimal::ZERO
        );
    }
}
