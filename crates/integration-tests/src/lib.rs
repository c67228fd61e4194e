//! Integration tests for Echo & Ember.
//!
//! The tests under `tests/` exercise the cross-crate business rules
//! end-to-end at the type level: the order state machine, checkout
//! pricing, media reconciliation and the dashboard series. They need no
//! running database or media host.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p echo-ember-integration-tests
//! ```

/// Parse a decimal literal in tests.
#[must_use]
pub fn dec(s: &str) -> rust_decimal::Decimal {
    s.parse().expect("decimal literal")
}
