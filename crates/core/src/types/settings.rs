//! Site-wide settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The singleton site configuration record.
///
/// Exactly one row exists; it is seeded by migration with these defaults and
/// only ever updated in place by an administrator (last-write-wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    /// Store name shown in the navigation banner.
    pub store_name: String,
    /// Support contact email, if configured.
    pub support_email: Option<String>,
    /// Flat shipping cost applied below the free-shipping threshold.
    pub shipping_cost: Decimal,
    /// Cart subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Announcement banner text.
    pub announcement_text: String,
    /// Maintenance flag. Present in the schema but not enforced anywhere yet.
    pub maintenance_mode: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            store_name: "Echo & Ember".to_owned(),
            support_email: None,
            shipping_cost: Decimal::new(4900, 2),
            free_shipping_threshold: Decimal::new(99900, 2),
            announcement_text: "Free shipping on orders over \u{20b9}999!".to_owned(),
            maintenance_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SiteSettings::default();
        assert_eq!(settings.store_name, "Echo & Ember");
        assert_eq!(settings.shipping_cost, Decimal::new(4900, 2));
        assert_eq!(settings.free_shipping_threshold, Decimal::new(99900, 2));
        assert!(!settings.maintenance_mode);
    }
}
