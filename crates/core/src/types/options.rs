//! Product option groups and per-line-item selections.
//!
//! A product may define option groups such as
//! `{ "name": "Size", "values": ["S", "M", "L"] }`; value order is display
//! order and the first value is the default selection. An order item stores
//! the buyer's choices as a flat name-to-value map.
//!
//! Both payloads originate from the client and are parsed *leniently*:
//! malformed JSON degrades to "no options" rather than failing the request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named option group with an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    /// Display name, e.g. "Size" or "Color".
    pub name: String,
    /// Allowed values in display order; the first is the default selection.
    pub values: Vec<String>,
}

impl OptionGroup {
    /// The default selection for this group, if any values exist.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// The options a buyer chose for one line item, keyed by option name.
///
/// `BTreeMap` keeps serialization deterministic.
pub type SelectedOptions = BTreeMap<String, String>;

/// Parse a product's option-group definitions from raw JSON.
///
/// Returns an empty list for `None`, JSON `null`, or anything that fails to
/// parse as a group array.
#[must_use]
pub fn parse_option_groups(raw: Option<&serde_json::Value>) -> Vec<OptionGroup> {
    match raw {
        Some(value) if !value.is_null() => {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Parse a line item's selected options from raw JSON.
///
/// Same leniency as [`parse_option_groups`]: garbage degrades to empty.
#[must_use]
pub fn parse_selected_options(raw: Option<&serde_json::Value>) -> SelectedOptions {
    match raw {
        Some(value) if !value.is_null() => {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
        _ => SelectedOptions::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_groups() {
        let raw = json!([
            { "name": "Size", "values": ["S", "M", "L"] },
            { "name": "Color", "values": ["Pink"] }
        ]);
        let groups = parse_option_groups(Some(&raw));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Size");
        assert_eq!(groups[0].default_value(), Some("S"));
        assert_eq!(groups[1].values, vec!["Pink"]);
    }

    #[test]
    fn test_malformed_groups_degrade_to_empty() {
        let raw = json!({ "name": "not an array" });
        assert!(parse_option_groups(Some(&raw)).is_empty());
        assert!(parse_option_groups(Some(&json!("garbage"))).is_empty());
        assert!(parse_option_groups(Some(&serde_json::Value::Null)).is_empty());
        assert!(parse_option_groups(None).is_empty());
    }

    #[test]
    fn test_parse_selections() {
        let raw = json!({ "Size": "M", "Color": "Pink" });
        let selected = parse_selected_options(Some(&raw));
        assert_eq!(selected.get("Size").map(String::as_str), Some("M"));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_malformed_selections_degrade_to_empty() {
        assert!(parse_selected_options(Some(&json!([1, 2, 3]))).is_empty());
        assert!(parse_selected_options(None).is_empty());
    }
}
