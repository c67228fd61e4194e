//! Product categories.

use serde::{Deserialize, Serialize};

/// Error parsing a [`Category`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of product categories in the shop.
///
/// Browsing filters match case-insensitively (`?category=bows` works), but
/// the canonical display strings are capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bows,
    Tutus,
    Crowns,
    Gifts,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Bows, Self::Tutus, Self::Crowns, Self::Gifts];

    /// Canonical display string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bows => "Bows",
            Self::Tutus => "Tutus",
            Self::Crowns => "Crowns",
            Self::Gifts => "Gifts",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bows" => Ok(Self::Bows),
            "tutus" => Ok(Self::Tutus),
            "crowns" => Ok(Self::Crowns),
            "gifts" => Ok(Self::Gifts),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("bows".parse::<Category>().expect("parses"), Category::Bows);
        assert_eq!("BOWS".parse::<Category>().expect("parses"), Category::Bows);
        assert_eq!("Tutus".parse::<Category>().expect("parses"), Category::Tutus);
    }

    #[test]
    fn test_unknown_rejected() {
        assert!("Hats".parse::<Category>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().expect("parses"), cat);
        }
    }
}
