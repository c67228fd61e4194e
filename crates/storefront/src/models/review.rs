//! Product review model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use echo_ember_core::{ProductId, ReviewId, UserId};

/// A customer review of a product. Append-only: reviews are never edited
/// or deleted through this service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    #[serde(skip)]
    pub user_id: UserId,
    /// Display name captured at submission time.
    pub user_name: String,
    /// 1 to 5 inclusive.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    /// Check rating bounds and a non-empty comment.
    #[must_use]
    pub fn validation_error(&self) -> Option<&'static str> {
        if !(1..=5).contains(&self.rating) {
            return Some("rating must be between 1 and 5");
        }
        if self.comment.trim().is_empty() {
            return Some("comment must not be empty");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8, comment: &str) -> NewReview {
        NewReview {
            product_id: ProductId::generate(),
            user_id: UserId::generate(),
            user_name: "Asha".to_owned(),
            rating,
            comment: comment.to_owned(),
        }
    }

    #[test]
    fn accepts_valid_ratings() {
        for rating in 1..=5 {
            assert!(review(rating, "lovely").validation_error().is_none());
        }
    }

    #[test]
    fn rejects_out_of_range_rating() {
        assert!(review(0, "nope").validation_error().is_some());
        assert!(review(6, "nope").validation_error().is_some());
    }

    #[test]
    fn rejects_blank_comment() {
        assert!(review(4, "   ").validation_error().is_some());
    }
}
