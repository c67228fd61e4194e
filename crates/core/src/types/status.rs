//! Order status state machine and user roles.
//!
//! Status values are wire-visible: they are persisted as-is, rendered in the
//! customer timeline, and accepted by the admin transition endpoint. The
//! exact strings matter - `ON_THE_WAY`, not `SHIPPED` or `on_the_way`.

use serde::{Deserialize, Serialize};

/// Error parsing a status or role from its wire string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid value: {0}")]
pub struct StatusError(pub String);

/// Lifecycle status of an order.
///
/// Normal progression is linear; `Cancelled` is an absorbing exception state
/// reachable from any non-terminal status:
///
/// ```text
/// PENDING -> CONFIRMED -> DISPATCHED -> ON_THE_WAY -> DELIVERED
///     \___________________________________________/
///                      v CANCELLED
/// ```
///
/// Orders created through checkout start at `Confirmed` (payment is
/// simulated as immediately successful); `Pending` exists for the timeline
/// and for orders seeded through other paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    #[default]
    Confirmed,
    Dispatched,
    OnTheWay,
    Delivered,
    Cancelled,
}

/// The fixed progression used by the customer-facing timeline.
pub const TIMELINE: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Dispatched,
    OrderStatus::OnTheWay,
    OrderStatus::Delivered,
];

impl OrderStatus {
    /// All statuses, in wire order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Dispatched,
        Self::OnTheWay,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire string for this status (exact, case-sensitive).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Dispatched => "DISPATCHED",
            Self::OnTheWay => "ON_THE_WAY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Dispatched => "Dispatched",
            Self::OnTheWay => "On The Way",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Position of this status in the linear timeline.
    ///
    /// `Cancelled` has no position - it is rendered as a full overlay with
    /// the timeline dimmed, regardless of how far progression had reached.
    #[must_use]
    pub fn timeline_index(self) -> Option<usize> {
        TIMELINE.iter().position(|s| *s == self)
    }

    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether this order was cancelled.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Allowed-transition table: each non-terminal status may advance one
    /// step along the timeline or jump to `Cancelled`. Terminal statuses
    /// admit nothing. Skipping steps or moving backwards is rejected.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(next, Self::Confirmed | Self::Cancelled),
            Self::Confirmed => matches!(next, Self::Dispatched | Self::Cancelled),
            Self::Dispatched => matches!(next, Self::OnTheWay | Self::Cancelled),
            Self::OnTheWay => matches!(next, Self::Delivered | Self::Cancelled),
            Self::Delivered | Self::Cancelled => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "DISPATCHED" => Ok(Self::Dispatched),
            "ON_THE_WAY" => Ok(Self::OnTheWay),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(StatusError(s.to_owned())),
        }
    }
}

/// Role of a user account.
///
/// Elevated to `Admin` out-of-band: the sign-in allow-list or the operator
/// promote command, never by the user themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    /// Wire string for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether this role grants access to the back office.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Self::Customer),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(StatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_round_trip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().expect("wire string parses");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_wire_strings_are_exact() {
        assert_eq!(OrderStatus::OnTheWay.as_str(), "ON_THE_WAY");
        assert!("on_the_way".parse::<OrderStatus>().is_err());
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&OrderStatus::OnTheWay).expect("serialize");
        assert_eq!(json, "\"ON_THE_WAY\"");
        let status: OrderStatus = serde_json::from_str("\"CANCELLED\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_timeline_index() {
        assert_eq!(OrderStatus::Pending.timeline_index(), Some(0));
        assert_eq!(OrderStatus::Confirmed.timeline_index(), Some(1));
        assert_eq!(OrderStatus::Delivered.timeline_index(), Some(4));
        assert_eq!(OrderStatus::Cancelled.timeline_index(), None);
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Dispatched));
        assert!(OrderStatus::Dispatched.can_transition_to(OrderStatus::OnTheWay));
        assert!(OrderStatus::OnTheWay.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for status in TIMELINE {
            if status == OrderStatus::Delivered {
                continue;
            }
            assert!(
                status.can_transition_to(OrderStatus::Cancelled),
                "{status} should allow cancellation"
            );
        }
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_skipping_or_backwards() {
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Dispatched.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>().expect("parses"), Role::Admin);
        assert_eq!("CUSTOMER".parse::<Role>().expect("parses"), Role::Customer);
        assert!("admin".parse::<Role>().is_err());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Customer.is_admin());
    }
}
