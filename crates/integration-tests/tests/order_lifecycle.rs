//! Integration tests for the order lifecycle.
//!
//! These tests walk orders through the status machine and verify the
//! customer-facing timeline stays consistent with it at every step,
//! without requiring a running database.

use echo_ember_core::{OrderStatus, TIMELINE};
use echo_ember_storefront::models::timeline_for;

// =============================================================================
// Full Progression
// =============================================================================

#[test]
fn test_happy_path_walks_every_timeline_step() {
    let mut status = OrderStatus::Pending;
    for next in TIMELINE.iter().skip(1) {
        assert!(
            status.can_transition_to(*next),
            "{status} should advance to {next}"
        );
        status = *next;
    }
    assert_eq!(status, OrderStatus::Delivered);
    assert!(status.is_terminal());
}

#[test]
fn test_checkout_orders_start_confirmed_and_reach_delivery_in_three_steps() {
    // Payment is simulated as immediately successful, so checkout skips
    // Pending and the back office advances three times.
    let path = [
        OrderStatus::Confirmed,
        OrderStatus::Dispatched,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
    ];
    for pair in path.windows(2) {
        assert!(pair[0].can_transition_to(pair[1]));
    }
}

#[test]
fn test_timeline_tracks_progression() {
    let mut status = OrderStatus::Confirmed;
    loop {
        let (steps, cancelled) = timeline_for(status);
        assert!(!cancelled);
        assert_eq!(steps.len(), TIMELINE.len());

        // Exactly one active step, and it matches the current status
        let active: Vec<_> = steps.iter().filter(|s| s.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status, status);

        // Done steps are a prefix ending at the active step
        let boundary = steps.iter().position(|s| s.active).expect("active step");
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.done, index <= boundary);
        }

        let Some(index) = status.timeline_index() else {
            break;
        };
        match TIMELINE.get(index + 1) {
            Some(next) => status = *next,
            None => break,
        }
    }
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancellation_is_reachable_until_delivery() {
    for status in TIMELINE {
        let allowed = status.can_transition_to(OrderStatus::Cancelled);
        assert_eq!(allowed, status != OrderStatus::Delivered);
    }
}

#[test]
fn test_cancelled_order_dims_the_whole_timeline() {
    // A cancelled order renders a full overlay no matter how far it got
    let (steps, cancelled) = timeline_for(OrderStatus::Cancelled);
    assert!(cancelled);
    assert!(steps.iter().all(|s| !s.done && !s.active));
}

#[test]
fn test_cancellation_is_absorbing() {
    for next in OrderStatus::ALL {
        assert!(!OrderStatus::Cancelled.can_transition_to(next));
    }
}

// =============================================================================
// Illegal Transitions
// =============================================================================

#[test]
fn test_only_one_step_forward_or_cancel_is_allowed() {
    for from in OrderStatus::ALL {
        for to in OrderStatus::ALL {
            let expected = match (from.timeline_index(), to) {
                (Some(index), _) if to.timeline_index() == Some(index + 1) => true,
                (Some(_), OrderStatus::Cancelled) => from != OrderStatus::Delivered,
                _ => false,
            };
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "transition {from} -> {to}"
            );
        }
    }
}

#[test]
fn test_self_transition_is_rejected() {
    for status in OrderStatus::ALL {
        assert!(!status.can_transition_to(status));
    }
}

#[test]
fn test_wire_strings_survive_storage_round_trip() {
    // Statuses are persisted as text and parsed back on read
    for status in OrderStatus::ALL {
        let stored = status.to_string();
        let read: OrderStatus = stored.parse().expect("stored status parses");
        assert_eq!(read, status);
    }
}
