//! Order status state machine.
//!
//! ```text
//!   pending ──start──► preparing ──ready──► ready_for_pickup (terminal)
//! ```
//!
//! Same-state, skipping and backwards moves are all rejected. The stage
//! audit fields are written only by the transition that enters the stage,
//! which is what makes them write-once.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::id::ActorId;
use super::order::OrderStatus;
use super::patch::OrderPatch;

/// A requested move the state machine does not allow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Whether `from -> to` is one of the two legal edges.
#[must_use]
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    from.next() == Some(to)
}

/// Build the mutation for moving an order out of `current` into `target`.
///
/// `current` must be the status read from the latest snapshot, never one
/// asserted by the caller.
pub fn plan_transition(
    current: OrderStatus,
    target: OrderStatus,
    actor: &ActorId,
    now: DateTime<Utc>,
) -> Result<OrderPatch, TransitionError> {
    let mut patch = OrderPatch {
        status: Some(target),
        last_updated_by: Some(actor.clone()),
        last_updated_time: Some(now),
        expected_status: Some(current),
        ..OrderPatch::default()
    };

    match (current, target) {
        (OrderStatus::Pending, OrderStatus::Preparing) => {
            patch.prepared_by_cook_id = Some(actor.clone());
            patch.time_started_preparing = Some(now);
            patch.seen_by_kitchen = Some(true);
        }
        (OrderStatus::Preparing, OrderStatus::ReadyForPickup) => {
            patch.time_ready = Some(now);
        }
        (from, to) => return Err(TransitionError { from, to }),
    }

    Ok(patch)
}
