//! New-order detection across successive snapshots.

use std::collections::HashSet;

use super::id::OrderId;
use super::snapshot::Snapshot;

/// Remembers which orders were pending at the previous delivery.
///
/// A delivery that introduces any pending id not seen pending before yields
/// one batch covering all of them. Since status never goes back to
/// pending, an order can only be reported once.
#[derive(Debug, Default)]
pub struct NewOrderDetector {
    known_pending: HashSet<OrderId>,
}

impl NewOrderDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `snapshot` against the retained set, then retain its pending ids.
    ///
    /// Returns the newly pending ids in snapshot order, empty if none.
    pub fn observe(&mut self, snapshot: &Snapshot) -> Vec<OrderId> {
        let pending = snapshot.pending_ids();
        let arrived: Vec<OrderId> = snapshot
            .iter()
            .filter(|order| pending.contains(&order.id) && !self.known_pending.contains(&order.id))
            .map(|order| order.id.clone())
            .collect();
        self.known_pending = pending;
        arrived
    }

    /// Number of ids currently retained as pending.
    #[must_use]
    pub fn known_pending(&self) -> usize {
        self.known_pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use crate::testkit::domain::{order, placed_at};

    fn pending(ids: &[&str]) -> Snapshot {
        Snapshot::from_orders(
            1,
            ids.iter()
                .map(|id| order(id, OrderStatus::Pending, placed_at(0)))
                .collect(),
        )
    }

    #[test]
    fn first_delivery_reports_every_pending_order() {
        let mut detector = NewOrderDetector::new();
        let arrived = detector.observe(&pending(&["a", "b"]));
        assert_eq!(arrived, vec![OrderId::new("a"), OrderId::new("b")]);
        assert_eq!(detector.known_pending(), 2);
    }

    #[test]
    fn only_the_difference_is_reported() {
        let mut detector = NewOrderDetector::new();
        detector.observe(&pending(&["a", "b"]));
        let arrived = detector.observe(&pending(&["b", "c"]));
        assert_eq!(arrived, vec![OrderId::new("c")]);
    }

    #[test]
    fn unchanged_delivery_reports_nothing() {
        let mut detector = NewOrderDetector::new();
        detector.observe(&pending(&["a"]));
        assert!(detector.observe(&pending(&["a"])).is_empty());
    }

    #[test]
    fn started_orders_do_not_retrigger() {
        let mut detector = NewOrderDetector::new();
        detector.observe(&pending(&["a"]));
        let moved = Snapshot::from_orders(2, vec![order("a", OrderStatus::Preparing, placed_at(0))]);
        assert!(detector.observe(&moved).is_empty());
        assert_eq!(detector.known_pending(), 0);
    }
}
