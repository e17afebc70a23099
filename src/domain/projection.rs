//! Work-queue projection: filter, sort, then partition a snapshot by status.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::order::{Order, OrderStatus};
use super::overdue::OverdueClassifier;
use super::snapshot::Snapshot;

/// Which orders survive into the queues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Keep only orders the classifier flags as overdue.
    pub overdue_only: bool,
    pub overdue: OverdueClassifier,
}

impl FilterConfig {
    #[must_use]
    pub fn overdue_only(overdue: OverdueClassifier) -> Self {
        Self {
            overdue_only: true,
            overdue,
        }
    }

    fn keeps(&self, order: &Order, now: DateTime<Utc>) -> bool {
        !self.overdue_only || self.overdue.is_overdue(order, now)
    }
}

/// Queue ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Newest first.
    #[default]
    PlacedDesc,
    /// Oldest first.
    PlacedAsc,
    /// Shortest kitchen estimate first; orders without one go last.
    EtaAsc,
}

impl SortMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlacedDesc => "placed_desc",
            Self::PlacedAsc => "placed_asc",
            Self::EtaAsc => "eta_asc",
        }
    }

    fn compare(self, a: &Order, b: &Order) -> Ordering {
        match self {
            Self::PlacedDesc => b.timestamp.cmp(&a.timestamp),
            Self::PlacedAsc => a.timestamp.cmp(&b.timestamp),
            Self::EtaAsc => eta_key(a).cmp(&eta_key(b)),
        }
    }
}

/// Unset estimates sort after every set one. A stored zero counts as unset.
fn eta_key(order: &Order) -> (bool, u32) {
    match order.kitchen_estimated_time {
        Some(minutes) if minutes > 0 => (false, minutes),
        _ => (true, 0),
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "placed_desc" | "timestamp_desc" | "newest" => Ok(Self::PlacedDesc),
            "placed_asc" | "timestamp_asc" | "oldest" => Ok(Self::PlacedAsc),
            "eta_asc" | "eta" => Ok(Self::EtaAsc),
            other => Err(DomainError::UnknownSortMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub mode: SortMode,
}

impl From<SortMode> for SortConfig {
    fn from(mode: SortMode) -> Self {
        Self { mode }
    }
}

/// The three work queues shown to the kitchen.
///
/// Every order that passed the filter appears in exactly one queue, in the
/// order the sort step produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub new_orders: Vec<Order>,
    pub in_progress: Vec<Order>,
    pub ready: Vec<Order>,
}

impl Projection {
    /// The queue holding orders of `status`.
    #[must_use]
    pub fn queue(&self, status: OrderStatus) -> &[Order] {
        match status {
            OrderStatus::Pending => &self.new_orders,
            OrderStatus::Preparing => &self.in_progress,
            OrderStatus::ReadyForPickup => &self.ready,
        }
    }

    /// Orders across all queues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.new_orders.len() + self.in_progress.len() + self.ready.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derive the work queues from a snapshot.
#[must_use]
pub fn project(
    snapshot: &Snapshot,
    filter: &FilterConfig,
    sort: &SortConfig,
    now: DateTime<Utc>,
) -> Projection {
    let mut survivors: Vec<&Order> = snapshot
        .iter()
        .filter(|order| filter.keeps(order, now))
        .collect();

    // `sort_by` is stable: equal keys keep snapshot order.
    survivors.sort_by(|a, b| sort.mode.compare(a, b));

    let mut projection = Projection::default();
    for order in survivors {
        let queue = match order.status {
            OrderStatus::Pending => &mut projection.new_orders,
            OrderStatus::Preparing => &mut projection.in_progress,
            OrderStatus::ReadyForPickup => &mut projection.ready,
        };
        queue.push(order.clone());
    }
    projection
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Duration;

    use super::*;
    use crate::domain::OrderId;
    use crate::testkit::domain::{order, placed_at, OrderBuilder};

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    fn mixed_snapshot() -> Snapshot {
        Snapshot::from_orders(
            1,
            vec![
                order("p1", OrderStatus::Pending, placed_at(0)),
                order("r1", OrderStatus::ReadyForPickup, placed_at(1)),
                order("c1", OrderStatus::Preparing, placed_at(2)),
                order("p2", OrderStatus::Pending, placed_at(3)),
                order("c2", OrderStatus::Preparing, placed_at(4)),
            ],
        )
    }

    #[test]
    fn queues_partition_the_filtered_set() {
        let snapshot = mixed_snapshot();
        let now = placed_at(30);
        for overdue_only in [false, true] {
            for mode in [SortMode::PlacedDesc, SortMode::PlacedAsc, SortMode::EtaAsc] {
                let filter = FilterConfig {
                    overdue_only,
                    ..FilterConfig::default()
                };
                let projection = project(&snapshot, &filter, &mode.into(), now);

                let expected: HashSet<OrderId> = snapshot
                    .iter()
                    .filter(|o| filter.keeps(o, now))
                    .map(|o| o.id.clone())
                    .collect();
                let mut seen = HashSet::new();
                for status in OrderStatus::ALL {
                    for o in projection.queue(status) {
                        assert_eq!(o.status, status);
                        assert!(seen.insert(o.id.clone()), "{} appears twice", o.id);
                    }
                }
                assert_eq!(seen, expected);
            }
        }
    }

    #[test]
    fn placed_modes_are_exact_reverses() {
        let snapshot = mixed_snapshot();
        let now = placed_at(5);
        let desc = project(&snapshot, &FilterConfig::default(), &SortMode::PlacedDesc.into(), now);
        let asc = project(&snapshot, &FilterConfig::default(), &SortMode::PlacedAsc.into(), now);

        for status in OrderStatus::ALL {
            let mut reversed = ids(asc.queue(status));
            reversed.reverse();
            assert_eq!(ids(desc.queue(status)), reversed);
        }
        assert_eq!(ids(&desc.new_orders), ["p2", "p1"]);
    }

    #[test]
    fn eta_sort_puts_unset_estimates_last() {
        let snapshot = Snapshot::from_orders(
            1,
            vec![
                order("none-a", OrderStatus::Pending, placed_at(0)),
                OrderBuilder::new("eta-20").placed(placed_at(1)).eta(20).build(),
                order("none-b", OrderStatus::Pending, placed_at(2)),
                OrderBuilder::new("eta-5").placed(placed_at(3)).eta(5).build(),
            ],
        );
        let projection = project(
            &snapshot,
            &FilterConfig::default(),
            &SortMode::EtaAsc.into(),
            placed_at(4),
        );
        assert_eq!(
            ids(&projection.new_orders),
            ["eta-5", "eta-20", "none-a", "none-b"]
        );
    }

    #[test]
    fn equal_keys_keep_snapshot_order() {
        let snapshot = Snapshot::from_orders(
            1,
            vec![
                order("x", OrderStatus::Pending, placed_at(0)),
                order("y", OrderStatus::Pending, placed_at(0)),
                order("z", OrderStatus::Pending, placed_at(0)),
            ],
        );
        for mode in [SortMode::PlacedDesc, SortMode::PlacedAsc, SortMode::EtaAsc] {
            let projection = project(&snapshot, &FilterConfig::default(), &mode.into(), placed_at(1));
            assert_eq!(ids(&projection.new_orders), ["x", "y", "z"], "{mode}");
        }
    }

    #[test]
    fn overdue_filter_drops_fresh_and_ready_orders() {
        let snapshot = Snapshot::from_orders(
            1,
            vec![
                order("old-pending", OrderStatus::Pending, placed_at(0)),
                order("old-ready", OrderStatus::ReadyForPickup, placed_at(0)),
                order("fresh", OrderStatus::Preparing, placed_at(20)),
            ],
        );
        let now = placed_at(0) + Duration::minutes(25);
        let projection = project(
            &snapshot,
            &FilterConfig::overdue_only(OverdueClassifier::default()),
            &SortConfig::default(),
            now,
        );
        assert_eq!(ids(&projection.new_orders), ["old-pending"]);
        assert!(projection.in_progress.is_empty());
        assert!(projection.ready.is_empty());
        assert_eq!(projection.len(), 1);
    }

    #[test]
    fn sort_mode_parses_legacy_names() {
        assert_eq!("timestamp_desc".parse::<SortMode>().unwrap(), SortMode::PlacedDesc);
        assert_eq!("eta-asc".parse::<SortMode>().unwrap(), SortMode::EtaAsc);
        assert!("random".parse::<SortMode>().is_err());
    }
}
