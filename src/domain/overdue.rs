//! Overdue classification.

use chrono::{DateTime, Duration, Utc};

use super::order::Order;

/// Minutes an active order may wait before it is flagged.
pub const DEFAULT_OVERDUE_MINUTES: i64 = 15;

/// Largest configurable threshold: one week.
pub const MAX_OVERDUE_MINUTES: i64 = 7 * 24 * 60;

/// Pure predicate: an active order older than the threshold is overdue.
///
/// The comparison is strict, so an order at exactly the threshold is not
/// yet overdue. Ready orders are never overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueClassifier {
    threshold: Duration,
}

impl OverdueClassifier {
    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    /// Thresholds beyond what a `Duration` can hold saturate.
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Self {
        Self::new(Duration::try_minutes(minutes).unwrap_or(Duration::MAX))
    }

    #[must_use]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    #[must_use]
    pub fn is_overdue(&self, order: &Order, now: DateTime<Utc>) -> bool {
        order.status.is_active() && now - order.timestamp > self.threshold
    }
}

impl Default for OverdueClassifier {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_OVERDUE_MINUTES)
    }
}

/// [`OverdueClassifier::is_overdue`] with the default threshold.
#[must_use]
pub fn is_overdue(order: &Order, now: DateTime<Utc>) -> bool {
    OverdueClassifier::default().is_overdue(order, now)
}
