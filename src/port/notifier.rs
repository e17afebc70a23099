//! Notifier port for kitchen alerts.
//!
//! This module defines the trait for reacting to engine events, chiefly
//! the one-shot "new orders arrived" alert that drives the audio cue.

use crate::domain::OrderId;

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One or more orders became pending in a single delivery.
    NewOrders(NewOrdersEvent),
    /// The order feed reported an error; the board may be stale.
    FeedError {
        /// The error message.
        reason: String,
    },
}

/// Batch of orders that arrived in one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrdersEvent {
    /// Newly pending ids, in delivery order.
    pub order_ids: Vec<OrderId>,
    /// Snapshot generation the batch was detected in.
    pub generation: u64,
}

impl NewOrdersEvent {
    #[must_use]
    pub fn len(&self) -> usize {
        self.order_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_ids.is_empty()
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget and are delivered on the subscriber
/// task, so `notify` must return quickly. Spawn for slow work.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::NewOrders(e) => {
                let ids: Vec<&str> = e.order_ids.iter().map(OrderId::as_str).collect();
                info!(
                    count = e.len(),
                    generation = e.generation,
                    order_ids = ?ids,
                    "New orders arrived"
                );
            }
            Event::FeedError { reason } => {
                warn!(reason = %reason, "Order feed error");
            }
        }
    }
}
