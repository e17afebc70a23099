//! Event-recording notifier.

use std::sync::{Arc, Mutex};

use crate::domain::OrderId;
use crate::port::{Event, Notifier};

/// Thread-safe event collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("lock notifier events").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock notifier events").clone()
    }

    /// Id batches from every `NewOrders` event, oldest first.
    pub fn new_order_batches(&self) -> Vec<Vec<OrderId>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::NewOrders(batch) => Some(batch.order_ids),
                Event::FeedError { .. } => None,
            })
            .collect()
    }

    pub fn feed_errors(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::FeedError { .. }))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events
            .lock()
            .expect("lock notifier events")
            .push(event);
    }
}
