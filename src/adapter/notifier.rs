//! Audio cue for new orders.

use std::io::Write;

use crate::port::{Event, Notifier};

/// Rings the terminal bell once per new-order batch.
///
/// Stands in for the kitchen speaker; feed errors are ignored here and
/// left to [`crate::port::LogNotifier`].
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self, event: Event) {
        if let Event::NewOrders(_) = event {
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }
}
