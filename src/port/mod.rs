//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the order store, the clock, alert sinks).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │  Order  │            │    Clock    │              │ Notifier  │
//! │  Store  │            │             │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`OrderStore`] - Subscribable remote order collection
//! - [`Clock`] - Injectable current time
//! - [`Notifier`] - New-order alerts and feed warnings

mod clock;
mod notifier;
mod store;

pub use clock::{Clock, SystemClock};
pub use notifier::{Event, LogNotifier, NewOrdersEvent, Notifier, NotifierRegistry, NullNotifier};
pub use store::{Delivery, FieldFilter, Listener, OrderDocument, OrderFeed, OrderStore};
