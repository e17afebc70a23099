//! Application layer: the live subscription, kitchen commands, and the
//! engine that ties them to one store.

mod commands;
mod engine;
mod subscriber;

pub use commands::{EtaAssignment, TransitionController};
pub use engine::{EngineConfig, KitchenEngine};
pub use subscriber::{NewOrderAlerts, SnapshotConsumer, StreamSubscriber, SubscriptionHandle};
