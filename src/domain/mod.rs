//! Store-agnostic domain logic: the order model and everything derived
//! from it without I/O.

mod detector;
pub mod error;
mod estimate;
mod id;
mod order;
mod overdue;
mod patch;
mod projection;
mod snapshot;
mod transition;

// Core domain types
pub use id::{ActorId, OrderId};
pub use order::{Order, OrderItem, OrderKind, OrderStatus};
pub use patch::OrderPatch;
pub use snapshot::Snapshot;

// Derivations
pub use detector::NewOrderDetector;
pub use overdue::{is_overdue, OverdueClassifier, DEFAULT_OVERDUE_MINUTES, MAX_OVERDUE_MINUTES};
pub use projection::{project, FilterConfig, Projection, SortConfig, SortMode};

// Command planning
pub use estimate::{plan_estimate, EstimateError};
pub use transition::{is_valid_transition, plan_transition, TransitionError};

pub use error::DomainError;
