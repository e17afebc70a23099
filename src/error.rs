use std::fmt;

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::{EstimateError, OrderId, OrderStatus, TransitionError};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reported by a remote order store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transient: network or backend unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write (permissions, validation rules).
    #[error("update rejected: {0}")]
    Rejected(String),

    /// A compare-and-set precondition no longer held.
    #[error("order {order_id} is {actual}, expected {expected}")]
    PreconditionFailed {
        order_id: OrderId,
        expected: OrderStatus,
        actual: String,
    },

    #[error("order {0} does not exist in the store")]
    NotFound(OrderId),

    /// The listener or the store itself has shut down.
    #[error("store connection closed")]
    Closed,
}

/// Problems on the live order feed, surfaced on the error side channel.
///
/// None of these end the subscription; the last good snapshot stays
/// published.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("failed to open order feed: {0}")]
    Open(#[source] StoreError),

    #[error("order feed error: {0}")]
    Feed(#[source] StoreError),

    /// A single document was unreadable and left out of the snapshot.
    #[error("skipped document: {0}")]
    Document(#[source] DomainError),
}

/// The mutation a failed command attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Transition { target: OrderStatus },
    SetEstimate { minutes: u32 },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition { target } => write!(f, "transition to {target}"),
            Self::SetEstimate { minutes } => write!(f, "set estimate to {minutes} min"),
        }
    }
}

/// Command failures. Everything but `MutationFailure` is decided locally,
/// before any store call. Nothing is retried; re-invoke to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("order {order_id}: {source}")]
    InvalidTransition {
        order_id: OrderId,
        source: TransitionError,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("{operation} for order {order_id} failed: {source}")]
    MutationFailure {
        order_id: OrderId,
        operation: Operation,
        source: StoreError,
    },
}

impl From<EstimateError> for CommandError {
    fn from(err: EstimateError) -> Self {
        Self::InvalidInput {
            field: "minutes",
            reason: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_failure_names_the_operation() {
        let err = CommandError::MutationFailure {
            order_id: OrderId::new("o-9"),
            operation: Operation::Transition {
                target: OrderStatus::Preparing,
            },
            source: StoreError::Unavailable("timeout".into()),
        };
        assert_eq!(
            err.to_string(),
            "transition to preparing for order o-9 failed: store unavailable: timeout"
        );
    }

    #[test]
    fn estimate_errors_become_invalid_input() {
        let err: CommandError = EstimateError::NotPositive(0).into();
        assert!(matches!(err, CommandError::InvalidInput { field: "minutes", .. }));
    }
}
