//! Domain validation errors.
//!
//! These errors describe documents or values that break the order model's
//! invariants. They are produced at the store boundary (decoding) and by
//! parsers, never by the command paths, which have their own taxonomy in
//! [`crate::error::CommandError`].

use thiserror::Error;

use super::id::OrderId;
use super::order::OrderStatus;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A store document could not be decoded into an order.
    #[error("malformed order document {order_id}: {reason}")]
    MalformedDocument {
        /// The document id.
        order_id: OrderId,
        /// Decoder message.
        reason: String,
    },

    /// A stage-dependent field disagrees with the order's status.
    #[error("order {order_id} is {status} but {field} is {reason}")]
    StageFieldMismatch {
        order_id: OrderId,
        status: OrderStatus,
        field: &'static str,
        reason: &'static str,
    },

    /// A status string did not name a known status.
    #[error("unknown order status '{0}'")]
    UnknownStatus(String),

    /// A sort mode string did not name a known mode.
    #[error("unknown sort mode '{0}' (expected placed_desc, placed_asc or eta_asc)")]
    UnknownSortMode(String),
}
