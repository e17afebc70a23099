//! Remote order store port.
//!
//! The store is an external, subscribable document collection. Its client
//! resolves add/modify/remove deltas into a complete current view, so every
//! delivery on the feed is the full matching set.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::{Map, Value};

use crate::domain::{OrderId, OrderKind, OrderPatch};
use crate::error::StoreError;

/// A raw document as the store holds it: opaque id plus a field map.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDocument {
    pub id: OrderId,
    pub fields: Map<String, Value>,
}

impl OrderDocument {
    pub fn new(id: impl Into<OrderId>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Equality filter evaluated by the store (`field == value`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub equals: Value,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    /// `type == <kind>`.
    #[must_use]
    pub fn order_type(kind: OrderKind) -> Self {
        Self::new("type", kind.as_str())
    }

    #[must_use]
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        fields.get(&self.field) == Some(&self.equals)
    }
}

/// One delivery: the complete matching set, or a transient failure.
pub type Delivery = Result<Vec<OrderDocument>, StoreError>;

/// Store-side registration of a live listener.
///
/// `release` consumes the registration, so it can run at most once.
pub trait Listener: Send {
    fn release(self: Box<Self>);
}

/// An open subscription: the delivery stream and its registration.
pub struct OrderFeed {
    pub deliveries: BoxStream<'static, Delivery>,
    pub listener: Box<dyn Listener>,
}

/// The remote order store.
///
/// Reconnection after transient failures is the store client's job; the
/// feed keeps yielding after an `Err` delivery.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a live subscription to every document matching `filter`.
    async fn subscribe(&self, filter: FieldFilter) -> Result<OrderFeed, StoreError>;

    /// Merge `patch` into one document. Each call is atomic on the store.
    ///
    /// Stores that support preconditions must refuse the write when
    /// `patch.expected_status` is set and no longer matches.
    async fn update(&self, id: &OrderId, patch: &OrderPatch) -> Result<(), StoreError>;

    /// Get the store name for logging/debugging.
    fn store_name(&self) -> &'static str;
}
