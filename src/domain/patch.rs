//! Partial order updates sent to the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::ActorId;
use super::order::OrderStatus;

/// A partial update: only the `Some` fields are written.
///
/// `expected_status` is not a document field. It is a precondition for
/// stores that can compare-and-set; the write must be refused if the
/// document's status no longer matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<ActorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_by_cook_id: Option<ActorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_started_preparing: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seen_by_kitchen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ready: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_estimated_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_response_timestamp: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub expected_status: Option<OrderStatus>,
}

impl OrderPatch {
    /// The document fields this patch writes.
    #[must_use]
    pub fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // Every field is a plain string, bool, number or timestamp.
            _ => serde_json::Map::new(),
        }
    }

    /// Names of the fields this patch writes, in wire spelling.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.to_fields().keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_set_fields_are_written() {
        let patch = OrderPatch {
            status: Some(OrderStatus::ReadyForPickup),
            seen_by_kitchen: Some(true),
            expected_status: Some(OrderStatus::Preparing),
            ..OrderPatch::default()
        };
        let fields = patch.to_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["status"], json!("ready_for_pickup"));
        assert_eq!(fields["seenByKitchen"], json!(true));
        assert!(!fields.contains_key("expectedStatus"));
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(OrderPatch::default().is_empty());
    }
}
