//! The order record mirrored from the remote store.
//!
//! One record type covers every lifecycle stage. Stage-specific fields are
//! explicit `Option`s whose presence depends on [`OrderStatus`]:
//!
//! | field                      | pending | preparing | ready_for_pickup |
//! |----------------------------|---------|-----------|------------------|
//! | `time_started_preparing`   | absent  | present   | present          |
//! | `prepared_by_cook_id`      | absent  | present   | present          |
//! | `time_ready`               | absent  | absent    | present          |
//! | `kitchen_estimated_time`   | any     | any       | any              |
//!
//! Documents are decoded at the store boundary by [`Order::from_document`];
//! [`Order::check_stage_fields`] reports rows that break the table above.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;
use super::id::{ActorId, OrderId};

/// Preparation stage of an order.
///
/// Only advances `Pending -> Preparing -> ReadyForPickup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    ReadyForPickup,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Preparing, Self::ReadyForPickup];

    /// The only status this one may advance to, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::ReadyForPickup),
            Self::ReadyForPickup => None,
        }
    }

    /// Returns `true` if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ReadyForPickup)
    }

    /// Still being worked on by the kitchen.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Preparing)
    }

    /// Completion shown on the order card progress bar.
    #[must_use]
    pub const fn progress_percent(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Preparing => 50,
            Self::ReadyForPickup => 100,
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::ReadyForPickup => "ready_for_pickup",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::ReadyForPickup => "Ready For Pickup",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready_for_pickup" | "ready" => Ok(Self::ReadyForPickup),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Order type discriminator. Only food orders reach the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    #[default]
    Food,
    Drink,
    #[serde(other)]
    Other,
}

impl OrderKind {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drink => "drink",
            Self::Other => "other",
        }
    }
}

/// A single line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub item_total: Decimal,
}

/// A customer food order as last seen on the change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, deserialize_with = "table_label")]
    pub table_number: Option<String>,
    #[serde(default)]
    pub order_taker_name: Option<String>,
    pub status: OrderStatus,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    /// Kitchen estimate in minutes, always at least one when present.
    #[serde(default)]
    pub kitchen_estimated_time: Option<u32>,
    #[serde(default)]
    pub kitchen_response_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seen_by_kitchen: bool,
    #[serde(default)]
    pub prepared_by_cook_id: Option<ActorId>,
    #[serde(default)]
    pub time_started_preparing: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_ready: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated_by: Option<ActorId>,
    #[serde(default)]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub kind: OrderKind,
}

impl Order {
    /// Decode a store document into an order.
    ///
    /// The document id lives outside the field map, as in the store itself.
    pub fn from_document(
        id: &OrderId,
        fields: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, DomainError> {
        let mut fields = fields.clone();
        fields.insert("id".into(), serde_json::Value::String(id.as_str().into()));
        serde_json::from_value(serde_json::Value::Object(fields)).map_err(|e| {
            DomainError::MalformedDocument {
                order_id: id.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Encode into store fields (without the id).
    pub fn to_fields(&self) -> Result<serde_json::Map<String, serde_json::Value>, DomainError> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("id");
                Ok(map)
            }
            Ok(_) => Err(DomainError::MalformedDocument {
                order_id: self.id.clone(),
                reason: "order did not encode to an object".into(),
            }),
            Err(e) => Err(DomainError::MalformedDocument {
                order_id: self.id.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Verify stage-dependent fields match the status.
    pub fn check_stage_fields(&self) -> Result<(), DomainError> {
        let missing = |field: &'static str| DomainError::StageFieldMismatch {
            order_id: self.id.clone(),
            status: self.status,
            field,
            reason: "required at this stage but absent",
        };
        let unexpected = |field: &'static str| DomainError::StageFieldMismatch {
            order_id: self.id.clone(),
            status: self.status,
            field,
            reason: "present before its stage",
        };

        match self.status {
            OrderStatus::Pending => {
                if self.time_started_preparing.is_some() {
                    return Err(unexpected("timeStartedPreparing"));
                }
                if self.time_ready.is_some() {
                    return Err(unexpected("timeReady"));
                }
            }
            OrderStatus::Preparing => {
                if self.time_started_preparing.is_none() {
                    return Err(missing("timeStartedPreparing"));
                }
                if self.time_ready.is_some() {
                    return Err(unexpected("timeReady"));
                }
            }
            OrderStatus::ReadyForPickup => {
                if self.time_started_preparing.is_none() {
                    return Err(missing("timeStartedPreparing"));
                }
                if self.time_ready.is_none() {
                    return Err(missing("timeReady"));
                }
            }
        }
        if self.kitchen_estimated_time == Some(0) {
            return Err(DomainError::StageFieldMismatch {
                order_id: self.id.clone(),
                status: self.status,
                field: "kitchenEstimatedTime",
                reason: "estimate must be at least one minute",
            });
        }
        Ok(())
    }

    /// Time since the order was placed. Negative skew is clamped to zero.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).max(Duration::zero())
    }

    /// Whole minutes since the order was placed.
    #[must_use]
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.elapsed(now).num_minutes()
    }

    /// Pending and not yet picked up by any cook; highlighted on the board.
    #[must_use]
    pub fn is_unseen(&self) -> bool {
        self.status == OrderStatus::Pending && !self.seen_by_kitchen
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.status.progress_percent()
    }

    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.short()
    }

    /// Total item count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.order_items.iter().map(|item| item.quantity).sum()
    }
}

/// Table labels arrive as either strings or bare numbers.
fn table_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Label>::deserialize(deserializer)? {
        Some(Label::Text(text)) if text.trim().is_empty() => None,
        Some(Label::Text(text)) => Some(text),
        Some(Label::Number(n)) => Some(n.to_string()),
        None => None,
    })
}
