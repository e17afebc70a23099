//! Builders for domain primitives used across tests.
//!
//! All instants are offsets from [`base_time`] so assertions can talk in
//! whole minutes instead of timestamps.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::domain::{ActorId, Order, OrderId, OrderItem, OrderKind, OrderStatus};
use crate::port::OrderDocument;

/// Fixed reference instant: 2026-01-05 18:00 UTC.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 0)
        .single()
        .expect("valid base time")
}

/// `minutes` after [`base_time`].
pub fn placed_at(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

/// A food order with stage fields consistent with `status`.
pub fn order(id: &str, status: OrderStatus, placed: DateTime<Utc>) -> Order {
    OrderBuilder::new(id).status(status).placed(placed).build()
}

/// Store fields for a food order, as the ordering app writes them.
///
/// Stage fields are filled in for non-pending statuses so the document
/// decodes cleanly.
pub fn food_fields(status: &str, placed: DateTime<Utc>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("tableNumber".into(), json!("4"));
    fields.insert("orderTakerName".into(), json!("ana"));
    fields.insert("status".into(), json!(status));
    fields.insert("timestamp".into(), json!(placed.to_rfc3339()));
    fields.insert(
        "orderItems".into(),
        json!([{"name": "Sinigang", "quantity": 1, "unitPrice": "180", "itemTotal": "180"}]),
    );
    fields.insert("totalAmount".into(), json!("180"));
    fields.insert("type".into(), json!("food"));

    if status != "pending" {
        let started = placed + Duration::minutes(1);
        fields.insert("seenByKitchen".into(), json!(true));
        fields.insert("preparedByCookId".into(), json!("cook-1"));
        fields.insert("timeStartedPreparing".into(), json!(started.to_rfc3339()));
    }
    if status == "ready_for_pickup" {
        let ready = placed + Duration::minutes(2);
        fields.insert("timeReady".into(), json!(ready.to_rfc3339()));
    }
    fields
}

/// A store document wrapping [`food_fields`].
pub fn document(id: &str, status: &str, placed: DateTime<Utc>) -> OrderDocument {
    OrderDocument::new(id, food_fields(status, placed))
}

/// Fluent builder for [`Order`] values.
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    /// A pending food order placed at [`base_time`].
    pub fn new(id: &str) -> Self {
        Self {
            order: Order {
                id: OrderId::new(id),
                table_number: Some("1".into()),
                order_taker_name: None,
                status: OrderStatus::Pending,
                timestamp: base_time(),
                order_items: Vec::new(),
                total_amount: Decimal::ZERO,
                notes: None,
                kitchen_estimated_time: None,
                kitchen_response_timestamp: None,
                seen_by_kitchen: false,
                prepared_by_cook_id: None,
                time_started_preparing: None,
                time_ready: None,
                last_updated_by: None,
                last_updated_time: None,
                kind: OrderKind::Food,
            },
        }
    }

    pub fn placed(mut self, at: DateTime<Utc>) -> Self {
        self.order.timestamp = at;
        self
    }

    pub fn eta(mut self, minutes: u32) -> Self {
        self.order.kitchen_estimated_time = Some(minutes);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.order.status = status;
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.order.notes = Some(notes.into());
        self
    }

    pub fn table(mut self, table: &str) -> Self {
        self.order.table_number = Some(table.into());
        self
    }

    pub fn taker(mut self, name: &str) -> Self {
        self.order.order_taker_name = Some(name.into());
        self
    }

    /// Add a line item and fold it into the order total.
    pub fn item(mut self, name: &str, quantity: u32, unit_price: Decimal) -> Self {
        let item_total = unit_price * Decimal::from(quantity);
        self.order.total_amount += item_total;
        self.order.order_items.push(OrderItem {
            name: name.into(),
            quantity,
            unit_price,
            item_total,
        });
        self
    }

    pub fn kind(mut self, kind: OrderKind) -> Self {
        self.order.kind = kind;
        self
    }

    /// Finish the order, filling stage fields to match its status.
    pub fn build(mut self) -> Order {
        let placed = self.order.timestamp;
        if self.order.status != OrderStatus::Pending {
            self.order.seen_by_kitchen = true;
            self.order.prepared_by_cook_id = Some(ActorId::new("cook-1"));
            self.order.time_started_preparing = Some(placed + Duration::minutes(1));
        }
        if self.order.status == OrderStatus::ReadyForPickup {
            self.order.time_ready = Some(placed + Duration::minutes(2));
        }
        self.order
    }
}
