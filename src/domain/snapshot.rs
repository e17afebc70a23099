//! Immutable view of every tracked order.

use std::collections::{HashMap, HashSet};

use super::id::OrderId;
use super::order::{Order, OrderStatus};

/// The engine's complete belief about all food orders at one delivery.
///
/// Built once per change-feed delivery and never patched afterwards;
/// consumers share it behind an `Arc`. Iteration follows the order in which
/// the store delivered the documents, which is what stable sorts preserve.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    generation: u64,
    orders: Vec<Order>,
    index: HashMap<OrderId, usize>,
}

impl Snapshot {
    /// The snapshot published before the first delivery arrives.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from one delivery.
    ///
    /// If the store repeats an id, the first occurrence wins.
    #[must_use]
    pub fn from_orders(generation: u64, orders: Vec<Order>) -> Self {
        let mut kept = Vec::with_capacity(orders.len());
        let mut index = HashMap::with_capacity(orders.len());
        for order in orders {
            if index.contains_key(&order.id) {
                continue;
            }
            index.insert(order.id.clone(), kept.len());
            kept.push(order);
        }
        Self {
            generation,
            orders: kept,
            index,
        }
    }

    /// Delivery counter; zero before the first delivery.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.index.get(id).map(|&i| &self.orders[i])
    }

    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.index.contains_key(id)
    }

    /// Orders in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Ids of every order currently waiting to be started.
    #[must_use]
    pub fn pending_ids(&self) -> HashSet<OrderId> {
        self.ids_with_status(OrderStatus::Pending)
    }

    #[must_use]
    pub fn ids_with_status(&self, status: OrderStatus) -> HashSet<OrderId> {
        self.orders
            .iter()
            .filter(|order| order.status == status)
            .map(|order| order.id.clone())
            .collect()
    }
}
