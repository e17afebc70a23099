//! In-process order store.
//!
//! Behaves like a document database with live queries: every write is
//! merged into the stored field map and then the full matching set is
//! pushed to each listener. Status writes honour the patch precondition,
//! so two sessions racing on the same order cannot both win.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::domain::{OrderId, OrderPatch, OrderStatus};
use crate::error::StoreError;
use crate::port::{Delivery, FieldFilter, Listener, OrderDocument, OrderFeed, OrderStore};

struct ListenerEntry {
    filter: FieldFilter,
    tx: mpsc::UnboundedSender<Delivery>,
}

#[derive(Default)]
struct State {
    documents: Vec<OrderDocument>,
    listeners: HashMap<u64, ListenerEntry>,
    injected_failures: VecDeque<StoreError>,
}

impl State {
    fn matching(&self, filter: &FieldFilter) -> Vec<OrderDocument> {
        self.documents
            .iter()
            .filter(|doc| filter.matches(&doc.fields))
            .cloned()
            .collect()
    }

    /// Push the current view to every listener, dropping closed ones.
    fn broadcast(&mut self) {
        let views: Vec<(u64, Vec<OrderDocument>)> = self
            .listeners
            .iter()
            .map(|(id, entry)| (*id, self.matching(&entry.filter)))
            .collect();
        for (id, view) in views {
            let closed = self
                .listeners
                .get(&id)
                .map_or(true, |entry| entry.tx.send(Ok(view)).is_err());
            if closed {
                trace!(listener = id, "Dropping closed listener");
                self.listeners.remove(&id);
            }
        }
    }

    fn position(&self, id: &OrderId) -> Option<usize> {
        self.documents.iter().position(|doc| &doc.id == id)
    }
}

#[derive(Default)]
struct Inner {
    state: RwLock<State>,
    next_listener: AtomicU64,
    releases: AtomicUsize,
    update_calls: AtomicUsize,
}

/// Thread-safe in-memory [`OrderStore`]. Cloning shares the collection.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<Inner>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with documents.
    #[must_use]
    pub fn with_documents(documents: Vec<OrderDocument>) -> Self {
        let store = Self::new();
        store.put_all(documents);
        store
    }

    /// Add a document with a store-assigned id, as the ordering workflow does.
    pub fn insert(&self, fields: Map<String, Value>) -> OrderId {
        let id = OrderId::generate();
        self.put(OrderDocument::new(id.clone(), fields));
        id
    }

    /// Create or replace a document wholesale.
    pub fn put(&self, document: OrderDocument) {
        self.put_all(vec![document]);
    }

    /// Create or replace several documents as one write batch, delivered
    /// to listeners once.
    pub fn put_all(&self, documents: Vec<OrderDocument>) {
        let mut state = self.inner.state.write();
        for document in documents {
            match state.position(&document.id) {
                Some(i) => state.documents[i] = document,
                None => state.documents.push(document),
            }
        }
        state.broadcast();
    }

    /// Replace the whole collection in one delivery.
    pub fn replace_all(&self, documents: Vec<OrderDocument>) {
        let mut state = self.inner.state.write();
        state.documents = documents;
        state.broadcast();
    }

    /// Delete a document. Returns whether it existed.
    pub fn remove(&self, id: &OrderId) -> bool {
        let mut state = self.inner.state.write();
        let Some(i) = state.position(id) else {
            return false;
        };
        state.documents.remove(i);
        state.broadcast();
        true
    }

    /// Current fields of a document.
    #[must_use]
    pub fn document(&self, id: &OrderId) -> Option<Map<String, Value>> {
        let state = self.inner.state.read();
        state.position(id).map(|i| state.documents[i].fields.clone())
    }

    /// All documents in insertion order.
    #[must_use]
    pub fn documents(&self) -> Vec<OrderDocument> {
        self.inner.state.read().documents.clone()
    }

    /// Deliver an error to every listener without touching the data.
    pub fn emit_error(&self, error: StoreError) {
        let state = self.inner.state.read();
        for entry in state.listeners.values() {
            let _ = entry.tx.send(Err(error.clone()));
        }
    }

    /// End every open feed, as a dropped connection would.
    pub fn disconnect(&self) {
        self.inner.state.write().listeners.clear();
    }

    /// Make the next `update` fail with `error` without writing.
    pub fn fail_next_update(&self, error: StoreError) {
        self.inner.state.write().injected_failures.push_back(error);
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.state.read().listeners.len()
    }

    /// How many listener registrations have been released.
    #[must_use]
    pub fn release_count(&self) -> usize {
        self.inner.releases.load(Ordering::SeqCst)
    }

    /// How many times `update` has been called, successful or not.
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.inner.update_calls.load(Ordering::SeqCst)
    }
}

struct MemoryListener {
    id: u64,
    inner: Arc<Inner>,
}

impl Listener for MemoryListener {
    fn release(self: Box<Self>) {
        self.inner.state.write().listeners.remove(&self.id);
        self.inner.releases.fetch_add(1, Ordering::SeqCst);
        debug!(listener = self.id, "Listener released");
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn subscribe(&self, filter: FieldFilter) -> Result<OrderFeed, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.inner.state.write();
            // Initial view, like a live query's first callback.
            let _ = tx.send(Ok(state.matching(&filter)));
            state.listeners.insert(id, ListenerEntry { filter, tx });
        }
        debug!(listener = id, "Listener registered");

        let deliveries = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|delivery| (delivery, rx))
        })
        .boxed();

        Ok(OrderFeed {
            deliveries,
            listener: Box::new(MemoryListener {
                id,
                inner: Arc::clone(&self.inner),
            }),
        })
    }

    async fn update(&self, id: &OrderId, patch: &OrderPatch) -> Result<(), StoreError> {
        self.inner.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.inner.state.write();

        if let Some(error) = state.injected_failures.pop_front() {
            return Err(error);
        }

        let index = state
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(expected) = patch.expected_status {
            let actual = state.documents[index]
                .fields
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("missing")
                .to_string();
            if actual.parse::<OrderStatus>().ok() != Some(expected) {
                return Err(StoreError::PreconditionFailed {
                    order_id: id.clone(),
                    expected,
                    actual,
                });
            }
        }

        let fields = &mut state.documents[index].fields;
        for (key, value) in patch.to_fields() {
            fields.insert(key, value);
        }
        state.broadcast();
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
