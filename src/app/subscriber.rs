//! Live order feed to published snapshots.
//!
//! The subscriber task is the single writer of the current [`Snapshot`].
//! Each delivery is decoded, handed to every [`SnapshotConsumer`] in turn,
//! and only then published on a `watch` channel, so deliveries never
//! overlap. Readers clone the `Arc` and always see one complete snapshot.
//!
//! Feed errors go out on a `broadcast` side channel. The last good snapshot
//! stays published and the feed is kept open; reconnecting is the store
//! client's job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::domain::{NewOrderDetector, Order, OrderKind, Snapshot};
use crate::error::{StoreError, SubscriptionError};
use crate::port::{
    Event, FieldFilter, NewOrdersEvent, Notifier, OrderDocument, OrderFeed, OrderStore,
};

/// Capacity of the error side channel.
const ERROR_CHANNEL_CAPACITY: usize = 64;

/// Downstream work run on the subscriber task for every delivery.
///
/// The next delivery is not processed until every consumer has returned.
pub trait SnapshotConsumer: Send {
    fn consume(&mut self, snapshot: &Snapshot);

    /// Called for feed errors. The snapshot is unchanged.
    fn on_error(&mut self, _error: &SubscriptionError) {}
}

/// Fires one [`Event::NewOrders`] per delivery that brings new pending orders.
pub struct NewOrderAlerts {
    detector: NewOrderDetector,
    notifier: Arc<dyn Notifier>,
}

impl NewOrderAlerts {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            detector: NewOrderDetector::new(),
            notifier,
        }
    }
}

impl SnapshotConsumer for NewOrderAlerts {
    fn consume(&mut self, snapshot: &Snapshot) {
        let arrived = self.detector.observe(snapshot);
        if arrived.is_empty() {
            return;
        }
        info!(
            count = arrived.len(),
            generation = snapshot.generation(),
            "New pending orders detected"
        );
        self.notifier.notify(Event::NewOrders(NewOrdersEvent {
            order_ids: arrived,
            generation: snapshot.generation(),
        }));
    }

    fn on_error(&mut self, error: &SubscriptionError) {
        self.notifier.notify(Event::FeedError {
            reason: error.to_string(),
        });
    }
}

/// Opens the one live subscription for an engine.
pub struct StreamSubscriber {
    store: Arc<dyn OrderStore>,
    kind: OrderKind,
    consumers: Vec<Box<dyn SnapshotConsumer>>,
}

impl StreamSubscriber {
    pub fn new(store: Arc<dyn OrderStore>, kind: OrderKind) -> Self {
        Self {
            store,
            kind,
            consumers: Vec::new(),
        }
    }

    /// Add a consumer; consumers run in registration order.
    #[must_use]
    pub fn with_consumer(mut self, consumer: Box<dyn SnapshotConsumer>) -> Self {
        self.consumers.push(consumer);
        self
    }

    /// Open the subscription and start the delivery task.
    pub async fn subscribe(self) -> Result<SubscriptionHandle, SubscriptionError> {
        let feed = self
            .store
            .subscribe(FieldFilter::order_type(self.kind))
            .await
            .map_err(SubscriptionError::Open)?;
        info!(
            store = self.store.store_name(),
            order_type = self.kind.as_str(),
            "Subscribed to order feed"
        );

        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(Snapshot::empty()));
        let (error_tx, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run_feed(
            feed,
            self.kind,
            self.consumers,
            snapshot_tx,
            error_tx.clone(),
            shutdown_rx,
        ));

        Ok(SubscriptionHandle {
            snapshots: snapshot_rx,
            errors: error_tx,
            shutdown: shutdown_tx,
            task: Mutex::new(Some(task)),
            released: AtomicBool::new(false),
        })
    }
}

/// Handle to the running subscription.
///
/// Dropping the handle also stops the task (the shutdown sender closes),
/// which releases the store listener.
pub struct SubscriptionHandle {
    snapshots: watch::Receiver<Arc<Snapshot>>,
    errors: broadcast::Sender<SubscriptionError>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    released: AtomicBool,
}

impl SubscriptionHandle {
    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// A receiver that is notified whenever a new snapshot is published.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.clone()
    }

    /// Subscribe to feed errors from now on.
    #[must_use]
    pub fn errors(&self) -> broadcast::Receiver<SubscriptionError> {
        self.errors.subscribe()
    }

    /// Whether `unsubscribe` has been called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Stop the task and release the listener. Later calls do nothing.
    pub async fn unsubscribe(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            trace!("Subscription already released");
            return;
        }
        let _ = self.shutdown.send(true);
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Subscriber task ended abnormally");
            }
        }
        info!("Unsubscribed from order feed");
    }
}

async fn run_feed(
    mut feed: OrderFeed,
    kind: OrderKind,
    mut consumers: Vec<Box<dyn SnapshotConsumer>>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    error_tx: broadcast::Sender<SubscriptionError>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut generation = 0u64;

    loop {
        tokio::select! {
            biased;

            // A send of `true` or a dropped handle both end the loop.
            _ = shutdown.changed() => {
                debug!("Subscriber shutdown requested");
                break;
            }

            delivery = feed.deliveries.next() => match delivery {
                Some(Ok(documents)) => {
                    generation += 1;
                    let snapshot = Arc::new(build_snapshot(generation, documents, kind, &error_tx));
                    debug!(generation, orders = snapshot.len(), "Delivery received");
                    for consumer in consumers.iter_mut() {
                        consumer.consume(&snapshot);
                    }
                    snapshot_tx.send_replace(snapshot);
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Order feed error; keeping last snapshot");
                    report(SubscriptionError::Feed(e), &mut consumers, &error_tx);
                }
                None => {
                    info!("Order feed closed by store");
                    report(SubscriptionError::Feed(StoreError::Closed), &mut consumers, &error_tx);
                    break;
                }
            }
        }
    }

    feed.listener.release();
}

fn report(
    error: SubscriptionError,
    consumers: &mut [Box<dyn SnapshotConsumer>],
    error_tx: &broadcast::Sender<SubscriptionError>,
) {
    for consumer in consumers.iter_mut() {
        consumer.on_error(&error);
    }
    let _ = error_tx.send(error);
}

/// Decode one delivery. Unreadable documents are reported and left out.
fn build_snapshot(
    generation: u64,
    documents: Vec<OrderDocument>,
    kind: OrderKind,
    error_tx: &broadcast::Sender<SubscriptionError>,
) -> Snapshot {
    let mut orders: Vec<Order> = Vec::with_capacity(documents.len());
    for doc in documents {
        match Order::from_document(&doc.id, &doc.fields) {
            Ok(order) if order.kind != kind => {
                trace!(order_id = %order.id, kind = order.kind.as_str(), "Ignoring order of other type");
            }
            Ok(order) => {
                if let Err(e) = order.check_stage_fields() {
                    warn!(error = %e, "Order fields inconsistent with status");
                }
                orders.push(order);
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable order document");
                let _ = error_tx.send(SubscriptionError::Document(e));
            }
        }
    }
    Snapshot::from_orders(generation, orders)
}
