//! One kitchen session over one order store.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::info;

use crate::domain::{
    project, ActorId, FilterConfig, Order, OrderId, OrderKind, OrderStatus, OverdueClassifier,
    Projection, Snapshot, SortConfig, SortMode,
};
use crate::error::{CommandError, SubscriptionError};
use crate::port::{Clock, Notifier, OrderStore};

use super::commands::{EtaAssignment, TransitionController};
use super::subscriber::{NewOrderAlerts, StreamSubscriber, SubscriptionHandle};

/// Engine settings, usually built from [`crate::config::KitchenConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Only orders of this type are mirrored.
    pub order_kind: OrderKind,
    pub overdue: OverdueClassifier,
}

/// Owns the subscription and exposes projections and commands.
///
/// Readers get immutable snapshots; commands never touch local state.
/// Dropping the engine releases the store listener.
pub struct KitchenEngine {
    subscription: SubscriptionHandle,
    transitions: TransitionController,
    estimates: EtaAssignment,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl KitchenEngine {
    /// Subscribe to `store` and start mirroring orders.
    pub async fn start(
        store: Arc<dyn OrderStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Result<Self, SubscriptionError> {
        let subscription = StreamSubscriber::new(Arc::clone(&store), config.order_kind)
            .with_consumer(Box::new(NewOrderAlerts::new(notifier)))
            .subscribe()
            .await?;

        let transitions = TransitionController::new(Arc::clone(&store), subscription.watch());
        let estimates = EtaAssignment::new(store, subscription.watch());

        info!(
            overdue_minutes = config.overdue.threshold().num_minutes(),
            "Kitchen engine started"
        );
        Ok(Self {
            subscription,
            transitions,
            estimates,
            clock,
            config,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.subscription.snapshot()
    }

    /// Notified on every published snapshot.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.subscription.watch()
    }

    /// Subscription errors from now on.
    #[must_use]
    pub fn errors(&self) -> broadcast::Receiver<SubscriptionError> {
        self.subscription.errors()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The filter for the board, using the configured overdue threshold.
    #[must_use]
    pub fn filter(&self, overdue_only: bool) -> FilterConfig {
        FilterConfig {
            overdue_only,
            overdue: self.config.overdue,
        }
    }

    /// Project the latest snapshot at the current clock instant.
    #[must_use]
    pub fn project(&self, overdue_only: bool, sort: SortMode) -> Projection {
        project(
            &self.snapshot(),
            &self.filter(overdue_only),
            &SortConfig::from(sort),
            self.clock.now(),
        )
    }

    #[must_use]
    pub fn is_overdue(&self, order: &Order) -> bool {
        self.config.overdue.is_overdue(order, self.clock.now())
    }

    pub async fn request_transition(
        &self,
        order_id: &OrderId,
        target: OrderStatus,
        actor: &ActorId,
    ) -> Result<(), CommandError> {
        self.transitions
            .request_transition(order_id, target, actor, self.clock.now())
            .await
    }

    /// `pending -> preparing`.
    pub async fn start_preparing(
        &self,
        order_id: &OrderId,
        actor: &ActorId,
    ) -> Result<(), CommandError> {
        self.request_transition(order_id, OrderStatus::Preparing, actor)
            .await
    }

    /// `preparing -> ready_for_pickup`.
    pub async fn mark_ready(&self, order_id: &OrderId, actor: &ActorId) -> Result<(), CommandError> {
        self.request_transition(order_id, OrderStatus::ReadyForPickup, actor)
            .await
    }

    pub async fn set_estimate(&self, order_id: &OrderId, minutes: i64) -> Result<(), CommandError> {
        self.estimates
            .set_estimate(order_id, minutes, self.clock.now())
            .await
    }

    /// Wait until a snapshot at least as new as `generation` is published.
    ///
    /// Returns `None` if the subscription ends first.
    pub async fn wait_for_generation(&self, generation: u64) -> Option<Arc<Snapshot>> {
        let mut rx = self.watch();
        loop {
            let current = Arc::clone(&rx.borrow_and_update());
            if current.generation() >= generation {
                return Some(current);
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Release the subscription. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.subscription.unsubscribe().await;
    }
}
