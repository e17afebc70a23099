//! Kitchen commands: status transitions and ETA assignment.
//!
//! Both read the latest published snapshot, decide locally, and issue at
//! most one store write. Neither touches the snapshot; the change becomes
//! visible when the feed redelivers it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{
    plan_estimate, plan_transition, ActorId, OrderId, OrderPatch, OrderStatus, Snapshot,
};
use crate::error::{CommandError, Operation};
use crate::port::OrderStore;

/// Applies the order state machine against the store.
pub struct TransitionController {
    store: Arc<dyn OrderStore>,
    snapshots: watch::Receiver<Arc<Snapshot>>,
}

impl TransitionController {
    pub fn new(store: Arc<dyn OrderStore>, snapshots: watch::Receiver<Arc<Snapshot>>) -> Self {
        Self { store, snapshots }
    }

    /// Move `order_id` to `target` on behalf of `actor`.
    ///
    /// The current status always comes from the latest snapshot.
    pub async fn request_transition(
        &self,
        order_id: &OrderId,
        target: OrderStatus,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> Result<(), CommandError> {
        let snapshot = Arc::clone(&self.snapshots.borrow());
        let current = snapshot
            .get(order_id)
            .map(|order| order.status)
            .ok_or_else(|| {
                debug!(order_id = %order_id, "Transition for unknown order");
                CommandError::NotFound(order_id.clone())
            })?;

        let patch = plan_transition(current, target, actor, now).map_err(|source| {
            debug!(order_id = %order_id, from = %current, to = %target, "Transition rejected");
            CommandError::InvalidTransition {
                order_id: order_id.clone(),
                source,
            }
        })?;

        write(
            self.store.as_ref(),
            order_id,
            &patch,
            Operation::Transition { target },
        )
        .await?;

        info!(
            order_id = %order_id,
            from = %current,
            to = %target,
            actor = %actor,
            "Order status updated"
        );
        Ok(())
    }
}

/// Writes kitchen time estimates.
pub struct EtaAssignment {
    store: Arc<dyn OrderStore>,
    snapshots: watch::Receiver<Arc<Snapshot>>,
}

impl EtaAssignment {
    pub fn new(store: Arc<dyn OrderStore>, snapshots: watch::Receiver<Arc<Snapshot>>) -> Self {
        Self { store, snapshots }
    }

    /// Overwrite the estimate for `order_id`. Valid in any status.
    pub async fn set_estimate(
        &self,
        order_id: &OrderId,
        minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<(), CommandError> {
        let patch = plan_estimate(minutes, now).map_err(|e| {
            debug!(order_id = %order_id, minutes, "Estimate rejected");
            CommandError::from(e)
        })?;

        let known = self.snapshots.borrow().contains(order_id);
        if !known {
            debug!(order_id = %order_id, "Estimate for unknown order");
            return Err(CommandError::NotFound(order_id.clone()));
        }

        let minutes = patch.kitchen_estimated_time.unwrap_or_default();
        write(
            self.store.as_ref(),
            order_id,
            &patch,
            Operation::SetEstimate { minutes },
        )
        .await?;

        info!(order_id = %order_id, minutes, "Kitchen estimate set");
        Ok(())
    }
}

async fn write(
    store: &dyn OrderStore,
    order_id: &OrderId,
    patch: &OrderPatch,
    operation: Operation,
) -> Result<(), CommandError> {
    store.update(order_id, patch).await.map_err(|source| {
        warn!(order_id = %order_id, operation = %operation, error = %source, "Store update failed");
        CommandError::MutationFailure {
            order_id: order_id.clone(),
            operation,
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryOrderStore;
    use crate::domain::TransitionError;
    use crate::error::StoreError;
    use crate::testkit::domain::{document, order, placed_at};

    fn fixture(orders: Vec<crate::domain::Order>) -> (MemoryOrderStore, watch::Receiver<Arc<Snapshot>>) {
        let store = MemoryOrderStore::new();
        for o in &orders {
            store.put(document(o.id.as_str(), o.status.as_str(), o.timestamp));
        }
        // The receiver keeps the last value after the sender is gone.
        let (_, rx) = watch::channel(Arc::new(Snapshot::from_orders(1, orders)));
        (store, rx)
    }

    #[tokio::test]
    async fn skipping_a_stage_issues_no_write() {
        let (store, rx) = fixture(vec![order("a", OrderStatus::Pending, placed_at(0))]);
        let controller = TransitionController::new(Arc::new(store.clone()), rx);

        let err = controller
            .request_transition(
                &"a".into(),
                OrderStatus::ReadyForPickup,
                &ActorId::new("cook-7"),
                placed_at(5),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CommandError::InvalidTransition {
                order_id: "a".into(),
                source: TransitionError {
                    from: OrderStatus::Pending,
                    to: OrderStatus::ReadyForPickup,
                },
            }
        );
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn start_writes_stage_fields_once() {
        let (store, rx) = fixture(vec![order("a", OrderStatus::Pending, placed_at(0))]);
        let controller = TransitionController::new(Arc::new(store.clone()), rx);

        controller
            .request_transition(
                &"a".into(),
                OrderStatus::Preparing,
                &ActorId::new("cook-7"),
                placed_at(5),
            )
            .await
            .unwrap();

        assert_eq!(store.update_calls(), 1);
        let fields = store.document(&"a".into()).unwrap();
        assert_eq!(fields["status"], "preparing");
        assert_eq!(fields["seenByKitchen"], true);
        assert_eq!(fields["preparedByCookId"], "cook-7");
        assert_eq!(fields["lastUpdatedBy"], "cook-7");
        let started: DateTime<Utc> =
            serde_json::from_value(fields["timeStartedPreparing"].clone()).unwrap();
        assert_eq!(started, placed_at(5));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (store, rx) = fixture(vec![]);
        let controller = TransitionController::new(Arc::new(store.clone()), rx);
        let err = controller
            .request_transition(
                &"ghost".into(),
                OrderStatus::Preparing,
                &ActorId::new("cook-7"),
                placed_at(0),
            )
            .await
            .unwrap_err();
        assert_eq!(err, CommandError::NotFound("ghost".into()));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_names_the_operation() {
        let (store, rx) = fixture(vec![order("a", OrderStatus::Preparing, placed_at(0))]);
        store.fail_next_update(StoreError::Rejected("permission denied".into()));
        let controller = TransitionController::new(Arc::new(store.clone()), rx);

        let err = controller
            .request_transition(
                &"a".into(),
                OrderStatus::ReadyForPickup,
                &ActorId::new("cook-7"),
                placed_at(9),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::MutationFailure {
                operation: Operation::Transition {
                    target: OrderStatus::ReadyForPickup
                },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_positive_estimates_issue_no_write() {
        let (store, rx) = fixture(vec![order("a", OrderStatus::Pending, placed_at(0))]);
        let eta = EtaAssignment::new(Arc::new(store.clone()), rx);

        for minutes in [0, -5] {
            let err = eta.set_estimate(&"a".into(), minutes, placed_at(1)).await.unwrap_err();
            assert!(matches!(err, CommandError::InvalidInput { field: "minutes", .. }));
        }
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn estimate_overwrites_previous_value() {
        let (store, rx) = fixture(vec![order("a", OrderStatus::ReadyForPickup, placed_at(0))]);
        let eta = EtaAssignment::new(Arc::new(store.clone()), rx);

        eta.set_estimate(&"a".into(), 25, placed_at(1)).await.unwrap();
        eta.set_estimate(&"a".into(), 10, placed_at(2)).await.unwrap();

        let fields = store.document(&"a".into()).unwrap();
        assert_eq!(fields["kitchenEstimatedTime"], 10);
        assert_eq!(fields["status"], "ready_for_pickup");
        assert_eq!(store.update_calls(), 2);
    }
}
