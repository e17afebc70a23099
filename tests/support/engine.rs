use std::sync::Arc;
use std::time::Duration;

use kitchenline::adapter::MemoryOrderStore;
use kitchenline::app::{EngineConfig, KitchenEngine};
use kitchenline::domain::Snapshot;
use kitchenline::error::SubscriptionError;
use kitchenline::testkit::clock::ManualClock;
use kitchenline::testkit::notifier::RecordingNotifier;
use tokio::sync::broadcast;

const WAIT: Duration = Duration::from_secs(2);

pub struct Harness {
    pub store: MemoryOrderStore,
    pub clock: ManualClock,
    pub notifier: RecordingNotifier,
    pub engine: KitchenEngine,
}

impl Harness {
    pub async fn start(store: MemoryOrderStore, clock: ManualClock) -> Self {
        let notifier = RecordingNotifier::new();
        let engine = KitchenEngine::start(
            Arc::new(store.clone()),
            Arc::new(notifier.clone()),
            Arc::new(clock.clone()),
            EngineConfig::default(),
        )
        .await
        .expect("engine starts");
        let harness = Self {
            store,
            clock,
            notifier,
            engine,
        };
        harness.generation(1).await;
        harness
    }

    /// Wait for a snapshot at least as new as `generation`.
    pub async fn generation(&self, generation: u64) -> Arc<Snapshot> {
        tokio::time::timeout(WAIT, self.engine.wait_for_generation(generation))
            .await
            .expect("snapshot published in time")
            .expect("subscription alive")
    }
}

pub async fn next_error(rx: &mut broadcast::Receiver<SubscriptionError>) -> SubscriptionError {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("error reported in time")
        .expect("error channel open")
}
