//! Handler for the `board` command, plus the session setup shared with `run`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::adapter::{load_seed_file, MemoryOrderStore};
use crate::app::KitchenEngine;
use crate::cli::{output, BoardArgs, BoardOptions};
use crate::config::Config;
use crate::error::Result;
use crate::port::{Clock, Notifier, NullNotifier, SystemClock};

/// A started engine over a seeded in-memory store.
pub struct Session {
    pub config: Config,
    pub store: MemoryOrderStore,
    pub engine: KitchenEngine,
    pub clock: Arc<dyn Clock>,
}

/// Build the store from the seed file and start an engine on it.
///
/// Returns once the first snapshot has been published.
pub async fn open_session(
    options: &BoardOptions,
    config: Config,
    notifier: Arc<dyn Notifier>,
) -> Result<Session> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let documents = match options.seed_file(&config) {
        Some(path) => {
            let documents = load_seed_file(&path, clock.now())?;
            info!(path = %path.display(), count = documents.len(), "Seed file loaded");
            documents
        }
        None => {
            debug!("No seed file configured; starting with an empty store");
            Vec::new()
        }
    };

    let store = MemoryOrderStore::with_documents(documents);
    let engine = KitchenEngine::start(
        Arc::new(store.clone()),
        notifier,
        Arc::clone(&clock),
        config.engine_config(),
    )
    .await?;
    engine.wait_for_generation(1).await;

    Ok(Session {
        config,
        store,
        engine,
        clock,
    })
}

/// Execute the board command.
pub async fn execute(args: &BoardArgs) -> Result<()> {
    let config = args.options.load_config()?;
    let sort = args.options.sort_mode(&config);
    let overdue_only = args.options.overdue_only(&config);

    let session = open_session(&args.options, config, Arc::new(NullNotifier)).await?;
    let projection = session.engine.project(overdue_only, sort);
    let now = session.clock.now();
    let overdue = session.engine.config().overdue;

    if args.json {
        let value = output::board_json(&projection, now, &overdue);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        output::board(&projection, now, &overdue, sort);
    }

    session.engine.shutdown().await;
    Ok(())
}
