//! Handler for the `run` command: a live board driven by stdin commands.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::app::KitchenEngine;
use crate::cli::board::{open_session, Session};
use crate::cli::{output, RunArgs, ACTOR_ENV};
use crate::domain::{ActorId, OrderId, OrderStatus, Snapshot, SortMode};
use crate::error::Result;
use crate::port::Notifier;

const HELP: &str = "commands: start <id> | ready <id> | eta <id> <minutes> | details <id> | sort <mode> | overdue on|off | board | help | quit";

/// A line typed by the cook.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start(String),
    Ready(String),
    Eta(String, i64),
    Details(String),
    Sort(SortMode),
    Overdue(bool),
    Board,
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["start", id] => Ok(Command::Start((*id).to_string())),
        ["ready", id] => Ok(Command::Ready((*id).to_string())),
        ["eta", id, minutes] => minutes
            .parse::<i64>()
            .map(|m| Command::Eta((*id).to_string(), m))
            .map_err(|_| format!("minutes must be a whole number, got '{minutes}'")),
        ["details" | "show", id] => Ok(Command::Details((*id).to_string())),
        ["sort", mode] => mode
            .parse::<SortMode>()
            .map(Command::Sort)
            .map_err(|e| e.to_string()),
        ["overdue", "on"] => Ok(Command::Overdue(true)),
        ["overdue", "off"] => Ok(Command::Overdue(false)),
        ["board"] | [] => Ok(Command::Board),
        ["help"] => Ok(Command::Help),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        _ => Err(format!("unrecognised command '{}'", line.trim())),
    }
}

/// Match a full id or a unique prefix (the board shows short ids).
///
/// Unknown input is passed through so the engine reports it as not found.
fn resolve_order(snapshot: &Snapshot, input: &str) -> std::result::Result<OrderId, String> {
    let exact = OrderId::new(input);
    if snapshot.contains(&exact) {
        return Ok(exact);
    }
    let mut matches = snapshot
        .iter()
        .filter(|order| order.id.as_str().starts_with(input))
        .map(|order| order.id.clone());
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(format!("'{input}' matches more than one order")),
        (None, _) => Ok(exact),
    }
}

struct BoardView {
    sort: SortMode,
    overdue_only: bool,
}

impl BoardView {
    fn draw(&self, session: &Session) {
        let projection = session.engine.project(self.overdue_only, self.sort);
        let overdue = session.engine.config().overdue;
        output::board(&projection, session.clock.now(), &overdue, self.sort);
        if self.overdue_only {
            output::note("showing overdue orders only");
        }
    }
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = args.options.load_config()?;
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    config.logging.validate()?;
    config.init_logging();

    let actor = args
        .actor
        .clone()
        .or_else(|| std::env::var(ACTOR_ENV).ok())
        .filter(|id| !id.trim().is_empty())
        .map(ActorId::new);
    let mut view = BoardView {
        sort: args.options.sort_mode(&config),
        overdue_only: args.options.overdue_only(&config),
    };

    let notifier: Arc<dyn Notifier> = Arc::new(config.notifications.build_registry());
    let session = open_session(&args.options, config, notifier).await?;
    info!(actor = ?actor.as_ref().map(ActorId::as_str), "kitchenline session started");

    let mut snapshots = session.engine.watch();
    let mut errors = session.engine.errors();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    view.draw(&session);
    output::note(HELP);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Order feed ended");
                    break;
                }
                view.draw(&session);
            }
            error = errors.recv() => match error {
                Ok(e) => output::warning(&format!("board may be stale: {e}")),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Dropped feed error reports"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(command, &session, actor.as_ref(), &mut view).await,
                    Err(message) => output::error(&message),
                }
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    session.engine.shutdown().await;
    info!("kitchenline stopped");
    Ok(())
}

async fn handle(
    command: Command,
    session: &Session,
    actor: Option<&ActorId>,
    view: &mut BoardView,
) {
    let engine = &session.engine;
    match command {
        Command::Start(input) => transition(engine, actor, &input, OrderStatus::Preparing).await,
        Command::Ready(input) => {
            transition(engine, actor, &input, OrderStatus::ReadyForPickup).await;
        }
        Command::Eta(input, minutes) => {
            let id = match resolve_order(&engine.snapshot(), &input) {
                Ok(id) => id,
                Err(message) => return output::error(&message),
            };
            match engine.set_estimate(&id, minutes).await {
                Ok(()) => output::success(&format!(
                    "Estimate for {} set to {minutes} min",
                    id.short()
                )),
                Err(e) => output::error(&e.to_string()),
            }
        }
        Command::Details(input) => {
            let snapshot = engine.snapshot();
            let id = match resolve_order(&snapshot, &input) {
                Ok(id) => id,
                Err(message) => return output::error(&message),
            };
            match snapshot.get(&id) {
                Some(order) => {
                    output::order_details(order, session.clock.now(), &engine.config().overdue);
                }
                None => output::error(&format!("order {id} not found")),
            }
        }
        Command::Sort(mode) => {
            view.sort = mode;
            view.draw(session);
        }
        Command::Overdue(on) => {
            view.overdue_only = on;
            view.draw(session);
        }
        Command::Board => view.draw(session),
        Command::Help => output::note(HELP),
        Command::Quit => {}
    }
}

async fn transition(
    engine: &KitchenEngine,
    actor: Option<&ActorId>,
    input: &str,
    target: OrderStatus,
) {
    let Some(actor) = actor else {
        return output::error(&format!(
            "no cook id; pass --actor or set {ACTOR_ENV} to change orders"
        ));
    };
    let id = match resolve_order(&engine.snapshot(), input) {
        Ok(id) => id,
        Err(message) => return output::error(&message),
    };
    match engine.request_transition(&id, target, actor).await {
        Ok(()) => output::success(&format!("Order {} marked {}", id.short(), target.label())),
        Err(e) => output::error(&e.to_string()),
    }
}
