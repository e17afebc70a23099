//! Handler for `check config`.

use std::path::Path;

use crate::cli::{output, ACTOR_ENV};
use crate::config::Config;
use crate::error::Result;

/// Validate configuration file without starting a session.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::section(&format!("Checking configuration: {}", path.display()));

    let config = Config::load(path)?;
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field(
        "Overdue after",
        format!("{} min", config.kitchen.overdue_threshold_minutes),
    );
    output::field("Default sort", config.kitchen.default_sort);
    output::field("Overdue only", config.kitchen.overdue_only);
    output::field("Order type", config.store.order_type.as_str());
    output::field("Log format", &config.logging.format);
    output::field(
        "Alerts",
        format!(
            "bell={} log={}",
            config.notifications.bell, config.notifications.log
        ),
    );
    println!();

    match &config.store.seed_file {
        Some(seed) if seed.exists() => {
            output::success(&format!("Seed file found: {}", seed.display()));
        }
        Some(seed) => output::warning(&format!("Seed file not found: {}", seed.display())),
        None => output::note("No seed file configured; the board starts empty"),
    }

    if std::env::var(ACTOR_ENV).is_ok() {
        output::success(&format!("Actor id found (from {} env var)", ACTOR_ENV));
    } else {
        output::warning(&format!(
            "No actor id; pass --actor or set {} to issue commands",
            ACTOR_ENV
        ));
    }

    Ok(())
}
