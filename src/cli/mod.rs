//! Command-line interface definitions.

pub mod board;
pub mod check;
pub mod output;
pub mod run;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::domain::SortMode;
use crate::error::Result;

/// Environment variable naming the cook who issues commands.
pub const ACTOR_ENV: &str = "KITCHEN_ACTOR_ID";

const DEFAULT_CONFIG: &str = "config.toml";

/// Kitchenline - live kitchen order queues.
#[derive(Parser, Debug)]
#[command(name = "kitchenline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the three order queues once and exit
    Board(BoardArgs),

    /// Live board with interactive commands (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `kitchenline check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Board options shared by `board` and `run`.
#[derive(Parser, Debug, Clone)]
pub struct BoardOptions {
    /// Path to configuration file (defaults apply when absent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON seed file of order documents; overrides `[store] seed_file`
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Queue order: placed_desc, placed_asc or eta_asc
    #[arg(long)]
    pub sort: Option<SortMode>,

    /// Show only overdue orders
    #[arg(long)]
    pub overdue_only: bool,
}

impl BoardOptions {
    /// Load the config file, or defaults when none was given and
    /// `config.toml` does not exist.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG),
            None => Ok(Config::default()),
        }
    }

    #[must_use]
    pub fn sort_mode(&self, config: &Config) -> SortMode {
        self.sort.unwrap_or(config.kitchen.default_sort)
    }

    #[must_use]
    pub fn overdue_only(&self, config: &Config) -> bool {
        self.overdue_only || config.kitchen.overdue_only
    }

    #[must_use]
    pub fn seed_file(&self, config: &Config) -> Option<PathBuf> {
        self.seed.clone().or_else(|| config.store.seed_file.clone())
    }
}

/// Arguments for the `board` subcommand.
#[derive(Parser, Debug)]
pub struct BoardArgs {
    #[command(flatten)]
    pub options: BoardOptions,

    /// Print the queues as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub options: BoardOptions,

    /// Cook id recorded on every change (falls back to KITCHEN_ACTOR_ID)
    #[arg(long)]
    pub actor: Option<String>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}
