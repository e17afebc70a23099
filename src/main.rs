use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use kitchenline::cli::{board, check, output, run, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Board(args) => board::execute(&args).await.context("board failed"),
        Commands::Run(args) => run::execute(&args).await.context("session failed"),
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config)
            .with_context(|| format!("invalid configuration {}", arg.config.display())),
    }
}
