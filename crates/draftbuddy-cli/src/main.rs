//! DraftBuddy CLI - Command-line interface for DraftBuddy picture frames.
//!
//! This tool provides terminal access to frame discovery, health monitoring,
//! gallery management and background uploads, enabling automation via scripts
//! and headless operation.

mod cli;
mod commands;
mod error;
mod output;
mod session;

use clap::Parser;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Discover(args) => {
            commands::run_discover(args, cli.json).await
        }
        Commands::Status => {
            commands::run_status(cli.device, cli.timeout, cli.json).await
        }
        Commands::Monitor(args) => {
            commands::run_monitor(args, cli.device, cli.timeout, cli.json).await
        }
        Commands::Gallery(args) => {
            commands::run_gallery(args, cli.device, cli.timeout, cli.json).await
        }
        Commands::Upload(args) => {
            commands::run_upload(args, cli.device, cli.timeout, cli.json).await
        }
    }
}
