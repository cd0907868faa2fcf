//! Flipt Cloud demo CLI - main entry point.

use std::process::ExitCode;

use clap::Parser;

use flipt_cli::cli::{Cli, dispatch_command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| cli.log_level.as_filter_str().to_string());

    tracing_subscriber::fmt()
        .with_env_filter(filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    dispatch_command(cli).await
}
