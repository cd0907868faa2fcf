//! CLI argument parsing and command dispatch.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors
    Warn,
    /// Show informational messages, warnings, and errors (default)
    #[default]
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Flipt Cloud demo CLI.
#[derive(Parser)]
#[command(name = "flipt-demo")]
#[command(author, version)]
#[command(about = "Flipt Cloud demo - device login and flag evaluation", long_about = None)]
pub struct Cli {
    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::default())]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to Flipt Cloud and store environment credentials
    Login(LoginArgs),
    /// Evaluate a boolean feature flag
    Evaluate(EvaluateArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Answer yes to every prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Flag key to evaluate
    pub flag_key: String,

    /// Entity id to evaluate against (random UUID when omitted)
    #[arg(long)]
    pub entity_id: Option<String>,

    /// Namespace the flag lives in
    #[arg(long, default_value = "default")]
    pub namespace: String,
}

/// Dispatch the parsed command.
pub async fn dispatch_command(cli: Cli) -> ExitCode {
    match cli.command {
        Commands::Login(args) => crate::login_cmd::run_login(args).await,
        Commands::Evaluate(args) => crate::evaluate_cmd::run_evaluate(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
