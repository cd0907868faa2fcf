//! Login command handler.

use std::process::ExitCode;

use flipt_login::{
    LoginFlowOptions, LoginInteraction, LoginOutcome, PersistOutcome, run_login_flow,
};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::cli::LoginArgs;
use crate::prompt;
use crate::styled_output::{print_dim, print_error, print_info, print_success, print_warning};

/// Terminal-backed interaction for the login flow.
struct TerminalInteraction {
    assume_yes: bool,
}

impl LoginInteraction for TerminalInteraction {
    fn confirm_browser_open(&mut self) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Ok(prompt::confirm(
            "We need to open your browser for login. Do you want to proceed?",
        )?)
    }

    fn open_login_url(&mut self, url: &Url) -> anyhow::Result<()> {
        flipt_login::browser::open_browser(url.as_str())?;
        print_dim("Waiting for Flipt Cloud...");
        Ok(())
    }

    fn confirm_overwrite(&mut self) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Ok(prompt::confirm(
            "Do you want to overwrite your .env.local file with the Flipt Cloud credentials?",
        )?)
    }
}

/// Run the device login flow against the current repository.
pub async fn run_login(args: LoginArgs) -> ExitCode {
    print_info("Welcome to the Flipt Cloud demo!");

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            print_error(&format!("Failed to read working directory: {e}"));
            return ExitCode::from(1);
        }
    };

    if !flipt_utils_git::is_git_repo(&cwd) {
        print_error("This is not a git repository.");
        return ExitCode::from(1);
    }

    let Some(upstream_url) = flipt_utils_git::get_upstream_url(&cwd) else {
        print_error("Unable to fetch upstream URL.");
        return ExitCode::from(1);
    };

    // Ctrl+C cancels the wait; the flow still releases the listener and
    // reports a clean outcome.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let opts = LoginFlowOptions::new(upstream_url);
    let mut ui = TerminalInteraction {
        assume_yes: args.yes,
    };

    match run_login_flow(&opts, &mut ui, &cancel).await {
        Ok(LoginOutcome::Declined) => print_info("Login process cancelled."),
        Ok(LoginOutcome::Cancelled) => print_info("Login terminated by user."),
        Ok(LoginOutcome::TimedOut) => {
            print_error("Failed to receive payload from Flipt Cloud: timed out after 5 minutes.");
        }
        Ok(LoginOutcome::NullPayload) => print_warning("No payload received from Flipt Cloud."),
        Ok(LoginOutcome::PayloadReceived { persisted }) => match persisted {
            PersistOutcome::Saved => {
                print_success("Successfully updated .env.local with Flipt Cloud credentials.");
            }
            PersistOutcome::Skipped => print_info("Skipped updating .env.local."),
            PersistOutcome::Failed => {
                print_error("Failed to write .env.local; credentials were not saved.");
            }
        },
        Err(e) => print_error(&format!("Login failed: {e:#}")),
    }

    print_dim("Command completed!");
    ExitCode::SUCCESS
}
