//! Flag evaluation command handler.

use std::collections::HashMap;
use std::process::ExitCode;

use flipt_flags::FliptClient;

use crate::cli::EvaluateArgs;
use crate::styled_output::{print_error, print_warning};

/// Evaluate a boolean flag and print the result on stdout.
pub async fn run_evaluate(args: EvaluateArgs) -> ExitCode {
    let EvaluateArgs {
        flag_key,
        entity_id,
        namespace,
    } = args;

    // The variables may come from the environment directly; a missing
    // .env.local is not an error.
    match dotenvy::from_filename(flipt_login::ENV_FILE) {
        Ok(_) => tracing::debug!("loaded {}", flipt_login::ENV_FILE),
        Err(e) if e.not_found() => tracing::debug!("no {} file", flipt_login::ENV_FILE),
        Err(e) => print_warning(&format!("Failed to read {}: {e}", flipt_login::ENV_FILE)),
    }

    let client = match FliptClient::from_env(namespace) {
        Ok(client) => client,
        Err(e) => {
            print_error(&e.to_string());
            return ExitCode::from(1);
        }
    };

    client.refresh();

    let entity_id = entity_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    match client
        .evaluate_boolean(&flag_key, &entity_id, &HashMap::new())
        .await
    {
        Ok(evaluation) => {
            tracing::debug!(reason = ?evaluation.reason, "evaluation complete");
            println!("{}", evaluation.enabled);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&format!("Evaluation failed: {e}"));
            ExitCode::from(1)
        }
    }
}
