//! Credential persistence.
//!
//! Writes the decoded credentials to the local env file as two `KEY=value`
//! lines, overwriting whatever was there. Write failures stay local to this
//! module: they are logged and reported through the outcome, never raised.

use std::path::Path;

use crate::constants::{ENV_API_KEY_VAR, ENV_URL_VAR};
use crate::payload::EnvironmentCredentials;

/// What happened to the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Credentials written to the env file.
    Saved,
    /// User declined the overwrite; nothing touched.
    Skipped,
    /// The write failed; details are in the log.
    Failed,
}

/// Persist credentials to `path`, honoring the user's confirmation.
pub fn save_credentials(
    path: &Path,
    credentials: &EnvironmentCredentials,
    confirmed: bool,
) -> PersistOutcome {
    if !confirmed {
        tracing::info!(path = %path.display(), "skipped writing credentials");
        return PersistOutcome::Skipped;
    }

    let content = format!(
        "{ENV_URL_VAR}={}\n{ENV_API_KEY_VAR}={}",
        credentials.environment_url, credentials.environment_api_key
    );

    match std::fs::write(path, content) {
        Ok(()) => {
            restrict_permissions(path);
            tracing::info!(path = %path.display(), "credentials written");
            PersistOutcome::Saved
        }
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "failed to write credentials");
            PersistOutcome::Failed
        }
    }
}

/// Tighten the env file to owner-only on Unix. The file holds an API key.
fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        if let Err(e) = std::fs::set_permissions(path, perms) {
            tracing::debug!(error = %e, path = %path.display(), "failed to restrict permissions");
        }
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
