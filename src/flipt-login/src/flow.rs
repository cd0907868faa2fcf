//! Login flow orchestration.
//!
//! Drives one device login end to end: confirmation, callback server,
//! login URL, browser, the race between the callback and the timer, payload
//! decode, and credential persistence. The server is released on every exit
//! path; outcomes that just mean "the handshake did not complete" are
//! values, not errors.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::constants::{CALLBACK_TIMEOUT, ENV_FILE};
use crate::login_url::build_login_url;
use crate::payload;
use crate::persist::{self, PersistOutcome};
use crate::server::CallbackServer;

/// External interactions the flow needs: prompts and the browser.
///
/// The CLI backs this with the terminal; tests drive the flow headlessly.
pub trait LoginInteraction {
    /// Ask before the browser is opened. Declining ends the flow.
    fn confirm_browser_open(&mut self) -> Result<bool>;
    /// Open the login page.
    fn open_login_url(&mut self, url: &Url) -> Result<()>;
    /// Ask before overwriting the env file with received credentials.
    fn confirm_overwrite(&mut self) -> Result<bool>;
}

/// Options for one login flow.
pub struct LoginFlowOptions {
    /// Upstream repository URL identifying the project.
    pub repo_url: String,
    /// Where credentials are persisted.
    pub env_file: PathBuf,
    /// How long to wait for the callback.
    pub timeout: Duration,
}

impl LoginFlowOptions {
    /// Options with the default env file and timeout.
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            env_file: PathBuf::from(ENV_FILE),
            timeout: CALLBACK_TIMEOUT,
        }
    }
}

/// Terminal state of one login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// User declined to open the browser; no server was started.
    Declined,
    /// A payload arrived and was decoded; `persisted` says what happened
    /// to the credentials.
    PayloadReceived { persisted: PersistOutcome },
    /// The service redirected back without a payload.
    NullPayload,
    /// No callback arrived within the timeout window.
    TimedOut,
    /// The wait was interrupted.
    Cancelled,
}

enum Wait {
    Settled(Option<String>),
    TimedOut,
    Cancelled,
}

/// Run one device login flow.
pub async fn run_login_flow(
    opts: &LoginFlowOptions,
    ui: &mut dyn LoginInteraction,
    cancel: &CancellationToken,
) -> Result<LoginOutcome> {
    if !ui
        .confirm_browser_open()
        .context("confirmation prompt failed")?
    {
        tracing::info!("login declined before opening the browser");
        return Ok(LoginOutcome::Declined);
    }

    let mut server = CallbackServer::start().await?;
    let login_url = build_login_url(&opts.repo_url, &server.callback_url())?;
    tracing::debug!(port = server.port(), "opening login page");

    ui.open_login_url(&login_url)
        .context("failed to open the login page in a browser")?;

    let settled = tokio::select! {
        payload = server.recv() => Wait::Settled(payload?),
        _ = tokio::time::sleep(opts.timeout) => Wait::TimedOut,
        _ = cancel.cancelled() => Wait::Cancelled,
    };

    // Neither the timer nor cancellation closes the server on its own;
    // release it before reporting any outcome.
    server.close();

    match settled {
        Wait::Settled(Some(payload)) => {
            tracing::info!("received payload from Flipt Cloud");
            let credentials =
                payload::decode(&payload).context("received a malformed payload")?;
            let confirmed = ui
                .confirm_overwrite()
                .context("confirmation prompt failed")?;
            let persisted = persist::save_credentials(&opts.env_file, &credentials, confirmed);
            Ok(LoginOutcome::PayloadReceived { persisted })
        }
        Wait::Settled(None) => {
            tracing::warn!("callback arrived without a payload");
            Ok(LoginOutcome::NullPayload)
        }
        Wait::TimedOut => {
            tracing::warn!(
                timeout_secs = opts.timeout.as_secs(),
                "timed out waiting for the callback"
            );
            Ok(LoginOutcome::TimedOut)
        }
        Wait::Cancelled => {
            tracing::info!("login interrupted while waiting for the callback");
            Ok(LoginOutcome::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DATA_PARAM;
    use crate::login_url::LoginRequest;
    use crate::payload::EnvironmentCredentials;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use pretty_assertions::assert_eq;

    enum CallbackAction {
        Nothing,
        HitWithPayload(String),
        HitWithoutPayload,
    }

    struct StubInteraction {
        accept_login: bool,
        accept_overwrite: bool,
        fail_open: bool,
        action: CallbackAction,
    }

    impl StubInteraction {
        fn new(action: CallbackAction) -> Self {
            Self {
                accept_login: true,
                accept_overwrite: true,
                fail_open: false,
                action,
            }
        }
    }

    fn decode_login_request(url: &Url) -> LoginRequest {
        let (_, encoded) = url
            .query_pairs()
            .find(|(k, _)| k == DATA_PARAM)
            .expect("data parameter present");
        let raw = STANDARD.decode(encoded.as_bytes()).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    impl LoginInteraction for StubInteraction {
        fn confirm_browser_open(&mut self) -> Result<bool> {
            Ok(self.accept_login)
        }

        fn open_login_url(&mut self, url: &Url) -> Result<()> {
            if self.fail_open {
                anyhow::bail!("no browser available");
            }
            let request = decode_login_request(url);
            match &self.action {
                CallbackAction::Nothing => {}
                CallbackAction::HitWithPayload(payload) => {
                    let target = format!(
                        "{}?payload={}",
                        request.callback_url,
                        urlencoding::encode(payload)
                    );
                    tokio::spawn(async move {
                        let _ = reqwest::get(target).await;
                    });
                }
                CallbackAction::HitWithoutPayload => {
                    let target = request.callback_url.clone();
                    tokio::spawn(async move {
                        let _ = reqwest::get(target).await;
                    });
                }
            }
            Ok(())
        }

        fn confirm_overwrite(&mut self) -> Result<bool> {
            Ok(self.accept_overwrite)
        }
    }

    fn options(env_file: PathBuf, timeout: Duration) -> LoginFlowOptions {
        LoginFlowOptions {
            repo_url: "git@github.com:acme/storefront.git".to_string(),
            env_file,
            timeout,
        }
    }

    fn credentials() -> EnvironmentCredentials {
        EnvironmentCredentials {
            environment_url: "https://x".to_string(),
            environment_api_key: "k".to_string(),
        }
    }

    #[tokio::test]
    async fn login_url_embeds_the_bound_port() {
        let server = CallbackServer::start().await.unwrap();
        let url = build_login_url("git@github.com:acme/storefront.git", &server.callback_url())
            .unwrap();

        let request = decode_login_request(&url);
        assert_eq!(
            request.callback_url,
            format!("http://localhost:{}/callback", server.port())
        );
    }

    #[tokio::test]
    async fn declined_login_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().join(".env.local"), Duration::from_secs(5));
        let mut ui = StubInteraction::new(CallbackAction::Nothing);
        ui.accept_login = false;

        let outcome = run_login_flow(&opts, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, LoginOutcome::Declined);
    }

    #[tokio::test]
    async fn payload_received_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env.local");
        let opts = options(env_file.clone(), Duration::from_secs(5));
        let mut ui = StubInteraction::new(CallbackAction::HitWithPayload(crate::payload::encode(
            &credentials(),
        )));

        let outcome = run_login_flow(&opts, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::PayloadReceived {
                persisted: PersistOutcome::Saved
            }
        );
        assert_eq!(
            std::fs::read_to_string(&env_file).unwrap(),
            "FLIPT_CLOUD_URL=https://x\nFLIPT_CLOUD_API_KEY=k"
        );
    }

    #[tokio::test]
    async fn overwrite_declined_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env.local");
        let opts = options(env_file.clone(), Duration::from_secs(5));
        let mut ui = StubInteraction::new(CallbackAction::HitWithPayload(crate::payload::encode(
            &credentials(),
        )));
        ui.accept_overwrite = false;

        let outcome = run_login_flow(&opts, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::PayloadReceived {
                persisted: PersistOutcome::Skipped
            }
        );
        assert!(!env_file.exists());
    }

    #[tokio::test]
    async fn empty_callback_is_a_null_payload() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().join(".env.local"), Duration::from_secs(5));
        let mut ui = StubInteraction::new(CallbackAction::HitWithoutPayload);

        let outcome = run_login_flow(&opts, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, LoginOutcome::NullPayload);
    }

    #[tokio::test]
    async fn no_callback_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().join(".env.local"), Duration::from_millis(50));
        let mut ui = StubInteraction::new(CallbackAction::Nothing);

        let outcome = run_login_flow(&opts, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, LoginOutcome::TimedOut);
    }

    #[tokio::test]
    async fn cancellation_stops_the_wait() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().join(".env.local"), Duration::from_secs(30));
        let mut ui = StubInteraction::new(CallbackAction::Nothing);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = run_login_flow(&opts, &mut ui, &cancel).await.unwrap();
        assert_eq!(outcome, LoginOutcome::Cancelled);
    }

    #[tokio::test]
    async fn malformed_payload_fails_the_flow() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env.local");
        let opts = options(env_file.clone(), Duration::from_secs(5));
        let mut ui =
            StubInteraction::new(CallbackAction::HitWithPayload("!!not base64!!".to_string()));

        let result = run_login_flow(&opts, &mut ui, &CancellationToken::new()).await;
        assert!(result.is_err());
        assert!(!env_file.exists());
    }

    #[tokio::test]
    async fn browser_failure_aborts_the_flow() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().join(".env.local"), Duration::from_secs(5));
        let mut ui = StubInteraction::new(CallbackAction::Nothing);
        ui.fail_open = true;

        let result = run_login_flow(&opts, &mut ui, &CancellationToken::new()).await;
        assert!(result.is_err());
    }
}
