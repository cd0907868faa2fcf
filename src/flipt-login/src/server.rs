//! Local HTTP server for the login callback.
//!
//! The server binds an ephemeral loopback port and waits for the remote
//! service to redirect the browser back with a credential payload. The
//! result is delivered through a single-shot handle: the first request to
//! settle it wins, later requests still get an HTTP answer but cannot
//! change the observed value.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use tokio::sync::{Mutex, oneshot};

use crate::constants::PAYLOAD_PARAM;

/// Sender half of the single-shot result handle. Settled by `.take()`, so
/// only the first writer ever holds it.
type SettleHandle = Arc<Mutex<Option<oneshot::Sender<Option<String>>>>>;

/// Running callback server.
///
/// Closing is idempotent and also happens on drop, so the listener is
/// released on every exit path of the flow that owns it.
pub struct CallbackServer {
    port: u16,
    payload_rx: oneshot::Receiver<Option<String>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl CallbackServer {
    /// Bind an OS-assigned loopback port and start serving callbacks.
    pub async fn start() -> Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind callback listener")?;
        let port = listener
            .local_addr()
            .context("failed to read callback listener address")?
            .port();

        let (payload_tx, payload_rx) = oneshot::channel();
        let settle: SettleHandle = Arc::new(Mutex::new(Some(payload_tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        // Every path is dispatched by one handler so that the "/callback"
        // prefix rule covers subpaths as well.
        let app = Router::new().fallback(handle_request).with_state(settle);

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                tracing::debug!(error = %e, "callback server exited with error");
            }
        });

        tracing::debug!(port, "callback server listening");
        Ok(Self {
            port,
            payload_rx,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// The OS-assigned port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address the remote service should redirect back to.
    pub fn callback_url(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// Wait for the result handle to settle.
    ///
    /// Resolves to `Some(payload)` when a callback carried a payload and
    /// `None` when one arrived without it. Fails if the server goes away
    /// before any callback is seen.
    pub async fn recv(&mut self) -> Result<Option<String>> {
        (&mut self.payload_rx)
            .await
            .context("callback server closed before a callback arrived")
    }

    /// Stop the server. Idempotent; does not settle the result handle.
    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::debug!(port = self.port, "callback server shutting down");
        }
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        self.close();
    }
}

async fn handle_request(
    State(settle): State<SettleHandle>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    if !uri.path().starts_with("/callback") {
        return (StatusCode::NOT_FOUND, "Not found");
    }

    match params.get(PAYLOAD_PARAM) {
        Some(payload) => {
            if let Some(tx) = settle.lock().await.take() {
                let _ = tx.send(Some(payload.clone()));
            }
            (StatusCode::OK, "Callback received")
        }
        None => {
            if let Some(tx) = settle.lock().await.take() {
                let _ = tx.send(None);
            }
            (StatusCode::BAD_REQUEST, "No payload received")
        }
    }
}
