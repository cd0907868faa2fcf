//! The evaluation client.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{ENV_API_KEY_VAR, ENV_URL_VAR, FlagsError};

/// User-Agent string for HTTP requests
const USER_AGENT: &str = concat!("flipt-demo/", env!("CARGO_PKG_VERSION"));

/// Default timeout for HTTP requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authentication for the evaluation endpoint.
pub struct Authentication {
    /// Client token sent as a bearer credential (protected in memory).
    pub client_token: SecretString,
}

impl Authentication {
    /// Authenticate with a client token.
    pub fn with_client_token(token: impl Into<String>) -> Self {
        Self {
            client_token: SecretString::from(token.into()),
        }
    }
}

/// Options for constructing a [`FliptClient`].
pub struct ClientOptions {
    /// Environment URL.
    pub url: String,
    /// Authentication material.
    pub authentication: Authentication,
}

/// Result of one boolean evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct BooleanEvaluation {
    /// Whether the flag is enabled for the evaluated entity.
    pub enabled: bool,
    /// Key of the evaluated flag.
    #[serde(default)]
    pub flag_key: String,
    /// Why the evaluation came out the way it did.
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
struct BooleanEvaluationRequest<'a> {
    namespace_key: &'a str,
    flag_key: &'a str,
    entity_id: &'a str,
    context: &'a HashMap<String, String>,
}

/// Client for boolean flag evaluation against one Flipt Cloud environment.
#[derive(Debug)]
pub struct FliptClient {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
    token: SecretString,
}

impl FliptClient {
    /// Construct a client for the given namespace.
    pub fn new(namespace: impl Into<String>, options: ClientOptions) -> Result<Self, FlagsError> {
        let url = url::Url::parse(&options.url)?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(FlagsError::InvalidScheme(scheme.to_string())),
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http,
            base_url: options.url.trim_end_matches('/').to_string(),
            namespace: namespace.into(),
            token: options.authentication.client_token,
        })
    }

    /// Construct a client from `FLIPT_CLOUD_URL` / `FLIPT_CLOUD_API_KEY`.
    pub fn from_env(namespace: impl Into<String>) -> Result<Self, FlagsError> {
        let url = std::env::var(ENV_URL_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(FlagsError::MissingConfig(ENV_URL_VAR))?;
        let token = std::env::var(ENV_API_KEY_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(FlagsError::MissingConfig(ENV_API_KEY_VAR))?;

        Self::new(
            namespace,
            ClientOptions {
                url,
                authentication: Authentication::with_client_token(token),
            },
        )
    }

    /// Kick off a cache refresh without waiting for it.
    ///
    /// Fire-and-forget: the result only shows up in the log, and evaluation
    /// never depends on it. Must be called from within a tokio runtime.
    pub fn refresh(&self) {
        let http = self.http.clone();
        let token = self.token.clone();
        let url = format!(
            "{}/internal/v1/evaluation/snapshot/namespace/{}",
            self.base_url, self.namespace
        );

        tokio::spawn(async move {
            match http.get(&url).bearer_auth(token.expose_secret()).send().await {
                Ok(response) => {
                    tracing::debug!(status = %response.status(), "evaluation snapshot refreshed");
                }
                Err(e) => {
                    tracing::debug!(error = %e, "evaluation snapshot refresh failed");
                }
            }
        });
    }

    /// Evaluate a boolean flag for one entity.
    pub async fn evaluate_boolean(
        &self,
        flag_key: &str,
        entity_id: &str,
        context: &HashMap<String, String>,
    ) -> Result<BooleanEvaluation, FlagsError> {
        let url = format!("{}/evaluate/v1/boolean", self.base_url);
        let request = BooleanEvaluationRequest {
            namespace_key: &self.namespace,
            flag_key,
            entity_id,
            context,
        };

        tracing::debug!(
            namespace = %self.namespace,
            flag_key,
            entity_id,
            "evaluating boolean flag"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlagsError::Rejected { status, body });
        }

        Ok(response.json().await?)
    }
}
