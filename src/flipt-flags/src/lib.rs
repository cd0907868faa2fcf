//! Boolean flag evaluation against Flipt Cloud.
//!
//! The client is constructed explicitly and owned by the caller; there is
//! no lazy global instance. Construct it once at startup (usually via
//! [`FliptClient::from_env`]) and pass it by reference to every evaluation
//! call.

mod client;

pub use client::{Authentication, BooleanEvaluation, ClientOptions, FliptClient};

/// Environment variable holding the environment URL.
pub const ENV_URL_VAR: &str = "FLIPT_CLOUD_URL";

/// Environment variable holding the environment API key.
pub const ENV_API_KEY_VAR: &str = "FLIPT_CLOUD_API_KEY";

/// Errors from constructing or using the evaluation client.
#[derive(Debug, thiserror::Error)]
pub enum FlagsError {
    #[error("invalid Flipt Cloud URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Flipt Cloud URL must use http or https, got '{0}'")]
    InvalidScheme(String),
    #[error("{0} is not set; run the login flow first")]
    MissingConfig(&'static str),
    #[error("evaluation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("evaluation rejected: {status} - {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}
