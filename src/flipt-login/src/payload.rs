//! Credential payload codec.
//!
//! The service hands credentials back as base64-encoded JSON. `decode` is
//! the CLI-side operation; `encode` is its inverse and exists for tests and
//! for parity with what the service sends.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Failure to turn a transported payload into credentials.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid base64: {0}")]
    Transport(#[from] base64::DecodeError),
    #[error("payload is not a credential document: {0}")]
    Structure(#[from] serde_json::Error),
}

/// Credentials for one Flipt Cloud environment.
///
/// Fields absent from the document decode to empty strings; the service is
/// trusted to send both and nothing stricter is enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentCredentials {
    /// Environment URL the evaluation client talks to.
    #[serde(default)]
    pub environment_url: String,
    /// API key authenticating the evaluation client.
    #[serde(default)]
    pub environment_api_key: String,
}

/// Decode a transported payload into credentials.
pub fn decode(payload: &str) -> Result<EnvironmentCredentials, PayloadError> {
    let raw = STANDARD.decode(payload)?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Encode credentials the way the service does.
pub fn encode(credentials: &EnvironmentCredentials) -> String {
    let json = serde_json::to_vec(credentials).expect("credential document serializes");
    STANDARD.encode(json)
}
