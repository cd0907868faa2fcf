//! Login URL construction.
//!
//! The remote login page receives one `data` query parameter: the JSON
//! document `{repo, callbackUrl}`, base64-encoded. The service decodes it
//! to know which repository is logging in and where to redirect back.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DATA_PARAM, DEVICE_LOGIN_URL};

/// One login request, consumed by the URL builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Upstream repository URL identifying the project.
    pub repo: String,
    /// Local address the service redirects the browser back to.
    pub callback_url: String,
}

/// Build the login URL for the given repository and callback address.
pub fn build_login_url(repo: &str, callback_url: &str) -> Result<Url> {
    let request = LoginRequest {
        repo: repo.to_string(),
        callback_url: callback_url.to_string(),
    };
    let encoded = STANDARD.encode(
        serde_json::to_vec(&request).context("failed to serialize login request")?,
    );

    let mut url = Url::parse(DEVICE_LOGIN_URL).context("invalid device login endpoint")?;
    url.query_pairs_mut().append_pair(DATA_PARAM, &encoded);
    Ok(url)
}
