//! Constants for the flipt-login module.

use std::time::Duration;

/// Remote login page the browser is sent to during the device flow.
pub const DEVICE_LOGIN_URL: &str = "https://flipt.cloud/demo/device";

/// Query parameter carrying the transport-encoded login request.
pub const DATA_PARAM: &str = "data";

/// Query parameter the service redirects back with.
pub const PAYLOAD_PARAM: &str = "payload";

/// How long the flow waits for the service to redirect back (5 minutes).
pub const CALLBACK_TIMEOUT: Duration = Duration::from_millis(300_000);

/// File the decoded credentials are written to.
pub const ENV_FILE: &str = ".env.local";

/// Environment variable holding the environment URL.
pub const ENV_URL_VAR: &str = "FLIPT_CLOUD_URL";

/// Environment variable holding the environment API key.
pub const ENV_API_KEY_VAR: &str = "FLIPT_CLOUD_API_KEY";
