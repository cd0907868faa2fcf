//! Flipt Cloud device login for the demo CLI.
//!
//! A browser-based handshake: the CLI starts a throw-away callback server
//! on the local machine, sends the browser to the Flipt Cloud login page
//! with the callback address encoded into the URL, waits for the service to
//! redirect back with a credential payload, and writes the decoded
//! credentials to `.env.local`.

// Core modules
pub mod constants;
mod login_url;
pub mod payload;
mod persist;
mod server;

// Flow
pub mod browser;
mod flow;

// Re-exports from constants
pub use constants::{CALLBACK_TIMEOUT, DEVICE_LOGIN_URL, ENV_API_KEY_VAR, ENV_FILE, ENV_URL_VAR};

// Re-exports from the flow
pub use flow::{LoginFlowOptions, LoginInteraction, LoginOutcome, run_login_flow};

// Re-exports from the components
pub use login_url::{LoginRequest, build_login_url};
pub use payload::{EnvironmentCredentials, PayloadError};
pub use persist::{PersistOutcome, save_credentials};
pub use server::CallbackServer;
