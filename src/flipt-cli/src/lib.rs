//! Flipt Cloud demo CLI.
//!
//! - `cli` - command-line argument parsing and dispatch
//! - `login_cmd` / `evaluate_cmd` - command implementations
//! - `prompt`, `styled_output` - terminal helpers

pub mod cli;
pub mod evaluate_cmd;
pub mod login_cmd;
pub mod prompt;
pub mod styled_output;
