//! Styled CLI output.
//!
//! Human-friendly status lines on stderr that respect the NO_COLOR
//! environment variable and fall back to plain text when stderr is not a
//! terminal.

use std::io::IsTerminal;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn colors_enabled() -> bool {
    let no_color = std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0")
        .unwrap_or(false);
    !no_color && std::io::stderr().is_terminal()
}

fn print_styled(color: &str, icon: &str, message: &str) {
    if colors_enabled() {
        eprintln!("{color}{icon} {message}{RESET}");
    } else {
        eprintln!("{icon} {message}");
    }
}

/// Print a success message to stderr.
pub fn print_success(message: &str) {
    print_styled(GREEN, "[OK]", message);
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
    print_styled(RED, "[ERROR]", message);
}

/// Print a warning message to stderr.
pub fn print_warning(message: &str) {
    print_styled(YELLOW, "[WARN]", message);
}

/// Print an info message to stderr.
pub fn print_info(message: &str) {
    print_styled(BLUE, "[INFO]", message);
}

/// Print a dimmed/secondary message to stderr.
pub fn print_dim(message: &str) {
    print_styled(DIM, "-", message);
}
