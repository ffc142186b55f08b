//! Command-line interface
//!
//! `leadgen generate` runs one session with a live progress bar and prints the
//! outcome; `leadgen config show` prints the effective configuration.

pub mod commands;
pub mod output;
pub mod progress;
pub mod types;

pub use types::{Cli, Commands};

/// A command failure whose report is already on stdout.
///
/// `handle_error` keeps stdout untouched for it, so `--json` output stays a
/// single document.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ReportedFailure(pub String);

/// Print a command error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if err.is::<ReportedFailure>() {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    } else if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
