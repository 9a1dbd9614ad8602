//! Diagnostic tracing and external command echo.
//!
//! - **Tracing**: developer diagnostics via `RUST_LOG`, written to stderr.
//! - **Command echo**: user-facing, selected by verbosity. Every `git` and
//!   oracle invocation is passed to a [`CommandLogger`] before it runs.

use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Callback invoked with the program and arguments of every external command.
pub type CommandLogger = fn(program: &str, args: &[&str]);

/// Echoes the command line to stderr.
pub fn verbose_logger(program: &str, args: &[&str]) {
    eprintln!("  {} {}", "$".dimmed(), format_command(program, args).dimmed());
}

/// Discards the command line.
pub fn no_op_logger(_program: &str, _args: &[&str]) {}

/// Renders a command line for display.
pub fn format_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=bucket_sync=debug bucket-sync bucket
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Tests may initialize more than once.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
