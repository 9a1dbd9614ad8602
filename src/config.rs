//! Configuration types for CLI verbosity and run options.

use crate::logging::{self, CommandLogger};
use crate::oracle::Oracle;
use std::path::PathBuf;

/// Runtime configuration derived from CLI arguments.
///
/// Resolved once at startup and passed explicitly to every step of a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
    /// Directory holding the manifests. Also the working directory for git.
    pub manifest_dir: PathBuf,
    /// How to invoke the checkver script.
    pub oracle: Oracle,
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the command logger based on verbosity settings.
    ///
    /// Config only picks which callback to use; the callbacks themselves live
    /// in the logging module.
    #[must_use]
    pub fn command_logger(&self) -> CommandLogger {
        if self.is_verbose() {
            logging::verbose_logger
        } else {
            logging::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Maps the mutually exclusive `--quiet`/`--verbose` flags.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}
