//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

use std::path::PathBuf;

/// Manifest directory used when no path is given on the command line.
pub const DEFAULT_MANIFEST_DIR: &str = "bucket";

/// Default location of the version-checking script.
const DEFAULT_CHECKVER: &str = "bin/checkver.ps1";

/// Environment variable overriding the checkver script location.
pub const CHECKVER_ENV: &str = "BUCKET_SYNC_CHECKVER";

/// Returns the checkver script path.
///
/// Can be customized via the BUCKET_SYNC_CHECKVER environment variable.
/// Falls back to `bin/checkver.ps1` if not set or empty.
///
/// Example: `BUCKET_SYNC_CHECKVER=scripts/checkver.ps1 bucket-sync`
pub fn default_checkver() -> PathBuf {
    checkver_or_default(std::env::var(CHECKVER_ENV).ok())
}

fn checkver_or_default(value: Option<String>) -> PathBuf {
    value
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKVER))
}

/// Interpreter used for PowerShell oracle scripts when none is given.
pub const POWERSHELL: &str = "pwsh";

/// Arguments placed before the script path when running through PowerShell.
pub const POWERSHELL_ARGS: [&str; 2] = ["-NoProfile", "-File"];

/// Oracle selector meaning "every manifest in the directory".
pub const WILDCARD_SELECTOR: &str = "*";

/// Flag asking the oracle to rewrite the manifest in place.
pub const UPDATE_FLAG: &str = "-Update";

/// Manifest file extension.
pub const MANIFEST_EXTENSION: &str = "json";

/// Manifest field holding the declared version.
pub const VERSION_FIELD: &str = "version";

/// The only answer accepted as a "yes" at a confirmation prompt.
pub const AFFIRMATIVE: &str = "y";

/// Separator between manifest names in the commit subject.
pub const COMMIT_NAME_SEPARATOR: &str = ", ";

/// Text following the manifest names in the commit subject.
pub const COMMIT_SUFFIX: &str = ": Update to latest version";

/// Progress bar tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;
