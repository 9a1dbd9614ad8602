//! Error types for manifest loading and oracle invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering or reading manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest directory does not exist (or is not a directory).
    #[error("manifest directory not found: {path}")]
    DirectoryMissing { path: PathBuf },

    /// Listing the manifest directory failed.
    #[error("failed to enumerate manifests in {path}: {source}")]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single directory entry could not be inspected.
    #[error("failed to read an entry of {path}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest file is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A manifest file parsed, but its top level is not an object.
    #[error("{path} is not a JSON object")]
    NotAnObject { path: PathBuf },
}

impl ManifestError {
    /// True for failures that abort the whole load rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ManifestError::DirectoryMissing { .. } | ManifestError::Enumerate { .. }
        )
    }
}

/// Errors raised by the version oracle adapter.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The checkver script could not be found at startup.
    #[error("checkver script not found: {path}")]
    NotFound { path: PathBuf },

    /// The oracle process could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the oracle's output or waiting on it failed.
    #[error("failed to capture oracle output: {0}")]
    Capture(#[from] std::io::Error),

    /// The oracle ran but exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}
