//! Manifest discovery and version extraction.
//!
//! A manifest is a `*.json` file directly inside the manifest directory. Its
//! name is the file stem and its declared version is the top-level `version`
//! field. Files that cannot be read or parsed are reported as warnings and left
//! out of the result; only a missing or unreadable directory fails the load.

use crate::constants::{MANIFEST_EXTENSION, VERSION_FIELD};
use crate::error::ManifestError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One manifest on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub name: String,
    pub local_version: Option<String>,
    pub path: PathBuf,
}

impl ManifestRecord {
    /// Path of the manifest relative to its directory, for use as a git pathspec.
    pub fn pathspec(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// A manifest that was skipped during load.
#[derive(Debug)]
pub struct ManifestWarning {
    pub path: PathBuf,
    pub error: ManifestError,
}

/// Result of scanning a manifest directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Loaded manifests, sorted by name.
    pub records: Vec<ManifestRecord>,
    pub warnings: Vec<ManifestWarning>,
}

fn is_manifest(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION)
}

/// Splits directory entries into manifest paths, sorted, and warnings for
/// entries that could not be read.
pub fn partition_entries<I>(dir: &Path, entries: I) -> (Vec<PathBuf>, Vec<ManifestWarning>)
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut paths = Vec::new();
    let mut warnings = Vec::new();

    for entry in entries {
        match entry {
            Ok(path) if is_manifest(&path) => paths.push(path),
            Ok(_) => {}
            Err(source) => {
                warn!(dir = %dir.display(), error = %source, "skipping directory entry");
                warnings.push(ManifestWarning {
                    path: dir.to_path_buf(),
                    error: ManifestError::Entry {
                        path: dir.to_path_buf(),
                        source,
                    },
                });
            }
        }
    }

    paths.sort();
    (paths, warnings)
}

/// Lists manifest files in `dir`, sorted by path, with a warning for every
/// directory entry that could not be read.
pub fn find_manifests(dir: &Path) -> Result<(Vec<PathBuf>, Vec<ManifestWarning>), ManifestError> {
    if !dir.is_dir() {
        return Err(ManifestError::DirectoryMissing {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| ManifestError::Enumerate {
        path: dir.to_path_buf(),
        source,
    })?;

    Ok(partition_entries(dir, entries.map(|e| e.map(|e| e.path()))))
}

/// Extracts the declared version from parsed manifest content.
///
/// Strings are taken verbatim, `null` or a missing field means no version, and
/// any other value is rendered as JSON text.
pub fn extract_version(document: &Value) -> Option<String> {
    match document.get(VERSION_FIELD)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads and parses a single manifest file.
pub fn read_manifest(path: &Path) -> Result<ManifestRecord, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value =
        serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if !document.is_object() {
        return Err(ManifestError::NotAnObject {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ManifestRecord {
        name,
        local_version: extract_version(&document),
        path: path.to_path_buf(),
    })
}

/// Loads every manifest in `dir`.
///
/// Fails only when the directory itself is missing or cannot be listed. An
/// existing directory without manifests yields an empty report.
pub fn load(dir: &Path) -> Result<LoadReport, ManifestError> {
    let (paths, warnings) = find_manifests(dir)?;
    let mut report = LoadReport {
        records: Vec::new(),
        warnings,
    };

    for path in paths {
        match read_manifest(&path) {
            Ok(record) => {
                debug!(name = %record.name, version = ?record.local_version, "loaded manifest");
                report.records.push(record);
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping manifest");
                report.warnings.push(ManifestWarning { path, error });
            }
        }
    }

    Ok(report)
}
