//! Joins local manifests with the oracle's remote versions.

use crate::manifest::ManifestRecord;
use crate::oracle::RemoteVersionIndex;

/// A manifest together with what the oracle said about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledEntry {
    pub record: ManifestRecord,
    pub remote_version: Option<String>,
    pub outdated: bool,
}

impl ReconciledEntry {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn local_version(&self) -> Option<&str> {
        self.record.local_version.as_deref()
    }
}

/// Outdated means the oracle reported a version and it differs, as a plain
/// case-sensitive string, from the local one. No report means not outdated.
pub fn is_outdated(local: Option<&str>, remote: Option<&str>) -> bool {
    match remote {
        Some(remote) => local != Some(remote),
        None => false,
    }
}

/// Left-joins `records` against `index` by name, preserving record order.
///
/// Names the oracle reported without a local manifest are dropped.
pub fn reconcile(records: &[ManifestRecord], index: &RemoteVersionIndex) -> Vec<ReconciledEntry> {
    records
        .iter()
        .map(|record| {
            let remote_version = index.get(&record.name).map(str::to_string);
            let outdated = is_outdated(record.local_version.as_deref(), remote_version.as_deref());
            ReconciledEntry {
                record: record.clone(),
                remote_version,
                outdated,
            }
        })
        .collect()
}

/// The outdated subset of `entries`, in order.
pub fn outdated(entries: &[ReconciledEntry]) -> Vec<ReconciledEntry> {
    entries.iter().filter(|e| e.outdated).cloned().collect()
}
