// Per-manifest update invocation, diff collection, result types

use crate::config::Config;
use crate::git;
use crate::reconcile::ReconciledEntry;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStep {
    Updating { name: String },
    Diffing { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The manifest differs from HEAD after the update.
    Changed { diff: String },
    /// The updater ran but the manifest still matches HEAD.
    Unchanged,
    /// The updater or the diff failed; the manifest is left out of publishing.
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub name: String,
    /// Pathspec of the manifest relative to the manifest directory.
    pub pathspec: String,
    pub path: PathBuf,
    pub outcome: UpdateOutcome,
    pub duration: Duration,
}

impl UpdateReport {
    /// The material diff, if any.
    pub fn diff(&self) -> Option<&str> {
        match &self.outcome {
            UpdateOutcome::Changed { diff } => Some(diff),
            _ => None,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self.outcome, UpdateOutcome::Changed { .. })
    }
}

/// Callbacks for tracking progress across a batch of updates.
///
/// Default implementations let callers override only what they render.
pub trait UpdateCallbacks {
    fn on_update_start(&self, _name: &str) {}
    fn on_step(&self, step: &UpdateStep);
    fn on_oracle_output(&self, _lines: &[String]) {}
    fn on_complete(&self, report: &UpdateReport);
}

/// No-op callbacks for when progress tracking is not needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl UpdateCallbacks for NoOpCallbacks {
    fn on_step(&self, _step: &UpdateStep) {}
    fn on_complete(&self, _report: &UpdateReport) {}
}

/// Updates one manifest and reports whether its content materially changed.
pub fn update_one<C: UpdateCallbacks>(
    entry: &ReconciledEntry,
    callbacks: &C,
    config: &Config,
) -> UpdateReport {
    let start = Instant::now();
    let name = entry.name().to_string();
    let pathspec = entry.record.pathspec();
    let logger = config.command_logger();

    callbacks.on_update_start(&name);

    callbacks.on_step(&UpdateStep::Updating { name: name.clone() });
    let outcome = match config.oracle.update(&name, &config.manifest_dir, logger) {
        Err(e) => {
            warn!(%name, error = %e, "update failed");
            UpdateOutcome::Failed {
                error: e.to_string(),
            }
        }
        Ok(lines) => {
            callbacks.on_oracle_output(&lines);
            callbacks.on_step(&UpdateStep::Diffing { name: name.clone() });
            match git::diff_head(&config.manifest_dir, &pathspec, logger) {
                Ok(diff) if diff.is_empty() => {
                    debug!(%name, "no material change");
                    UpdateOutcome::Unchanged
                }
                Ok(diff) => UpdateOutcome::Changed { diff },
                Err(e) => {
                    warn!(%name, error = %e, "diff failed");
                    UpdateOutcome::Failed {
                        error: format!("{:#}", e),
                    }
                }
            }
        }
    };

    let report = UpdateReport {
        name,
        pathspec,
        path: entry.record.path.clone(),
        outcome,
        duration: start.elapsed(),
    };
    callbacks.on_complete(&report);
    report
}

/// Updates each entry in turn, one updater invocation per manifest.
///
/// A failure for one manifest is recorded in its report and does not stop the
/// rest of the batch.
pub fn apply<C: UpdateCallbacks>(
    entries: &[ReconciledEntry],
    callbacks: &C,
    config: &Config,
) -> Vec<UpdateReport> {
    entries
        .iter()
        .map(|entry| update_one(entry, callbacks, config))
        .collect()
}

/// Reports whose manifests materially changed, in update order.
pub fn changed(reports: &[UpdateReport]) -> Vec<&UpdateReport> {
    reports.iter().filter(|r| r.is_changed()).collect()
}
