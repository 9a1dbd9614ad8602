//! Stages, commits, and pushes materially changed manifests as one unit.

use crate::config::Config;
use crate::constants::{COMMIT_NAME_SEPARATOR, COMMIT_SUFFIX};
use crate::git;
use crate::update::UpdateReport;
use anyhow::Context;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No report carried a material diff; nothing was staged.
    NothingToPublish,
    Published(PublishReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub names: Vec<String>,
    pub pathspecs: Vec<String>,
    pub message: String,
}

/// Commit subject for a set of manifest names, in the given order.
pub fn commit_message<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(COMMIT_NAME_SEPARATOR);
    format!("{}{}", joined, COMMIT_SUFFIX)
}

/// Publishes the manifests whose reports carry a material diff.
///
/// Reports without one are ignored even when passed in. Any git failure is
/// returned as an error; local file changes are left in place.
pub fn publish(reports: &[UpdateReport], config: &Config) -> anyhow::Result<PublishOutcome> {
    let included: Vec<&UpdateReport> = reports.iter().filter(|r| r.is_changed()).collect();
    if included.is_empty() {
        debug!("nothing to publish");
        return Ok(PublishOutcome::NothingToPublish);
    }

    let names: Vec<String> = included.iter().map(|r| r.name.clone()).collect();
    let pathspecs: Vec<String> = included.iter().map(|r| r.pathspec.clone()).collect();
    let paths: Vec<&str> = pathspecs.iter().map(String::as_str).collect();
    let message = commit_message(&names);
    let repo = config.manifest_dir.as_path();
    let logger = config.command_logger();

    git::add(repo, &paths, logger)?;
    git::commit_only(repo, &message, &paths, logger)?;
    git::push(repo, logger).with_context(|| format!("Committed '{}' but push failed", message))?;

    info!(commit = %message, count = names.len(), "published");
    Ok(PublishOutcome::Published(PublishReceipt {
        names,
        pathspecs,
        message,
    }))
}
