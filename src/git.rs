//! Git command wrappers.
//!
//! This module provides a thin wrapper around the git CLI commands the
//! publish flow needs, handling command execution and error formatting.
//! Paths are pathspecs relative to `repo`.

use crate::logging::CommandLogger;
use anyhow::Context;
use std::path::Path;
use tracing::debug;

pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    debug!(repo = %repo.display(), args = ?args, "running git");
    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .context("Failed to spawn git command")?;

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim())
    }
}

fn run_logged(repo: &Path, args: &[&str], logger: CommandLogger) -> anyhow::Result<String> {
    logger("git", args);
    run_git(repo, args)
}

fn validate_pathspec(path: &str) -> anyhow::Result<()> {
    if path.contains('\0') || path.contains('\n') || path.is_empty() {
        anyhow::bail!("Invalid path: {:?}", path);
    }
    Ok(())
}

/// Pathspec that git matches byte for byte, so `[`, `*` and `?` in manifest
/// names are not treated as globs.
pub fn literal_pathspec(path: &str) -> String {
    format!(":(literal){}", path)
}

fn with_paths(prefix: &[&str], paths: &[&str]) -> anyhow::Result<Vec<String>> {
    if paths.is_empty() {
        anyhow::bail!("No paths given");
    }
    for path in paths {
        validate_pathspec(path)?;
    }
    let mut args: Vec<String> = prefix.iter().map(|a| a.to_string()).collect();
    args.push("--".to_string());
    args.extend(paths.iter().map(|p| literal_pathspec(p)));
    Ok(args)
}

fn as_refs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

/// Working-tree difference of `path` against HEAD. Empty when unchanged.
pub fn diff_head(repo: &Path, path: &str, logger: CommandLogger) -> anyhow::Result<String> {
    let args = with_paths(&["diff", "HEAD"], &[path])?;
    run_logged(repo, &as_refs(&args), logger)
        .with_context(|| format!("Failed to diff '{}'", path))
}

pub fn add(repo: &Path, paths: &[&str], logger: CommandLogger) -> anyhow::Result<()> {
    let args = with_paths(&["add"], paths)?;
    run_logged(repo, &as_refs(&args), logger).context("Failed to stage manifests")?;
    Ok(())
}

/// Commits exactly `paths`, leaving anything else in the index uncommitted.
pub fn commit_only(
    repo: &Path,
    message: &str,
    paths: &[&str],
    logger: CommandLogger,
) -> anyhow::Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Empty commit message");
    }
    let args = with_paths(&["commit", "-m", message], paths)?;
    run_logged(repo, &as_refs(&args), logger).context("Failed to commit manifests")?;
    Ok(())
}

pub fn push(repo: &Path, logger: CommandLogger) -> anyhow::Result<()> {
    run_logged(repo, &["push"], logger).context("Failed to push to remote")?;
    Ok(())
}
