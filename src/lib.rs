//! Manifest bucket maintenance library.
//!
//! This crate keeps a directory of package manifests in step with upstream by:
//! - Loading each manifest's declared version
//! - Asking the checkver script for the latest upstream versions
//! - Reconciling the two and updating the outdated manifests
//! - Committing and pushing only the manifests that actually changed

pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod logging;
pub mod manifest;
pub mod oracle;
pub mod output;
pub mod prompt;
pub mod publish;
pub mod reconcile;
pub mod run;
pub mod update;
