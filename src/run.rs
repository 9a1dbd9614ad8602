//! The run state machine.
//!
//! ```text
//! Scan -> Check -> (no outdated: Done)
//!      -> ConfirmUpdate -> (declined: Done)
//!      -> Update -> DiffCollect -> (nothing changed: Done)
//!      -> ConfirmPublish -> (declined: Done, changes stay local)
//!      -> Publish -> Done
//! ```
//!
//! Every edge moves forward; there are no retries. Nothing outside the manifest
//! directory is touched and no mutating git command runs before the matching
//! confirmation.

use crate::config::Config;
use crate::manifest::{self, ManifestRecord};
use crate::oracle::{self, Selector};
use crate::output;
use crate::prompt::Prompter;
use crate::publish::{self, PublishOutcome, PublishReceipt};
use crate::reconcile::{self, ReconciledEntry};
use crate::update::{self, UpdateReport};
use tracing::debug;

/// Terminal state of a run. All of them are successful exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finish {
    NothingOutdated,
    UpdateDeclined,
    NothingChanged,
    /// Carries the names of the manifests left modified on disk.
    PublishDeclined(Vec<String>),
    Published(PublishReceipt),
}

#[derive(Debug)]
enum RunState {
    Scan,
    Check { records: Vec<ManifestRecord> },
    ConfirmUpdate { outdated: Vec<ReconciledEntry> },
    Update { outdated: Vec<ReconciledEntry> },
    DiffCollect,
    ConfirmPublish { changed: Vec<UpdateReport> },
    Publish { changed: Vec<UpdateReport> },
    Done(Finish),
}

impl RunState {
    fn label(&self) -> &'static str {
        match self {
            RunState::Scan => "scan",
            RunState::Check { .. } => "check",
            RunState::ConfirmUpdate { .. } => "confirm-update",
            RunState::Update { .. } => "update",
            RunState::DiffCollect => "diff-collect",
            RunState::ConfirmPublish { .. } => "confirm-publish",
            RunState::Publish { .. } => "publish",
            RunState::Done(_) => "done",
        }
    }
}

/// Everything a finished run learned.
#[derive(Debug)]
pub struct RunReport {
    pub finish: Finish,
    /// Every loaded manifest with its reconciliation result.
    pub entries: Vec<ReconciledEntry>,
    /// One report per attempted update.
    pub updates: Vec<UpdateReport>,
}

struct Run<'a, P: Prompter> {
    config: &'a Config,
    prompter: &'a mut P,
    entries: Vec<ReconciledEntry>,
    updates: Vec<UpdateReport>,
}

impl<P: Prompter> Run<'_, P> {
    fn step(&mut self, state: RunState) -> anyhow::Result<RunState> {
        debug!(state = state.label(), "entering state");
        let config = self.config;

        let next = match state {
            RunState::Scan => {
                let report = manifest::load(&config.manifest_dir)?;
                output::print_load_warnings(&report.warnings);
                RunState::Check {
                    records: report.records,
                }
            }
            RunState::Check { records } => {
                let progress = output::create_check_progress(config);
                let lines = match config.oracle.check(
                    &Selector::All,
                    &config.manifest_dir,
                    config.command_logger(),
                ) {
                    Ok(lines) => lines,
                    Err(e) => {
                        progress.finish_failed(&e.to_string());
                        return Err(e.into());
                    }
                };
                output::print_oracle_output(&lines, config);
                let index = oracle::parse_output(&lines);
                progress.finish(index.len());

                self.entries = reconcile::reconcile(&records, &index);
                output::print_status_table(&self.entries, config);

                let outdated = reconcile::outdated(&self.entries);
                output::print_outdated_count(outdated.len(), self.entries.len(), config);
                if outdated.is_empty() {
                    RunState::Done(Finish::NothingOutdated)
                } else {
                    RunState::ConfirmUpdate { outdated }
                }
            }
            RunState::ConfirmUpdate { outdated } => {
                let question = format!("Update {} outdated manifests?", outdated.len());
                if self.prompter.confirm(&question)? {
                    RunState::Update { outdated }
                } else {
                    RunState::Done(Finish::UpdateDeclined)
                }
            }
            RunState::Update { outdated } => {
                let progress = output::create_update_progress(outdated.len(), config);
                self.updates = update::apply(&outdated, &progress, config);
                progress.finish();
                output::print_update_summary(&self.updates, config);
                RunState::DiffCollect
            }
            RunState::DiffCollect => {
                let changed: Vec<UpdateReport> =
                    update::changed(&self.updates).into_iter().cloned().collect();
                if changed.is_empty() {
                    RunState::Done(Finish::NothingChanged)
                } else {
                    output::print_diffs(&changed);
                    RunState::ConfirmPublish { changed }
                }
            }
            RunState::ConfirmPublish { changed } => {
                let question = format!("Commit and push {} changed manifests?", changed.len());
                if self.prompter.confirm(&question)? {
                    RunState::Publish { changed }
                } else {
                    let names = changed.into_iter().map(|r| r.name).collect();
                    RunState::Done(Finish::PublishDeclined(names))
                }
            }
            RunState::Publish { changed } => match publish::publish(&changed, config)? {
                PublishOutcome::NothingToPublish => RunState::Done(Finish::NothingChanged),
                PublishOutcome::Published(receipt) => RunState::Done(Finish::Published(receipt)),
            },
            RunState::Done(finish) => RunState::Done(finish),
        };

        Ok(next)
    }
}

/// Drives one run from scan to a terminal state.
///
/// Returns `Err` only for fatal failures: a missing manifest directory, an
/// oracle that cannot be started, a failed prompt read, or a failed publish.
pub fn run<P: Prompter>(config: &Config, prompter: &mut P) -> anyhow::Result<RunReport> {
    let mut run = Run {
        config,
        prompter,
        entries: Vec::new(),
        updates: Vec::new(),
    };

    let mut state = RunState::Scan;
    loop {
        state = match state {
            RunState::Done(finish) => {
                debug!(?finish, "run finished");
                output::print_finish(&finish, config);
                return Ok(RunReport {
                    finish,
                    entries: run.entries,
                    updates: run.updates,
                });
            }
            other => run.step(other)?,
        };
    }
}
