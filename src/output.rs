//! Spinners, colored output, and summary formatting.
//!
//! This module provides visual feedback during a run: the reconciliation
//! table, progress while the oracle and updater run, diffs, and the final
//! summary.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::manifest::ManifestWarning;
use crate::reconcile::ReconciledEntry;
use crate::run::Finish;
use crate::update::{UpdateCallbacks, UpdateOutcome, UpdateReport, UpdateStep};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

const ABSENT: &str = "-";

/// Spinner shown while the oracle checks versions.
/// Uses `Option` to avoid allocation when progress is hidden (quiet/verbose modes).
pub struct CheckProgress {
    spinner: Option<ProgressBar>,
}

impl CheckProgress {
    pub fn finish(&self, reported: usize) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(format!(
                "{} checkver reported {} versions",
                "✓".green(),
                reported
            ));
        }
    }

    pub fn finish_failed(&self, error: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(format!("{} checkver failed: {}", "✗".red(), error));
        }
    }
}

/// Creates the check spinner. Hidden in quiet or verbose mode.
#[must_use]
pub fn create_check_progress(config: &Config) -> CheckProgress {
    let spinner = if config.is_quiet() || config.is_verbose() {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message("Checking upstream versions...");
        spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        Some(spinner)
    };

    CheckProgress { spinner }
}

/// Progress bar over the update batch.
/// Implements `UpdateCallbacks` and also handles verbose output.
pub struct UpdateProgress {
    bar: Option<ProgressBar>,
    config: Config,
}

impl UpdateProgress {
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl UpdateCallbacks for UpdateProgress {
    fn on_update_start(&self, name: &str) {
        if self.config.is_verbose() {
            eprintln!("\n{}", format!("[{}]", name).white().bold());
        }
    }

    fn on_step(&self, step: &UpdateStep) {
        if let Some(bar) = &self.bar {
            bar.set_message(format_step_message(step));
        }
        if self.config.is_verbose() {
            eprintln!("  {}", format_step_message(step).dimmed());
        }
    }

    fn on_oracle_output(&self, lines: &[String]) {
        print_oracle_output(lines, &self.config);
    }

    fn on_complete(&self, report: &UpdateReport) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
        if self.config.is_verbose() {
            eprintln!("  {}", format_outcome(&report.outcome));
        }
    }
}

/// Creates the update progress bar. Hidden in quiet or verbose mode.
#[must_use]
pub fn create_update_progress(total: usize, config: &Config) -> UpdateProgress {
    let bar = if config.is_quiet() || config.is_verbose() {
        None
    } else {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {spinner:.cyan} {msg}")
        {
            bar.set_style(style.progress_chars("█░"));
        }
        bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        Some(bar)
    };

    UpdateProgress {
        bar,
        config: config.clone(),
    }
}

pub fn print_working_dir(path: &Path, config: &Config) {
    if config.is_quiet() {
        return;
    }
    println!(
        "{} {}",
        "Manifests in:".cyan(),
        path.display().to_string().white().bold()
    )
}

/// Oracle output as echoed in verbose mode; empty otherwise.
pub fn render_oracle_output(lines: &[String], config: &Config) -> Vec<String> {
    if !config.is_verbose() {
        return Vec::new();
    }
    lines
        .iter()
        .map(|line| format!("  {}", line.dimmed()))
        .collect()
}

pub fn print_oracle_output(lines: &[String], config: &Config) {
    for line in render_oracle_output(lines, config) {
        eprintln!("{}", line);
    }
}

/// Skipped manifests always go to stderr, even in quiet mode.
pub fn print_load_warnings(warnings: &[ManifestWarning]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning.error);
    }
}

pub fn print_status_table(entries: &[ReconciledEntry], config: &Config) {
    if config.is_quiet() {
        return;
    }
    if entries.is_empty() {
        println!("{}", "No manifests found".yellow().bold());
        return;
    }

    let name_width = column_width(entries.iter().map(|e| e.name()), "Name");
    let local_width = column_width(
        entries.iter().map(|e| e.local_version().unwrap_or(ABSENT)),
        "Local",
    );
    let remote_width = column_width(
        entries
            .iter()
            .map(|e| e.remote_version.as_deref().unwrap_or(ABSENT)),
        "Remote",
    );

    println!(
        "{}",
        format!(
            "{:<name_width$}  {:<local_width$}  {:<remote_width$}  State",
            "Name", "Local", "Remote"
        )
        .white()
        .bold()
    );
    for entry in entries {
        let state = if entry.outdated {
            "outdated".yellow().bold()
        } else {
            "up to date".green()
        };
        println!(
            "{:<name_width$}  {:<local_width$}  {:<remote_width$}  {}",
            entry.name(),
            entry.local_version().unwrap_or(ABSENT),
            entry.remote_version.as_deref().unwrap_or(ABSENT),
            state
        );
    }
    println!();
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

pub fn print_outdated_count(count: usize, total: usize, config: &Config) {
    if config.is_quiet() {
        return;
    }
    println!(
        "{}",
        format!("{} of {} manifests are outdated", count, total).dimmed()
    );
}

pub fn print_update_summary(reports: &[UpdateReport], config: &Config) {
    if config.is_quiet() {
        let changed = reports.iter().filter(|r| r.is_changed()).count();
        println!("{}/{} manifests changed", changed, reports.len());
        for report in reports {
            if let UpdateOutcome::Failed { error } = &report.outcome {
                eprintln!("error: {}: {}", report.name, error);
            }
        }
        return;
    }

    print_section("Updates");
    for report in reports {
        println!(
            "  {} in {}",
            format_report_line(report),
            format_duration(report.duration).dimmed()
        );
    }
    println!();
}

/// Diffs go to stdout regardless of verbosity: they are what gets committed.
pub fn print_diffs(reports: &[UpdateReport]) {
    for report in reports {
        if let Some(diff) = report.diff() {
            println!("{}", format!("--- {} ---", report.name).cyan().bold());
            for line in diff.lines() {
                println!("{}", colorize_diff_line(line));
            }
            println!();
        }
    }
}

pub fn print_finish(finish: &Finish, config: &Config) {
    if config.is_quiet() {
        return;
    }
    let message = match finish {
        Finish::NothingOutdated => "All manifests are up to date".green().bold(),
        Finish::UpdateDeclined => "Update declined; nothing was changed".yellow(),
        Finish::NothingChanged => "No manifest changed; nothing to publish".yellow(),
        Finish::PublishDeclined(names) => format!(
            "Publish declined; {} changed manifests left uncommitted",
            names.len()
        )
        .yellow(),
        Finish::Published(receipt) => {
            format!("Published: {}", receipt.message).green().bold()
        }
    };
    println!("{}", message);
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = 50usize.saturating_sub(title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}

fn format_report_line(report: &UpdateReport) -> String {
    match &report.outcome {
        UpdateOutcome::Changed { .. } => {
            format!("{} {}", "CHANGED".green().bold(), report.name.white())
        }
        UpdateOutcome::Unchanged => format!(
            "{} {} {}",
            "SAME".yellow().bold(),
            report.name.white(),
            "(updater made no change)".dimmed()
        ),
        UpdateOutcome::Failed { error } => format!(
            "{} {} {}",
            "FAIL".red().bold(),
            report.name.white(),
            error.red()
        ),
    }
}

fn format_outcome(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Changed { .. } => format!("{} changed", "✓".green()),
        UpdateOutcome::Unchanged => format!("{} no material change", "•".yellow()),
        UpdateOutcome::Failed { error } => format!("{} failed: {}", "✗".red(), error),
    }
}

fn format_step_message(step: &UpdateStep) -> String {
    match step {
        UpdateStep::Updating { name } => format!("Updating {}...", name),
        UpdateStep::Diffing { name } => format!("Comparing {} with HEAD...", name),
    }
}

fn colorize_diff_line(line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        line.bold().to_string()
    } else if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else if line.starts_with("@@") {
        line.cyan().to_string()
    } else {
        line.to_string()
    }
}
