use anyhow::Context;
use bucket_sync::config::{Config, Verbosity};
use bucket_sync::constants::{DEFAULT_MANIFEST_DIR, default_checkver};
use bucket_sync::oracle::Oracle;
use bucket_sync::prompt::TerminalPrompter;
use bucket_sync::{logging, output, run};
use clap::Parser;
use std::path::PathBuf;

/// Update outdated manifests via checkver, then commit and push the changes.
#[derive(Parser, Debug)]
#[command(name = "bucket-sync", version, about, long_about = None)]
struct Cli {
    /// Manifest directory
    #[arg(default_value = DEFAULT_MANIFEST_DIR)]
    dir: PathBuf,

    /// Path to the checkver script [default: $BUCKET_SYNC_CHECKVER or bin/checkver.ps1]
    #[arg(long, value_name = "PATH")]
    checkver: Option<PathBuf>,

    /// Program to run the checkver script with [default: pwsh for .ps1 scripts]
    #[arg(long, value_name = "PROGRAM")]
    interpreter: Option<String>,

    /// Only print counts and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Echo every external command and its output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    if !cli.dir.is_dir() {
        anyhow::bail!("Manifest directory not found: {}", cli.dir.display());
    }
    let checkver = cli.checkver.unwrap_or_else(default_checkver);
    let oracle = Oracle::resolve(&checkver, cli.interpreter.as_deref())
        .context("Cannot run without the checkver script")?;

    let config = Config {
        verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
        manifest_dir: cli.dir,
        oracle,
    };
    output::print_working_dir(&config.manifest_dir, &config);

    run::run(&config, &mut TerminalPrompter)?;
    Ok(())
}
