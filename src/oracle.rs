//! Adapter for the external checkver script.
//!
//! The script is both the version oracle (what is the latest upstream version
//! of a manifest?) and the updater (rewrite a manifest to that version). Its
//! output is a loose convention rather than a format: result lines look like
//! `name: 1.2.3 (some note)`, interleaved with progress and warnings on either
//! stream. Both streams are captured through one pipe so lines keep the order in
//! which they were written.

use crate::constants::{POWERSHELL, POWERSHELL_ARGS, UPDATE_FLAG, WILDCARD_SELECTOR};
use crate::error::OracleError;
use crate::logging::CommandLogger;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, instrument, warn};

/// Which manifests an oracle invocation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Name(String),
}

impl Selector {
    pub fn as_arg(&self) -> &str {
        match self {
            Selector::All => WILDCARD_SELECTOR,
            Selector::Name(name) => name,
        }
    }
}

/// Classification of a single oracle output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleLine {
    /// A `name: version ...` report.
    Version { name: String, version: String },
    /// Log noise, warnings, or anything else.
    Ignored,
}

/// Parses one line of oracle output.
///
/// The name is everything before the first colon, trimmed; the version is the
/// first whitespace-delimited token after it. Lines with an empty name or no
/// token are ignored.
pub fn parse_line(line: &str) -> OracleLine {
    let Some((name, rest)) = line.split_once(':') else {
        return OracleLine::Ignored;
    };
    let name = name.trim();
    if name.is_empty() {
        return OracleLine::Ignored;
    }
    match rest.split_whitespace().next() {
        Some(version) => OracleLine::Version {
            name: name.to_string(),
            version: version.to_string(),
        },
        None => OracleLine::Ignored,
    }
}

/// Latest upstream versions reported by the oracle, keyed by manifest name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteVersionIndex {
    versions: HashMap<String, String>,
}

impl RemoteVersionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a version, replacing any earlier report for the same name.
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.versions.insert(name.into(), version.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.versions.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Builds an index from oracle output; the last report for a name wins.
pub fn parse_output<I, S>(lines: I) -> RemoteVersionIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = RemoteVersionIndex::new();
    for line in lines {
        if let OracleLine::Version { name, version } = parse_line(line.as_ref()) {
            index.insert(name, version);
        }
    }
    index
}

/// Combined output of one oracle run.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub lines: Vec<String>,
}

/// A resolved checkver invocation: the program to run and the arguments that
/// precede the per-call ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl Oracle {
    /// Locates the checkver script and decides how to launch it.
    ///
    /// `.ps1` scripts run through `interpreter` (default `pwsh`) with
    /// `-NoProfile -File`. Other scripts run through `interpreter` when given,
    /// or are executed directly.
    pub fn resolve(script: &Path, interpreter: Option<&str>) -> Result<Self, OracleError> {
        if !script.is_file() {
            return Err(OracleError::NotFound {
                path: script.to_path_buf(),
            });
        }

        let is_powershell = script.extension().is_some_and(|ext| ext == "ps1");
        let oracle = match (interpreter, is_powershell) {
            (interpreter, true) => {
                let mut leading_args: Vec<OsString> =
                    POWERSHELL_ARGS.iter().map(OsString::from).collect();
                leading_args.push(script.as_os_str().to_owned());
                Oracle {
                    program: PathBuf::from(interpreter.unwrap_or(POWERSHELL)),
                    leading_args,
                }
            }
            (Some(interpreter), false) => Oracle {
                program: PathBuf::from(interpreter),
                leading_args: vec![script.as_os_str().to_owned()],
            },
            (None, false) => Oracle {
                program: script.to_path_buf(),
                leading_args: Vec::new(),
            },
        };

        debug!(program = %oracle.program.display(), "resolved checkver");
        Ok(oracle)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Asks the oracle for the latest versions of the selected manifests.
    ///
    /// A non-zero exit is logged but not an error: the oracle routinely fails
    /// for individual manifests while still reporting the rest.
    #[instrument(skip(self, logger))]
    pub fn check(
        &self,
        selector: &Selector,
        dir: &Path,
        logger: CommandLogger,
    ) -> Result<Vec<String>, OracleError> {
        let args = [OsString::from(selector.as_arg()), dir.as_os_str().to_owned()];
        let captured = self.capture(&args, logger)?;
        if !captured.status.success() {
            warn!(status = %captured.status, "checkver exited unsuccessfully");
        }
        Ok(captured.lines)
    }

    /// Rewrites a single manifest in place. A non-zero exit is an error.
    #[instrument(skip(self, logger))]
    pub fn update(
        &self,
        name: &str,
        dir: &Path,
        logger: CommandLogger,
    ) -> Result<Vec<String>, OracleError> {
        let args = [
            OsString::from(name),
            dir.as_os_str().to_owned(),
            OsString::from(UPDATE_FLAG),
        ];
        let captured = self.capture(&args, logger)?;
        if !captured.status.success() {
            return Err(OracleError::Failed {
                program: self.program.display().to_string(),
                status: captured.status.to_string(),
            });
        }
        Ok(captured.lines)
    }

    /// Runs the oracle with `args`, collecting stdout and stderr as one ordered
    /// line sequence.
    pub fn capture(&self, args: &[OsString], logger: CommandLogger) -> Result<Captured, OracleError> {
        let program = self.program.display().to_string();
        let display_args: Vec<String> = self
            .leading_args
            .iter()
            .chain(args)
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let display_refs: Vec<&str> = display_args.iter().map(String::as_str).collect();
        logger(&program, &display_refs);

        let (mut reader, writer) = std::io::pipe()?;
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let mut child = cmd.spawn().map_err(|source| OracleError::Spawn {
            program: program.clone(),
            source,
        })?;
        // The command still owns write ends of the pipe; drop them or the read
        // below never sees EOF.
        drop(cmd);

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;

        let lines: Vec<String> = String::from_utf8_lossy(&raw)
            .lines()
            .map(str::to_string)
            .collect();
        for line in &lines {
            debug!(target: "bucket_sync::oracle::output", "{line}");
        }
        debug!(%status, lines = lines.len(), "checkver finished");

        Ok(Captured { status, lines })
    }
}
