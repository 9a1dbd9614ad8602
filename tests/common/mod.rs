//! Test infrastructure for bucket-sync integration tests.

#![allow(dead_code)]

use anyhow::Result;
use bucket_sync::config::{Config, Verbosity};
use bucket_sync::git::run_git;
use bucket_sync::oracle::Oracle;
use bucket_sync::prompt::Prompter;
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BUCKET_DIR: &str = "bucket";

/// A git repository with a `bucket/` directory of manifests and a bare remote.
/// Automatically cleaned up when dropped.
pub struct TestBucket {
    _repo_dir: TempDir,
    _remote_dir: TempDir,
    _tools_dir: TempDir,
    root: PathBuf,
    bucket: PathBuf,
    remote: PathBuf,
    script: PathBuf,
    calls: PathBuf,
}

impl TestBucket {
    /// Creates the repository with one committed manifest per `(name, version)`
    /// and pushes it to the remote.
    pub fn new(manifests: &[(&str, &str)]) -> Result<Self> {
        let repo_dir = TempDir::new()?;
        let remote_dir = TempDir::new()?;
        let tools_dir = TempDir::new()?;
        let root = repo_dir.path().to_path_buf();
        let bucket = root.join(BUCKET_DIR);
        let remote = remote_dir.path().to_path_buf();

        run_git(&remote, &["init", "--bare"])?;
        run_git(&root, &["init", "-b", "master"])?;
        run_git(&root, &["config", "user.email", "test@example.com"])?;
        run_git(&root, &["config", "user.name", "Test User"])?;

        std::fs::create_dir(&bucket)?;
        std::fs::write(root.join("README.md"), "# Test Bucket\n")?;
        for (name, version) in manifests {
            std::fs::write(bucket.join(format!("{}.json", name)), manifest_json(version))?;
        }
        run_git(&root, &["add", "."])?;
        run_git(&root, &["commit", "-m", "Initial commit"])?;
        run_git(&root, &["remote", "add", "origin", remote.to_str().unwrap()])?;
        run_git(&root, &["push", "-u", "origin", "master"])?;

        let script = tools_dir.path().join("checkver.sh");
        let calls = tools_dir.path().join("calls.log");

        let test_bucket = Self {
            _repo_dir: repo_dir,
            _remote_dir: remote_dir,
            _tools_dir: tools_dir,
            root,
            bucket,
            remote,
            script,
            calls,
        };
        test_bucket.install_oracle(&FakeOracle::new())?;
        Ok(test_bucket)
    }

    pub fn bucket(&self) -> &Path {
        &self.bucket
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replaces the checkver script with `oracle`.
    pub fn install_oracle(&self, oracle: &FakeOracle) -> Result<()> {
        std::fs::write(&self.script, oracle.script(&self.calls))?;
        Ok(())
    }

    /// Quiet config running the fake checkver through `sh`.
    pub fn config(&self) -> Result<Config> {
        self.config_with_interpreter("sh")
    }

    /// Quiet config running the checkver script through `interpreter`.
    pub fn config_with_interpreter(&self, interpreter: &str) -> Result<Config> {
        Ok(Config {
            verbosity: Verbosity::Quiet,
            manifest_dir: self.bucket.clone(),
            oracle: Oracle::resolve(&self.script, Some(interpreter))?,
        })
    }

    /// Every checkver invocation so far, one line of arguments each.
    pub fn calls(&self) -> Result<Vec<String>> {
        if !self.calls.exists() {
            return Ok(Vec::new());
        }
        Ok(std::fs::read_to_string(&self.calls)?
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Names passed to checkver with the update flag, in call order.
    pub fn update_calls(&self) -> Result<Vec<String>> {
        Ok(self
            .calls()?
            .iter()
            .filter(|line| line.ends_with("-Update"))
            .filter_map(|line| line.split_whitespace().next().map(str::to_string))
            .collect())
    }

    pub fn write_file(&self, file: &str, content: &str) -> Result<()> {
        std::fs::write(self.bucket.join(file), content)?;
        Ok(())
    }

    pub fn read_manifest(&self, name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(
            self.bucket.join(format!("{}.json", name)),
        )?)
    }

    pub fn head_subject(&self) -> Result<String> {
        run_git(&self.root, &["log", "-1", "--format=%s"])
    }

    pub fn remote_head_subject(&self) -> Result<String> {
        run_git(&self.remote, &["log", "-1", "--format=%s", "master"])
    }

    /// Files touched by the HEAD commit, relative to the repository root.
    pub fn head_files(&self) -> Result<Vec<String>> {
        Ok(
            run_git(&self.root, &["show", "--name-only", "--format=", "HEAD"])?
                .lines()
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn status_porcelain(&self) -> Result<String> {
        run_git(&self.root, &["status", "--porcelain"])
    }

    pub fn remove_remote(&self) -> Result<()> {
        run_git(&self.root, &["remote", "remove", "origin"])?;
        Ok(())
    }
}

pub fn manifest_json(version: &str) -> String {
    format!(
        "{{\n    \"version\": \"{}\",\n    \"homepage\": \"https://example.com\"\n}}\n",
        version
    )
}

/// Builds a shell script standing in for checkver.
///
/// Arguments follow checkver's positional order: `<name|*> <dir> [-Update]`.
#[derive(Debug, Default)]
pub struct FakeOracle {
    report: Vec<String>,
    rewrites: Vec<(String, String)>,
    failures: Vec<String>,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line printed by the check invocation.
    pub fn report(mut self, line: &str) -> Self {
        self.report.push(line.to_string());
        self
    }

    /// Makes the update invocation for `name` set its manifest to `version`.
    pub fn rewrite(mut self, name: &str, version: &str) -> Self {
        self.rewrites.push((name.to_string(), manifest_json(version)));
        self
    }

    /// Makes the update invocation for `name` exit with an error.
    pub fn fail(mut self, name: &str) -> Self {
        self.failures.push(name.to_string());
        self
    }

    fn script(&self, calls: &Path) -> String {
        let mut script = String::new();
        let _ = writeln!(script, "printf '%s\\n' \"$*\" >> '{}'", calls.display());
        script.push_str("if [ \"$3\" = \"-Update\" ]; then\n  case \"$1\" in\n");
        for name in &self.failures {
            let _ = writeln!(script, "    '{}') echo 'update failed' >&2; exit 1 ;;", name);
        }
        for (name, content) in &self.rewrites {
            let _ = writeln!(
                script,
                "    '{name}') cat > \"$2/{name}.json\" <<'MANIFEST_EOF'\n{content}MANIFEST_EOF\n    ;;"
            );
        }
        script.push_str("  esac\n  echo \"$1: autoupdate finished\"\n  exit 0\nfi\n");
        script.push_str("echo 'Checking upstream versions...' >&2\n");
        script.push_str("cat <<'REPORT_EOF'\n");
        for line in &self.report {
            script.push_str(line);
            script.push('\n');
        }
        script.push_str("REPORT_EOF\n");
        script
    }
}

/// Answers confirmation prompts from a fixed script and records the questions.
/// Declines once the answers run out.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
