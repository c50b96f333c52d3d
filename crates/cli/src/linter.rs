// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! External linter boundary.
//!
//! Linter-backed checks name a coding standard and a few sniff arguments;
//! the linter reports findings as JSON, which [`apply_report`] folds into a
//! [`CheckResult`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::result::{CheckResult, MessageArgs};

/// Runs a coding standard against a plugin directory.
pub trait Linter: Send + Sync {
    /// Whether the linter can be invoked at all.
    fn is_available(&self) -> bool;

    /// Lint `target` with `standard`. `args` become `--key=value` options.
    fn run(&self, standard: &str, args: &[(&str, &str)], target: &Path) -> Result<LinterReport>;
}

/// JSON report of a linter run, keyed by file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinterReport {
    #[serde(default)]
    pub files: BTreeMap<String, LinterFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinterFile {
    #[serde(default)]
    pub messages: Vec<LinterMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinterMessage {
    /// `ERROR` or `WARNING`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub source: String,
    pub message: String,
}

impl LinterReport {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Linter {
            message: format!("invalid report: {}", e),
        })
    }

    pub fn message_count(&self) -> usize {
        self.files.values().map(|f| f.messages.len()).sum()
    }
}

/// Record every message of `report`: `ERROR` as an error, anything else as
/// a warning, with the sniff source as the code.
pub fn apply_report(report: &LinterReport, result: &mut CheckResult) {
    for (file, entry) in &report.files {
        for message in &entry.messages {
            result.add_message(
                message.kind == "ERROR",
                message.message.clone(),
                MessageArgs::new(message.source.clone())
                    .file(file)
                    .line(message.line)
                    .column(message.column),
            );
        }
    }
}

/// PHP_CodeSniffer, run as an external process.
#[derive(Debug, Clone)]
pub struct Phpcs {
    executable: PathBuf,
}

impl Default for Phpcs {
    fn default() -> Self {
        Self::new("phpcs")
    }
}

impl Phpcs {
    /// `executable` is a path, or a bare name looked up on `PATH`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The executable to spawn, if it exists.
    fn resolve(&self) -> Option<PathBuf> {
        if self.executable.components().count() > 1 {
            return self.executable.is_file().then(|| self.executable.clone());
        }
        let path = std::env::var_os("PATH")?;
        std::env::split_paths(&path)
            .map(|dir| dir.join(&self.executable))
            .find(|candidate| candidate.is_file())
    }
}

impl Linter for Phpcs {
    fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    fn run(&self, standard: &str, args: &[(&str, &str)], target: &Path) -> Result<LinterReport> {
        let executable = self.resolve().ok_or_else(|| Error::Linter {
            message: format!("{} not found", self.executable.display()),
        })?;

        let mut cmd = Command::new(&executable);
        cmd.arg("--report=json")
            .arg(format!("--standard={}", standard));
        for (key, value) in args {
            cmd.arg(format!("--{}={}", key, value));
        }
        cmd.arg(target);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        tracing::debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|e| Error::Linter {
            message: format!("failed to spawn {}: {}", executable.display(), e),
        })?;

        // Exit status 1 and 2 mean findings; anything above is a phpcs failure.
        let code = output.status.code().unwrap_or(-1);
        if !(0..=2).contains(&code) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Linter {
                message: format!("phpcs exited with {}: {}", code, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        LinterReport::parse(stdout.trim())
    }
}

#[cfg(test)]
#[path = "linter_tests.rs"]
mod tests;
