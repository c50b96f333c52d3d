// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Accumulated check findings.
//!
//! Messages are indexed `file → line → column → [message]`, separately for
//! errors and warnings. Paths are stored relative to the plugin directory.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::check::CheckContext;

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Messages of one file, by line then column.
pub type FileMessages = BTreeMap<u32, BTreeMap<u32, Vec<Message>>>;

/// Messages of a whole run, by file.
pub type Messages = BTreeMap<String, FileMessages>;

/// Where and how a message is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageArgs {
    pub code: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub link: Option<String>,
}

impl MessageArgs {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = file.as_ref().to_string_lossy().to_string();
        self
    }

    pub fn line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Findings of a run, bound to the plugin they describe.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    #[serde(skip)]
    context: CheckContext,
    errors: Messages,
    warnings: Messages,
    error_count: usize,
    warning_count: usize,
}

impl CheckResult {
    pub fn new(context: CheckContext) -> Self {
        Self {
            context,
            errors: Messages::new(),
            warnings: Messages::new(),
            error_count: 0,
            warning_count: 0,
        }
    }

    pub fn context(&self) -> &CheckContext {
        &self.context
    }

    /// Record a finding.
    pub fn add_message(&mut self, is_error: bool, message: impl Into<String>, args: MessageArgs) {
        let file = self.relative_file(&args.file);
        let entry = Message {
            message: message.into(),
            code: args.code,
            link: args.link,
        };

        let (map, count) = if is_error {
            (&mut self.errors, &mut self.error_count)
        } else {
            (&mut self.warnings, &mut self.warning_count)
        };
        map.entry(file)
            .or_default()
            .entry(args.line)
            .or_default()
            .entry(args.column)
            .or_default()
            .push(entry);
        *count += 1;
    }

    pub fn add_error(&mut self, message: impl Into<String>, args: MessageArgs) {
        self.add_message(true, message, args);
    }

    pub fn add_warning(&mut self, message: impl Into<String>, args: MessageArgs) {
        self.add_message(false, message, args);
    }

    pub fn errors(&self) -> &Messages {
        &self.errors
    }

    pub fn warnings(&self) -> &Messages {
        &self.warnings
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn is_empty(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Drop warnings and/or errors, keeping counts consistent.
    pub fn without(mut self, warnings: bool, errors: bool) -> Self {
        if warnings {
            self.warnings.clear();
            self.warning_count = 0;
        }
        if errors {
            self.errors.clear();
            self.error_count = 0;
        }
        self
    }

    /// `file` relative to the plugin directory, with forward slashes.
    fn relative_file(&self, file: &str) -> String {
        if file.is_empty() {
            return String::new();
        }
        let root = self.context.path("");
        let relative = Path::new(file)
            .strip_prefix(&root)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| file.to_string());
        relative.replace('\\', "/")
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
