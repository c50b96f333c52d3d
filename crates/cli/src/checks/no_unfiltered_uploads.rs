// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flags plugins that define `ALLOW_UNFILTERED_UPLOADS`.

use crate::categories::Category;
use crate::check::{Check, ExecutionMode};
use crate::error::Result;
use crate::pattern::SourcePattern;
use crate::result::{CheckResult, MessageArgs};

use super::{php_files, read_source};

const DEFINE_PATTERN: &str = r#"(?i)\bdefine\s*\(\s*['"]ALLOW_UNFILTERED_UPLOADS['"]"#;

pub struct NoUnfilteredUploadsCheck {
    pattern: SourcePattern,
}

impl NoUnfilteredUploadsCheck {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: SourcePattern::compile(DEFINE_PATTERN)?,
        })
    }
}

impl Check for NoUnfilteredUploadsCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PLUGIN_REPO]
    }

    fn description(&self) -> &str {
        "Detects the definition of the ALLOW_UNFILTERED_UPLOADS constant."
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/wordpress-org/detailed-plugin-guidelines/"
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        for file in php_files(result.context()) {
            let Some(source) = read_source(&file) else {
                continue;
            };
            for found in self.pattern.locate_all(&source) {
                result.add_error(
                    "ALLOW_UNFILTERED_UPLOADS is not permitted.",
                    MessageArgs::new("allow_unfiltered_uploads_detected")
                        .file(&file.path)
                        .line(found.line)
                        .column(found.column),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "no_unfiltered_uploads_tests.rs"]
mod tests;
