// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Encoded PHP detection.
//!
//! Each obfuscator leaves loader stubs or banners in the files it encodes.
//! A file is reported once per tool, at the first signature found.

use std::ops::BitOr;

use crate::categories::Category;
use crate::check::{Check, ExecutionMode};
use crate::error::{Error, Result};
use crate::pattern::SourcePattern;
use crate::result::{CheckResult, MessageArgs};

use super::{php_files, read_source};

/// Set of obfuscators to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObfuscationTools(u8);

impl ObfuscationTools {
    pub const ZEND: ObfuscationTools = ObfuscationTools(0b001);
    pub const SOURCEGUARDIAN: ObfuscationTools = ObfuscationTools(0b010);
    pub const IONCUBE: ObfuscationTools = ObfuscationTools(0b100);
    pub const ALL: ObfuscationTools = ObfuscationTools(0b111);

    pub fn contains(self, other: ObfuscationTools) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set from names such as `"zend"` or `"ioncube"`.
    pub fn from_names(names: &[String]) -> Result<Self> {
        names.iter().try_fold(ObfuscationTools(0), |set, name| {
            let name = name.trim().to_ascii_lowercase();
            TOOLS
                .iter()
                .find(|t| t.name == name)
                .map(|t| set | t.flag)
                .ok_or_else(|| Error::Config {
                    message: format!(
                        "unknown obfuscation tool `{}` in check.code_obfuscation.tools",
                        name
                    ),
                    path: None,
                })
        })
    }
}

impl BitOr for ObfuscationTools {
    type Output = ObfuscationTools;

    fn bitor(self, rhs: ObfuscationTools) -> ObfuscationTools {
        ObfuscationTools(self.0 | rhs.0)
    }
}

struct Tool {
    name: &'static str,
    label: &'static str,
    flag: ObfuscationTools,
    signatures: &'static [&'static str],
}

const TOOLS: &[Tool] = &[
    Tool {
        name: "zend",
        label: "Zend Guard",
        flag: ObfuscationTools::ZEND,
        signatures: &["<?php @Zend;", "This file was encoded by"],
    },
    Tool {
        name: "sourceguardian",
        label: "Source Guardian",
        flag: ObfuscationTools::SOURCEGUARDIAN,
        signatures: &["sourceguardian.com", "function_exists('sg_load')", "$__x="],
    },
    Tool {
        name: "ioncube",
        label: "ionCube",
        flag: ObfuscationTools::IONCUBE,
        signatures: &["ionCube Loader"],
    },
];

pub struct CodeObfuscationCheck {
    detectors: Vec<(&'static str, SourcePattern)>,
}

impl CodeObfuscationCheck {
    pub fn new(tools: ObfuscationTools) -> Result<Self> {
        let mut detectors = Vec::new();
        for tool in TOOLS.iter().filter(|t| tools.contains(t.flag)) {
            detectors.push((tool.label, SourcePattern::literals(tool.signatures)?));
        }
        Ok(Self { detectors })
    }
}

impl Check for CodeObfuscationCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PLUGIN_REPO]
    }

    fn description(&self) -> &str {
        "Detects the usage of code obfuscation tools."
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/wordpress-org/detailed-plugin-guidelines/#4-code-must-be-mostly-human-readable"
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        for file in php_files(result.context()) {
            let Some(source) = read_source(&file) else {
                continue;
            };
            for (label, pattern) in &self.detectors {
                if let Some(found) = pattern.locate_first(&source) {
                    result.add_error(
                        format!("Code Obfuscation tools are not allowed. Detected: {}", label),
                        MessageArgs::new("obfuscated_code_detected")
                            .file(&file.path)
                            .line(found.line)
                            .column(found.column),
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "code_obfuscation_tests.rs"]
mod tests;
