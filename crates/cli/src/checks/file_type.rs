// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Forbidden file types.
//!
//! Compressed archives, phar files, hidden files and application binaries
//! are errors. Version control directories are errors on production sites
//! and warnings elsewhere, since development checkouts carry them.

use std::ops::BitOr;

use crate::categories::Category;
use crate::check::{Check, ExecutionMode};
use crate::error::{Error, Result};
use crate::host::EnvironmentType;
use crate::result::{CheckResult, MessageArgs};
use crate::walker::WalkerConfig;

use super::plugin_files;

const COMPRESSED_EXTENSIONS: &[&str] = &["zip", "gz", "tgz", "rar", "tar", "7z"];

const APPLICATION_EXTENSIONS: &[&str] = &[
    "a5r", "a5w", "app", "bat", "bin", "cmd", "com", "cpl", "deb", "dll", "dmg", "exe", "ipa",
    "jar", "msi", "rpm", "scr", "sh", "so", "vb", "vbs",
];

const VCS_DIRECTORIES: &[&str] = &[".git", ".svn", ".hg", ".bzr"];

/// Set of file kinds to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileTypes(u8);

impl FileTypes {
    pub const COMPRESSED: FileTypes = FileTypes(0b00001);
    pub const PHAR: FileTypes = FileTypes(0b00010);
    pub const VCS: FileTypes = FileTypes(0b00100);
    pub const HIDDEN: FileTypes = FileTypes(0b01000);
    pub const APPLICATION: FileTypes = FileTypes(0b10000);
    pub const ALL: FileTypes = FileTypes(0b11111);

    const NAMES: &[(&str, FileTypes)] = &[
        ("compressed", Self::COMPRESSED),
        ("phar", Self::PHAR),
        ("vcs", Self::VCS),
        ("hidden", Self::HIDDEN),
        ("application", Self::APPLICATION),
    ];

    pub fn contains(self, other: FileTypes) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set from names such as `"compressed"` or `"vcs"`.
    pub fn from_names(names: &[String]) -> Result<Self> {
        names.iter().try_fold(FileTypes(0), |set, name| {
            let name = name.trim().to_ascii_lowercase();
            Self::NAMES
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, t)| set | *t)
                .ok_or_else(|| Error::Config {
                    message: format!("unknown file type `{}` in check.file_type.types", name),
                    path: None,
                })
        })
    }
}

impl BitOr for FileTypes {
    type Output = FileTypes;

    fn bitor(self, rhs: FileTypes) -> FileTypes {
        FileTypes(self.0 | rhs.0)
    }
}

pub struct FileTypeCheck {
    types: FileTypes,
    environment: EnvironmentType,
    walker: WalkerConfig,
}

impl FileTypeCheck {
    pub fn new(types: FileTypes, environment: EnvironmentType) -> Self {
        Self {
            types,
            environment,
            walker: WalkerConfig::default(),
        }
    }

    pub fn with_walker(mut self, walker: WalkerConfig) -> Self {
        self.walker = walker;
        self
    }
}

fn has_any_extension(name: &str, extensions: &[&str]) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

impl Check for FileTypeCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PLUGIN_REPO]
    }

    fn description(&self) -> &str {
        "Detects the usage of hidden and compressed files, VCS directories, application files and badly named files."
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/wordpress-org/detailed-plugin-guidelines/"
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let walked = plugin_files(result.context(), &self.walker);

        if self.types.contains(FileTypes::VCS) {
            let is_error = self.environment == EnvironmentType::Production;
            for dir in &walked.directories {
                let is_vcs = dir
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| VCS_DIRECTORIES.contains(&n));
                if is_vcs {
                    result.add_message(
                        is_error,
                        "Version control checkouts should not be present.",
                        MessageArgs::new("vcs_present").file(dir),
                    );
                }
            }
        }

        for file in &walked.files {
            let Some(name) = file.path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if self.types.contains(FileTypes::COMPRESSED)
                && has_any_extension(name, COMPRESSED_EXTENSIONS)
            {
                result.add_error(
                    "Compressed files are not permitted.",
                    MessageArgs::new("compressed_files").file(&file.path),
                );
            }
            if self.types.contains(FileTypes::PHAR) && has_any_extension(name, &["phar"]) {
                result.add_error(
                    "Phar files are not permitted.",
                    MessageArgs::new("phar_files").file(&file.path),
                );
            }
            if self.types.contains(FileTypes::HIDDEN) && name.starts_with('.') {
                result.add_error(
                    "Hidden files are not permitted.",
                    MessageArgs::new("hidden_files").file(&file.path),
                );
            }
            if self.types.contains(FileTypes::APPLICATION)
                && has_any_extension(name, APPLICATION_EXTENSIONS)
            {
                result.add_error(
                    "Application files are not permitted.",
                    MessageArgs::new("application_detected").file(&file.path),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_type_tests.rs"]
mod tests;
