// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin file discovery.
//!
//! Uses the `ignore` crate's walker with every filter turned off: plugins
//! ship what is on disk, so hidden files and gitignored files count. Only
//! the configured directories are pruned, and those are still reported so
//! checks can flag them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ignore::WalkBuilder;

/// Default maximum directory depth.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Files above this size are listed but never read by content checks.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Directories whose contents are not checked.
pub const DEFAULT_IGNORE_DIRECTORIES: &[&str] = &[".git", "vendor", "node_modules"];

/// Helper to check if an ignore::Error is a symlink loop error.
fn is_loop_error(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. } => is_loop_error(err),
        ignore::Error::WithDepth { err, .. } => is_loop_error(err),
        ignore::Error::WithLineNumber { err, .. } => is_loop_error(err),
        _ => false,
    }
}

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Maximum directory depth (default: 100).
    pub max_depth: Option<usize>,

    /// Directory names that are reported but not descended into.
    pub ignore_directories: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            ignore_directories: DEFAULT_IGNORE_DIRECTORIES
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

/// File discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl WalkedFile {
    /// Whether content checks should read this file.
    pub fn is_readable(&self) -> bool {
        self.size <= MAX_FILE_SIZE
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// What a walk found.
#[derive(Debug, Default)]
pub struct Walked {
    /// Files, sorted by path.
    pub files: Vec<WalkedFile>,

    /// Directories below the root, pruned ones included, sorted by path.
    pub directories: Vec<PathBuf>,

    /// Symlink loops detected.
    pub symlink_loops: usize,

    /// Errors encountered.
    pub errors: usize,
}

impl Walked {
    /// Files with extension `ext` (case-insensitive).
    pub fn with_extension<'a>(&'a self, ext: &'a str) -> impl Iterator<Item = &'a WalkedFile> {
        self.files.iter().filter(move |f| f.has_extension(ext))
    }
}

/// Sequential walker over a plugin directory.
pub struct FileWalker {
    config: WalkerConfig,
}

impl FileWalker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Walk `root`. A file root yields just that file.
    pub fn walk(&self, root: &Path) -> Walked {
        let pruned: Arc<Mutex<Vec<PathBuf>>> = Arc::default();

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(true) // Follow symlinks (ignore crate detects loops)
            .sort_by_file_path(|a, b| a.cmp(b))
            .max_depth(self.config.max_depth);

        let ignore_directories = self.config.ignore_directories.clone();
        let prune_log = Arc::clone(&pruned);
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            let ignored = is_dir
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| ignore_directories.iter().any(|d| d == name));
            if ignored {
                prune_log
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(entry.path().to_path_buf());
            }
            !ignored
        });

        let mut walked = Walked::default();
        for entry in builder.build() {
            match entry {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if file_type.is_dir() {
                        if entry.depth() > 0 {
                            walked.directories.push(entry.into_path());
                        }
                        continue;
                    }
                    if !file_type.is_file() {
                        continue;
                    }
                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    if size > MAX_FILE_SIZE {
                        tracing::warn!("not reading {} ({} bytes)", entry.path().display(), size);
                    }
                    walked.files.push(WalkedFile {
                        path: entry.into_path(),
                        size,
                    });
                }
                Err(err) => {
                    if is_loop_error(&err) {
                        tracing::warn!("Symlink loop detected: {}", err);
                        walked.symlink_loops += 1;
                    } else {
                        tracing::warn!("Walk error: {}", err);
                        walked.errors += 1;
                    }
                }
            }
        }

        walked
            .directories
            .extend(pruned.lock().unwrap_or_else(PoisonError::into_inner).drain(..));
        walked.directories.sort();
        walked.files.sort_by(|a, b| a.path.cmp(&b.path));
        walked
    }
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new(WalkerConfig::default())
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
