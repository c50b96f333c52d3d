//! The check abstraction and the context it runs against.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::categories::Category;
use crate::error::Result;
use crate::host::Host;
use crate::preparation::{Preparation, SharedPreparation};
use crate::result::CheckResult;

/// How a check inspects the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Reads plugin files only.
    Static,
    /// Needs the plugin loaded in a live site.
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    #[default]
    Stable,
    Experimental,
}

/// Identifies the plugin under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckContext {
    main_file: PathBuf,
    basename: String,
    dir: PathBuf,
    url: String,
}

impl CheckContext {
    /// Context for a plugin main file installed on `host`.
    pub fn new(main_file: impl Into<PathBuf>, host: &dyn Host) -> Self {
        Self::from_parts(main_file, &host.plugins_dir(), &host.plugins_url())
    }

    /// Context from a main file, the plugins directory and its public URL.
    pub fn from_parts(main_file: impl Into<PathBuf>, plugins_dir: &Path, plugins_url: &str) -> Self {
        let main_file = main_file.into();
        let file_name = main_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let parent = main_file.parent().map(Path::to_path_buf).unwrap_or_default();
        let plugins_url = plugins_url.trim_end_matches('/');

        if parent == plugins_dir {
            return Self {
                basename: file_name,
                dir: parent,
                url: format!("{}/", plugins_url),
                main_file,
            };
        }

        let dir_name = parent
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            basename: format!("{}/{}", dir_name, file_name),
            url: format!("{}/{}/", plugins_url, dir_name),
            dir: parent,
            main_file,
        }
    }

    pub fn main_file(&self) -> &Path {
        &self.main_file
    }

    /// Basename as WordPress stores it (`dir/file.php` or `file.php`).
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Plugin slug: the directory name, or the file stem for single-file plugins.
    pub fn slug(&self) -> &str {
        match self.basename.split_once('/') {
            Some((dir, _)) => dir,
            None => self.basename.strip_suffix(".php").unwrap_or(&self.basename),
        }
    }

    pub fn is_single_file(&self) -> bool {
        !self.basename.contains('/')
    }

    /// Absolute path of the plugin directory, or of `sub` inside it.
    pub fn path(&self, sub: &str) -> PathBuf {
        if sub.is_empty() {
            self.dir.clone()
        } else {
            self.dir.join(sub.trim_start_matches('/'))
        }
    }

    /// Public URL of the plugin directory (with trailing slash), or of `sub`.
    pub fn url(&self, sub: &str) -> String {
        format!("{}{}", self.url, sub.trim_start_matches('/'))
    }
}

/// A unit of analysis.
///
/// Findings go into the [`CheckResult`]; an `Err` from [`Check::run`] means
/// the check itself broke and aborts the run.
pub trait Check: Send + Sync {
    fn execution_mode(&self) -> ExecutionMode;

    fn stability(&self) -> Stability {
        Stability::Stable
    }

    /// Categories this check belongs to. Must not be empty.
    fn categories(&self) -> Vec<Category>;

    fn description(&self) -> &str {
        ""
    }

    fn documentation_url(&self) -> &str {
        ""
    }

    /// Preparations this check needs, deduplicated across the run.
    fn shared_preparations(&self) -> Vec<SharedPreparation> {
        Vec::new()
    }

    /// The check's private preparation, applied around its own run.
    fn as_preparation(&self) -> Option<&dyn Preparation> {
        None
    }

    /// Why this check cannot run in the current environment, if it cannot.
    fn unavailable_reason(&self) -> Option<String> {
        None
    }

    fn run(&self, result: &mut CheckResult) -> Result<()>;

    fn is_runtime(&self) -> bool {
        self.execution_mode() == ExecutionMode::Runtime
    }

    fn is_experimental(&self) -> bool {
        self.stability() == Stability::Experimental
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
