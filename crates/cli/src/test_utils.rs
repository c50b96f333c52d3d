//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::categories::Category;
use crate::check::{Check, CheckContext, ExecutionMode, Stability};
use crate::error::{Error, Result};
use crate::host::{Host, MemoryHost};
use crate::plugin::PluginHeader;
use crate::preparation::{Cleanup, Preparation, SharedPreparation};
use crate::result::{CheckResult, MessageArgs};

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
///
/// # Example
///
/// ```ignore
/// let tmp = TempDir::new().unwrap();
/// create_tree(tmp.path(), &[
///     ("wp-content/plugins/foo/foo.php", "<?php /* Plugin Name: Foo */"),
///     ("wp-content/plugins/foo/readme.txt", "=== Foo ==="),
/// ]);
/// ```
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Creates an empty WordPress install (`wp-content/plugins`).
pub fn temp_install() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("wp-content/plugins")).unwrap();
    dir
}

/// Writes plugin files under `wp-content/plugins/` of `root`.
pub fn write_plugin(root: &Path, files: &[(&str, &str)]) {
    let prefixed: Vec<(String, &str)> = files
        .iter()
        .map(|(p, c)| (format!("wp-content/plugins/{}", p), *c))
        .collect();
    let borrowed: Vec<(&str, &str)> = prefixed.iter().map(|(p, c)| (p.as_str(), *c)).collect();
    create_tree(root, &borrowed);
}

/// A memory host rooted at `root` with `foo/foo.php` installed.
pub fn foo_host(root: &Path) -> Arc<MemoryHost> {
    Arc::new(MemoryHost::new(root).with_plugin("foo/foo.php", PluginHeader::named("Foo")))
}

/// Context for `foo/foo.php` on `host`.
pub fn foo_context(host: &dyn Host) -> CheckContext {
    CheckContext::new(host.plugins_dir().join("foo/foo.php"), host)
}

/// Empty result for `foo/foo.php` installed under `root`.
pub fn foo_result(root: &Path) -> CheckResult {
    let plugins_dir = root.join("wp-content/plugins");
    CheckResult::new(CheckContext::from_parts(
        plugins_dir.join("foo/foo.php"),
        &plugins_dir,
        "http://example.org/wp-content/plugins",
    ))
}

/// Codes of all messages in `messages`, in file/line/column order.
pub fn codes(messages: &crate::result::Messages) -> Vec<String> {
    messages
        .values()
        .flat_map(|lines| lines.values())
        .flat_map(|columns| columns.values())
        .flatten()
        .map(|m| m.code.clone())
        .collect()
}

/// Configurable check for orchestration tests.
pub struct FakeCheck {
    pub mode: ExecutionMode,
    pub stability: Stability,
    pub categories: Vec<Category>,
    pub shared: Vec<SharedPreparation>,
    pub preparation: Option<Box<dyn Preparation>>,
    pub unavailable: Option<String>,
    pub fail: bool,
    pub runs: Arc<AtomicUsize>,
    /// Log shared with other fakes to observe run order.
    pub log: Arc<Mutex<Vec<String>>>,
    pub name: String,
}

impl FakeCheck {
    pub fn new(name: &str, mode: ExecutionMode) -> Self {
        Self {
            mode,
            stability: Stability::Stable,
            categories: vec![Category::GENERAL],
            shared: Vec::new(),
            preparation: None,
            unavailable: None,
            fail: false,
            runs: Arc::default(),
            log: Arc::default(),
            name: name.to_string(),
        }
    }

    pub fn static_check(name: &str) -> Self {
        Self::new(name, ExecutionMode::Static)
    }

    pub fn runtime_check(name: &str) -> Self {
        Self::new(name, ExecutionMode::Runtime)
    }

    pub fn experimental(mut self) -> Self {
        self.stability = Stability::Experimental;
        self
    }

    pub fn categories(mut self, categories: &[Category]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn unavailable(mut self, reason: &str) -> Self {
        self.unavailable = Some(reason.to_string());
        self
    }

    pub fn with_shared(mut self, shared: SharedPreparation) -> Self {
        self.shared.push(shared);
        self
    }

    pub fn with_preparation(mut self, prep: impl Preparation + 'static) -> Self {
        self.preparation = Some(Box::new(prep));
        self
    }

    pub fn logging_to(mut self, log: &Arc<Mutex<Vec<String>>>) -> Self {
        self.log = Arc::clone(log);
        self
    }
}

impl Check for FakeCheck {
    fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    fn stability(&self) -> Stability {
        self.stability
    }

    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn shared_preparations(&self) -> Vec<SharedPreparation> {
        self.shared.clone()
    }

    fn as_preparation(&self) -> Option<&dyn Preparation> {
        self.preparation.as_deref()
    }

    fn unavailable_reason(&self) -> Option<String> {
        self.unavailable.clone()
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("run:{}", self.name));
        if self.fail {
            return Err(Error::Internal(format!("{} failed", self.name)));
        }
        result.add_warning(
            format!("{} ran", self.name),
            MessageArgs::new(self.name.clone()).file(format!("{}.php", self.name)),
        );
        Ok(())
    }
}

/// Preparation that logs prepare and cleanup calls.
pub struct LoggingPreparation {
    pub name: String,
    pub fail: bool,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl LoggingPreparation {
    pub fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            fail: false,
            log: Arc::clone(log),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Preparation for LoggingPreparation {
    fn prepare(&self) -> Result<Cleanup> {
        self.log.lock().unwrap().push(format!("prepare:{}", self.name));
        if self.fail {
            return Err(Error::Preparation {
                name: "logging",
                message: format!("{} failed", self.name),
            });
        }
        let log = Arc::clone(&self.log);
        let name = self.name.clone();
        Ok(Cleanup::new("logging", move || {
            log.lock().unwrap().push(format!("cleanup:{}", name));
            Ok(())
        }))
    }
}

thread_local! {
    static SHARED_BUILDS: Cell<usize> = const { Cell::new(0) };
}

/// Number of shared logging preparations built on this thread.
pub fn shared_builds() -> usize {
    SHARED_BUILDS.with(|c| c.get())
}

/// Shared preparation request that logs to the global run log under its
/// `"name"` arg. Counted per thread through [`shared_builds`].
pub fn shared_logging(name: &str) -> SharedPreparation {
    SharedPreparation {
        name: "logging",
        args: serde_json::json!({ "name": name }),
        factory: build_shared_logging,
    }
}

fn build_shared_logging(
    args: &serde_json::Value,
    _host: &Arc<dyn Host>,
) -> Result<Box<dyn Preparation>> {
    SHARED_BUILDS.with(|c| c.set(c.get() + 1));
    let name = args["name"].as_str().unwrap_or_default().to_string();
    let log = SHARED_LOG.with(Arc::clone);
    Ok(Box::new(LoggingPreparation::new(&name, &log)))
}

thread_local! {
    static SHARED_LOG: Arc<Mutex<Vec<String>>> = Arc::default();
}

/// Log written by preparations built through [`shared_logging`] on this thread.
pub fn shared_log() -> Arc<Mutex<Vec<String>>> {
    SHARED_LOG.with(Arc::clone)
}

/// Linter returning a canned report and recording its invocations.
pub struct FakeLinter {
    pub available: bool,
    pub report: String,
    pub calls: Mutex<Vec<(String, Vec<(String, String)>, std::path::PathBuf)>>,
}

impl FakeLinter {
    pub fn new(report: &str) -> Self {
        Self {
            available: true,
            report: report.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(r#"{"files":{}}"#)
    }

    pub fn missing() -> Self {
        Self {
            available: false,
            ..Self::empty()
        }
    }
}

impl crate::linter::Linter for FakeLinter {
    fn is_available(&self) -> bool {
        self.available
    }

    fn run(
        &self,
        standard: &str,
        args: &[(&str, &str)],
        target: &Path,
    ) -> Result<crate::linter::LinterReport> {
        self.calls.lock().unwrap().push((
            standard.to_string(),
            args.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            target.to_path_buf(),
        ));
        crate::linter::LinterReport::parse(&self.report)
    }
}
