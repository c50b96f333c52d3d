// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entry-point-agnostic check runner.
//!
//! A runner resolves the plugin and the checks to run from a
//! [`RunnerSource`] (command line, AJAX request) plus explicit setters,
//! prepares the environment, runs the checks, and cleans up:
//!
//! ```text
//! Idle ──prepare──▶ Prepared ──run──▶ Ran ──cleanup──▶ CleanedUp
//! ```
//!
//! Cleanup also happens when the runner is dropped before it got there.

mod ajax;
mod cli;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

pub use ajax::{ACTIONS, Ajax, AjaxRequest, AjaxResponse, AjaxSource, NONCE_ACTION};
pub use cli::CliSource;

use crate::categories::{Category, filter_checks_by_categories};
use crate::check::CheckContext;
use crate::collection::CheckCollection;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::orchestrator::{Checks, Extension};
use crate::plugin::resolve_basename;
use crate::preparation::{
    Cleanup, Preparation, RuntimeEnvironmentSetup, UniversalRuntimePreparation, guarded,
};
use crate::repository::CheckRepository;
use crate::result::CheckResult;

/// Where a runner reads what to check.
pub trait RunnerSource {
    /// Whether the current invocation is a plugin check at all.
    fn is_plugin_check(&self) -> bool;

    /// The plugin as given by the user (slug or basename).
    fn plugin_input(&self) -> Option<String>;

    fn check_slugs(&self) -> Vec<String>;

    fn exclude_slugs(&self) -> Vec<String> {
        Vec::new()
    }

    fn categories(&self) -> Vec<Category> {
        Vec::new()
    }

    fn include_experimental(&self) -> bool {
        false
    }

    /// Whether the runner sets up and tears down the runtime environment
    /// itself (otherwise the caller does it in separate steps).
    fn manages_environment(&self) -> bool {
        false
    }
}

/// Knobs shared by all runners.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Table prefix runtime checks run under.
    pub testing_prefix: String,
    /// Directory holding the minimal theme, registered while prepared.
    pub theme_root: Option<PathBuf>,
    /// Basename of this tool when installed as a plugin.
    pub tool_basename: Option<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            testing_prefix: "wppc_".to_string(),
            theme_root: None,
            tool_basename: Some("plugin-check/plugin.php".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Prepared,
    Ran,
    CleanedUp,
}

/// Request values seen when the runner was created.
#[derive(Debug, Clone)]
struct Snapshot {
    plugin: Option<String>,
    checks: Vec<String>,
}

struct Resolved {
    basename: String,
    checks: Checks,
    selected: CheckCollection,
}

/// Prepares, runs and cleans up a check run.
pub struct CheckRunner<S: RunnerSource> {
    host: Arc<dyn Host>,
    repository: Arc<CheckRepository>,
    source: S,
    settings: RunnerSettings,
    extensions: Vec<Extension>,
    plugin: Option<String>,
    check_slugs: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    categories: Option<Vec<Category>>,
    experimental: Option<bool>,
    snapshot: Option<Snapshot>,
    state: RunnerState,
    resolved: Option<Resolved>,
    cleanup: Option<Cleanup>,
}

impl<S: RunnerSource> CheckRunner<S> {
    /// Create a runner. When `source` already identifies a plugin check,
    /// its plugin and check slugs are recorded and must not change later.
    pub fn new(host: Arc<dyn Host>, repository: Arc<CheckRepository>, source: S) -> Self {
        let snapshot = source.is_plugin_check().then(|| Snapshot {
            plugin: source.plugin_input(),
            checks: source.check_slugs(),
        });
        Self {
            host,
            repository,
            source,
            settings: RunnerSettings::default(),
            extensions: Vec::new(),
            plugin: None,
            check_slugs: None,
            exclude: None,
            categories: None,
            experimental: None,
            snapshot,
            state: RunnerState::Idle,
            resolved: None,
            cleanup: None,
        }
    }

    pub fn with_settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn set_plugin(&mut self, plugin: impl Into<String>) {
        self.plugin = Some(plugin.into());
    }

    pub fn set_check_slugs(&mut self, slugs: Vec<String>) {
        self.check_slugs = Some(slugs);
    }

    pub fn set_exclude_checks(&mut self, slugs: Vec<String>) {
        self.exclude = Some(slugs);
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = Some(categories);
    }

    pub fn set_experimental_flag(&mut self, include: bool) {
        self.experimental = Some(include);
    }

    pub fn is_plugin_check(&self) -> bool {
        self.source.is_plugin_check()
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn requested_plugin(&self) -> Result<String> {
        self.plugin
            .clone()
            .or_else(|| self.source.plugin_input())
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| Error::InvalidPlugin("no plugin given".to_string()))
    }

    fn requested_checks(&self) -> Vec<String> {
        self.check_slugs
            .clone()
            .unwrap_or_else(|| self.source.check_slugs())
    }

    /// Fail if the plugin or checks differ from what the runner was created for.
    fn validate_snapshot(&self, plugin: &str, checks: &[String]) -> Result<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        if let Some(expected) = &snapshot.plugin
            && expected != plugin
        {
            return Err(Error::InvalidPlugin(format!(
                "the plugin to check changed from {} to {}",
                expected, plugin
            )));
        }
        if snapshot.checks != checks {
            return Err(Error::InvalidChecks(
                "the checks to run changed since the run started".to_string(),
            ));
        }
        Ok(())
    }

    /// Basename of the plugin to check.
    pub fn plugin_basename(&self) -> Result<String> {
        let plugin = self.requested_plugin()?;
        resolve_basename(&plugin, &self.host.installed_plugins()?)
    }

    /// The checks this run executes.
    pub fn checks_to_run(&mut self) -> Result<CheckCollection> {
        Ok(self.resolve()?.selected.clone())
    }

    fn resolve(&mut self) -> Result<&Resolved> {
        let plugin = self.requested_plugin()?;
        let requested = self.requested_checks();
        self.validate_snapshot(&plugin, &requested)?;

        if self.resolved.is_none() {
            let basename = resolve_basename(&plugin, &self.host.installed_plugins()?)?;
            let context = CheckContext::new(
                self.host.plugins_dir().join(&basename),
                self.host.as_ref(),
            );
            let checks = Checks::new(context, Arc::clone(&self.repository))
                .with_extensions(&self.extensions);
            let selected = self.select(checks.get_checks()?, &requested)?;
            tracing::debug!("checks to run on {}: {:?}", basename, selected);
            self.resolved = Some(Resolved {
                basename,
                checks,
                selected,
            });
        }

        self.resolved
            .as_ref()
            .ok_or_else(|| Error::Internal("checks were not resolved".to_string()))
    }

    fn select(&self, all: &CheckCollection, requested: &[String]) -> Result<CheckCollection> {
        let experimental = self
            .experimental
            .unwrap_or_else(|| self.source.include_experimental());
        let exclude = self
            .exclude
            .clone()
            .unwrap_or_else(|| self.source.exclude_slugs());
        let categories = self
            .categories
            .clone()
            .unwrap_or_else(|| self.source.categories());

        let mut selected = if experimental {
            all.clone()
        } else {
            all.filter(|check, _| !check.is_experimental())
        };
        selected = selected.require(requested)?.include(requested).exclude(&exclude);
        if !categories.is_empty() {
            selected = filter_checks_by_categories(&selected, &categories);
        }

        let mut unavailable = Vec::new();
        for (slug, check) in selected.iter() {
            let reason = check.unavailable_reason().or_else(|| {
                (check.is_runtime() && !self.host.supports_requests())
                    .then(|| "the host cannot simulate front-end requests".to_string())
            });
            let Some(reason) = reason else {
                continue;
            };
            if requested.iter().any(|r| r == slug) {
                return Err(Error::CheckUnavailable {
                    slug: slug.to_string(),
                    reason,
                });
            }
            tracing::warn!("skipping check {}: {}", slug, reason);
            unavailable.push(slug.to_string());
        }
        Ok(selected.exclude(&unavailable))
    }

    /// Apply the environment changes the selected checks need.
    pub fn prepare(&mut self) -> Result<()> {
        if self.state != RunnerState::Idle {
            return Err(Error::Internal(format!(
                "cannot prepare a runner in state {:?}",
                self.state
            )));
        }

        let resolved = self.resolve()?;
        let has_runtime = resolved.selected.has_runtime();
        let basename = resolved.basename.clone();

        let mut parts = Vec::new();
        if has_runtime
            && let Err(e) = self.prepare_runtime(&basename, &mut parts)
        {
            if let Err(cleanup_err) = Cleanup::chain("runner", parts).run() {
                tracing::warn!("cleanup after failed prepare failed: {}", cleanup_err);
            }
            return Err(e);
        }

        self.cleanup = Some(if parts.is_empty() {
            Cleanup::noop()
        } else {
            Cleanup::chain("runner", parts)
        });
        self.state = RunnerState::Prepared;
        Ok(())
    }

    fn prepare_runtime(&self, basename: &str, parts: &mut Vec<Cleanup>) -> Result<()> {
        if self.source.manages_environment() {
            let setup = RuntimeEnvironmentSetup::new(
                Arc::clone(&self.host),
                self.settings.testing_prefix.clone(),
            );
            setup.set_up()?;
            parts.push(Cleanup::new("runtime_environment", move || setup.clean_up()));
        }

        let universal = UniversalRuntimePreparation::new(Arc::clone(&self.host), basename)
            .with_theme_root(self.settings.theme_root.clone())
            .keeping(self.settings.tool_basename.clone());
        parts.push(universal.prepare()?);

        let previous = self.host.set_table_prefix(&self.settings.testing_prefix)?;
        let host = Arc::clone(&self.host);
        parts.push(Cleanup::new("table_prefix", move || {
            host.set_table_prefix(&previous).map(|_| ())
        }));
        Ok(())
    }

    /// Run the selected checks. Prepares first when still idle.
    pub fn run(&mut self) -> Result<CheckResult> {
        match self.state {
            RunnerState::Idle => self.prepare()?,
            RunnerState::Prepared => {}
            state => {
                return Err(Error::Internal(format!(
                    "cannot run a runner in state {:?}",
                    state
                )));
            }
        }

        let plugin = self.requested_plugin()?;
        self.validate_snapshot(&plugin, &self.requested_checks())?;

        let resolved = self
            .resolved
            .as_ref()
            .ok_or_else(|| Error::Internal("runner was not prepared".to_string()))?;
        let shared = prepare_shared(&self.host, &resolved.selected)?;
        let slugs = resolved.selected.slugs();
        let result = guarded(shared, || resolved.checks.run_checks(&slugs))?;

        self.state = RunnerState::Ran;
        Ok(result)
    }

    /// Undo everything [`prepare`](Self::prepare) did.
    pub fn cleanup(&mut self) -> Result<()> {
        self.state = RunnerState::CleanedUp;
        match self.cleanup.take() {
            Some(cleanup) => cleanup.run(),
            None => Ok(()),
        }
    }

    /// Prepare, run and clean up in one go.
    pub fn execute(&mut self) -> Result<CheckResult> {
        self.prepare()?;
        let outcome = self.run();
        match (outcome, self.cleanup()) {
            (Ok(result), Ok(())) => Ok(result),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                tracing::warn!("cleanup failed: {}", cleanup_err);
                Err(e)
            }
        }
    }
}

/// Prepare each distinct shared preparation of `checks` once.
///
/// If one fails, the ones already prepared are cleaned up before the error
/// is returned.
fn prepare_shared(host: &Arc<dyn Host>, checks: &CheckCollection) -> Result<Cleanup> {
    let mut seen = BTreeSet::new();
    let mut cleanups = Vec::new();

    for (_, check) in checks.iter() {
        for shared in check.shared_preparations() {
            if !seen.insert(shared.key()) {
                continue;
            }
            tracing::debug!("preparing shared {} {}", shared.name, shared.args);
            match shared.build(host).and_then(|p| p.prepare()) {
                Ok(cleanup) => cleanups.push(cleanup),
                Err(e) => {
                    if let Err(cleanup_err) = Cleanup::chain("shared_preparations", cleanups).run() {
                        tracing::warn!("shared cleanup failed: {}", cleanup_err);
                    }
                    return Err(e);
                }
            }
        }
    }
    Ok(Cleanup::chain("shared_preparations", cleanups))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
