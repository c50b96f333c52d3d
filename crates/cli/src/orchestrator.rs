// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runs a set of checks against one plugin.

use std::sync::{Arc, OnceLock};

use crate::check::{Check, CheckContext};
use crate::collection::CheckCollection;
use crate::error::{Error, Result};
use crate::preparation::guarded;
use crate::repository::{CheckFlags, CheckRepository};
use crate::result::CheckResult;

/// Callback that adds, replaces or removes available checks.
pub type Extension = Arc<dyn Fn(CheckCollection) -> Result<CheckCollection> + Send + Sync>;

/// Wrap a closure as an [`Extension`].
pub fn extension<F>(f: F) -> Extension
where
    F: Fn(CheckCollection) -> Result<CheckCollection> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Check orchestrator for a single plugin.
pub struct Checks {
    context: CheckContext,
    repository: Arc<CheckRepository>,
    extensions: Vec<Extension>,
    all: OnceLock<CheckCollection>,
}

impl Checks {
    pub fn new(context: CheckContext, repository: Arc<CheckRepository>) -> Self {
        Self {
            context,
            repository,
            extensions: Vec::new(),
            all: OnceLock::new(),
        }
    }

    /// Register an extension applied when the available checks are first
    /// resolved.
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn with_extensions(mut self, extensions: &[Extension]) -> Self {
        self.extensions.extend(extensions.iter().cloned());
        self
    }

    pub fn context(&self) -> &CheckContext {
        &self.context
    }

    /// Every available check, experimental ones included. Resolved once.
    pub fn get_checks(&self) -> Result<&CheckCollection> {
        if let Some(all) = self.all.get() {
            return Ok(all);
        }

        let mut all = self
            .repository
            .get_checks(CheckFlags::ALL | CheckFlags::INCLUDE_EXPERIMENTAL);
        for extension in &self.extensions {
            all = extension(all)?;
        }
        // Extensions may insert checks that never went through registration.
        if let Some((slug, _)) = all.iter().find(|(_, c)| c.categories().is_empty()) {
            return Err(Error::MissingCategories {
                slug: slug.to_string(),
            });
        }

        Ok(self.all.get_or_init(|| all))
    }

    /// Run the requested checks and return their findings.
    pub fn run_checks(&self, slugs: &[String]) -> Result<CheckResult> {
        let mut result = CheckResult::new(self.context.clone());
        self.run_checks_into(slugs, &mut result)?;
        Ok(result)
    }

    /// Run the requested checks, accumulating into `result`.
    ///
    /// Unknown slugs are ignored. The first failing check aborts the run;
    /// findings recorded so far stay in `result`.
    pub fn run_checks_into(&self, slugs: &[String], result: &mut CheckResult) -> Result<()> {
        let all = self.get_checks()?;
        let mut seen: Vec<&str> = Vec::with_capacity(slugs.len());

        for slug in slugs {
            if seen.contains(&slug.as_str()) {
                continue;
            }
            seen.push(slug);
            let Some(check) = all.get(slug) else {
                tracing::debug!("ignoring unknown check {}", slug);
                continue;
            };

            if let Err(e) = self.run_check(slug, check.as_ref(), result) {
                tracing::warn!(
                    "check {} aborted the run with {} errors and {} warnings recorded",
                    slug,
                    result.error_count(),
                    result.warning_count()
                );
                return Err(e);
            }
        }
        Ok(())
    }

    fn run_check(&self, slug: &str, check: &dyn Check, result: &mut CheckResult) -> Result<()> {
        let span = tracing::info_span!("check", slug = %slug);
        let _enter = span.enter();
        tracing::debug!("running");

        let failed = |source: Error| Error::CheckFailed {
            slug: slug.to_string(),
            source: Box::new(source),
        };

        match check.as_preparation() {
            Some(preparation) => {
                let cleanup = preparation.prepare()?;
                guarded(cleanup, || check.run(result).map_err(failed))
            }
            None => check.run(result).map_err(failed),
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
