// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reversible environment preparations.
//!
//! A [`Preparation`] mutates host state and hands back a [`Cleanup`] that
//! undoes the mutation. A cleanup runs exactly once: when [`Cleanup::run`]
//! is called, or otherwise when it is dropped (including during unwinding).

mod demo_posts;
mod force_single_plugin;
mod minimal_theme;
mod runtime_environment;
mod universal;

use std::sync::Arc;

use serde_json::Value;

pub use demo_posts::DemoPostsCreation;
pub use force_single_plugin::ForceSinglePlugin;
pub use minimal_theme::{MINIMAL_THEME, UseMinimalTheme};
pub use runtime_environment::{OBJECT_CACHE_DROPIN, RuntimeEnvironmentSetup};
pub use universal::UniversalRuntimePreparation;

use crate::error::Result;
use crate::host::Host;

/// A reversible change to the environment.
pub trait Preparation: Send + Sync {
    fn prepare(&self) -> Result<Cleanup>;
}

type CleanupFn = Box<dyn FnOnce() -> Result<()> + Send>;

/// Undo action for a preparation.
#[must_use = "dropping a Cleanup runs it immediately"]
pub struct Cleanup {
    label: &'static str,
    action: Option<CleanupFn>,
}

impl Cleanup {
    pub fn new<F>(label: &'static str, action: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self {
            label,
            action: Some(Box::new(action)),
        }
    }

    /// A cleanup with nothing to undo.
    pub fn noop() -> Self {
        Self {
            label: "noop",
            action: None,
        }
    }

    /// Combine cleanups into one that runs them in reverse order.
    ///
    /// Every part runs even if an earlier one fails; the first error wins.
    pub fn chain(label: &'static str, parts: Vec<Cleanup>) -> Self {
        Self::new(label, move || {
            let mut first_err = None;
            for part in parts.into_iter().rev() {
                if let Err(e) = part.run() {
                    tracing::warn!("cleanup failed: {}", e);
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
            first_err.map_or(Ok(()), Err)
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_noop(&self) -> bool {
        self.action.is_none()
    }

    /// Run the cleanup now.
    pub fn run(mut self) -> Result<()> {
        match self.action.take() {
            Some(action) => {
                tracing::debug!("cleanup {}", self.label);
                action()
            }
            None => Ok(()),
        }
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            tracing::debug!("cleanup {} on drop", self.label);
            if let Err(e) = action() {
                tracing::warn!("cleanup {} failed: {}", self.label, e);
            }
        }
    }
}

impl std::fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cleanup")
            .field("label", &self.label)
            .field("pending", &self.action.is_some())
            .finish()
    }
}

/// Run `f`, then `cleanup`, whatever `f` returned.
///
/// An error from `f` takes precedence over a cleanup error.
pub fn guarded<T>(cleanup: Cleanup, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let outcome = f();
    let label = cleanup.label();
    match (outcome, cleanup.run()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_err)) => {
            tracing::warn!("cleanup {} failed: {}", label, cleanup_err);
            Err(e)
        }
    }
}

/// Builds a preparation from its arguments.
pub type PreparationFactory = fn(&Value, &Arc<dyn Host>) -> Result<Box<dyn Preparation>>;

/// A preparation request that is deduplicated across checks.
#[derive(Clone)]
pub struct SharedPreparation {
    pub name: &'static str,
    pub args: Value,
    pub factory: PreparationFactory,
}

/// Identity of a shared preparation request.
///
/// `serde_json` maps keep their keys sorted, so equal arguments always
/// serialize the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SharedPreparationKey {
    pub name: &'static str,
    pub args: String,
}

impl SharedPreparation {
    pub fn key(&self) -> SharedPreparationKey {
        SharedPreparationKey {
            name: self.name,
            args: self.args.to_string(),
        }
    }

    pub fn build(&self, host: &Arc<dyn Host>) -> Result<Box<dyn Preparation>> {
        (self.factory)(&self.args, host)
    }
}

impl std::fmt::Debug for SharedPreparation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPreparation")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
