// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of available checks, partitioned by execution mode.

use std::ops::BitOr;
use std::sync::Arc;

use crate::check::{Check, ExecutionMode};
use crate::collection::CheckCollection;
use crate::error::{Error, Result};

/// Selects which checks [`CheckRepository::get_checks`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckFlags(u8);

impl CheckFlags {
    pub const STATIC: CheckFlags = CheckFlags(0b001);
    pub const RUNTIME: CheckFlags = CheckFlags(0b010);
    pub const ALL: CheckFlags = CheckFlags(0b011);
    pub const INCLUDE_EXPERIMENTAL: CheckFlags = CheckFlags(0b100);

    pub fn contains(self, other: CheckFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Same selection with experimental checks included or not.
    pub fn with_experimental(self, include: bool) -> CheckFlags {
        if include {
            self | Self::INCLUDE_EXPERIMENTAL
        } else {
            CheckFlags(self.0 & !Self::INCLUDE_EXPERIMENTAL.0)
        }
    }
}

impl Default for CheckFlags {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for CheckFlags {
    type Output = CheckFlags;

    fn bitor(self, rhs: CheckFlags) -> CheckFlags {
        CheckFlags(self.0 | rhs.0)
    }
}

type Entries = Vec<(String, Arc<dyn Check>)>;

/// All registered checks.
#[derive(Default)]
pub struct CheckRepository {
    static_checks: Entries,
    runtime_checks: Entries,
}

impl CheckRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check under a globally unique slug.
    pub fn register_check<C: Check + 'static>(&mut self, slug: &str, check: C) -> Result<()> {
        self.register_arc(slug, Arc::new(check))
    }

    pub fn register_arc(&mut self, slug: &str, check: Arc<dyn Check>) -> Result<()> {
        if self.contains(slug) {
            return Err(Error::DuplicateCheck {
                slug: slug.to_string(),
            });
        }
        if check.categories().is_empty() {
            return Err(Error::MissingCategories {
                slug: slug.to_string(),
            });
        }

        let partition = match check.execution_mode() {
            ExecutionMode::Static => &mut self.static_checks,
            ExecutionMode::Runtime => &mut self.runtime_checks,
        };
        partition.push((slug.to_string(), check));
        tracing::debug!("registered check {}", slug);
        Ok(())
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.static_checks
            .iter()
            .chain(&self.runtime_checks)
            .any(|(s, _)| s == slug)
    }

    pub fn len(&self) -> usize {
        self.static_checks.len() + self.runtime_checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks selected by `flags`: static before runtime, registration
    /// order within each. Experimental checks only with
    /// [`CheckFlags::INCLUDE_EXPERIMENTAL`].
    pub fn get_checks(&self, flags: CheckFlags) -> CheckCollection {
        let experimental = flags.contains(CheckFlags::INCLUDE_EXPERIMENTAL);
        let mut entries = Vec::new();
        if flags.contains(CheckFlags::STATIC) {
            entries.extend(self.static_checks.iter().cloned());
        }
        if flags.contains(CheckFlags::RUNTIME) {
            entries.extend(self.runtime_checks.iter().cloned());
        }
        entries.retain(|(_, check)| experimental || !check.is_experimental());
        CheckCollection::from_unique(entries)
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
