// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filter hooks that intercept host value resolution.
//!
//! Preparations install filters to change what the host reports (active
//! plugins, active theme) and remove them again by id on cleanup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Host values that can be filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// The list of active plugin basenames.
    ActivePlugins,
    /// The parent theme directory name.
    Template,
    /// The child (or only) theme directory name.
    Stylesheet,
}

/// A value passed through a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
}

/// Handle returned by [`Filters::add`], used to remove the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(u64);

type FilterFn = Box<dyn Fn(FilterValue) -> FilterValue + Send + Sync>;

struct Entry {
    id: FilterId,
    hook: Hook,
    callback: FilterFn,
}

/// Registry of installed filters, applied in insertion order.
///
/// Callbacks run while the registry is locked and must not touch it.
#[derive(Default)]
pub struct Filters {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a filter on `hook`.
    pub fn add<F>(&self, hook: Hook, callback: F) -> FilterId
    where
        F: Fn(FilterValue) -> FilterValue + Send + Sync + 'static,
    {
        let id = FilterId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries().push(Entry {
            id,
            hook,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a filter. Returns false if it was not installed.
    pub fn remove(&self, id: FilterId) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Run `value` through every filter on `hook`.
    pub fn apply(&self, hook: Hook, value: FilterValue) -> FilterValue {
        self.entries()
            .iter()
            .filter(|e| e.hook == hook)
            .fold(value, |acc, e| (e.callback)(acc))
    }

    /// Filter a text value; a filter returning a list leaves it unchanged.
    pub fn apply_text(&self, hook: Hook, value: String) -> String {
        match self.apply(hook, FilterValue::Text(value.clone())) {
            FilterValue::Text(text) => text,
            FilterValue::List(_) => value,
        }
    }

    /// Filter a list value; a filter returning text leaves it unchanged.
    pub fn apply_list(&self, hook: Hook, value: Vec<String>) -> Vec<String> {
        match self.apply(hook, FilterValue::List(value.clone())) {
            FilterValue::List(list) => list,
            FilterValue::Text(_) => value,
        }
    }

    /// Number of filters installed on `hook`.
    pub fn count(&self, hook: Hook) -> usize {
        self.entries().iter().filter(|e| e.hook == hook).count()
    }

    /// True if no filter is installed on any hook.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl std::fmt::Debug for Filters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks: Vec<Hook> = self.entries().iter().map(|e| e.hook).collect();
        f.debug_struct("Filters").field("hooks", &hooks).finish()
    }
}

#[cfg(test)]
#[path = "filters_tests.rs"]
mod tests;
