// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered, immutable sets of checks keyed by slug.

use std::sync::Arc;

use crate::check::Check;
use crate::error::{Error, Result};

/// An ordered slug → check mapping.
///
/// Every transform returns a new collection and leaves the receiver as is.
#[derive(Clone, Default)]
pub struct CheckCollection {
    entries: Vec<(String, Arc<dyn Check>)>,
}

impl CheckCollection {
    /// Build a collection, rejecting duplicate slugs.
    pub fn new(entries: Vec<(String, Arc<dyn Check>)>) -> Result<Self> {
        for (i, (slug, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(s, _)| s == slug) {
                return Err(Error::DuplicateCheck { slug: slug.clone() });
            }
        }
        Ok(Self { entries })
    }

    /// Build from entries already known to be unique.
    pub(crate) fn from_unique(entries: Vec<(String, Arc<dyn Check>)>) -> Self {
        Self { entries }
    }

    /// Checks in order.
    pub fn to_vec(&self) -> Vec<Arc<dyn Check>> {
        self.entries.iter().map(|(_, c)| Arc::clone(c)).collect()
    }

    /// Slug → check pairs in order.
    pub fn to_map(&self) -> &[(String, Arc<dyn Check>)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Check>)> {
        self.entries.iter().map(|(s, c)| (s.as_str(), c))
    }

    pub fn slugs(&self) -> Vec<String> {
        self.entries.iter().map(|(s, _)| s.clone()).collect()
    }

    /// Keep checks matching `predicate(check, slug)`.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&dyn Check, &str) -> bool,
    {
        Self::from_unique(
            self.entries
                .iter()
                .filter(|(slug, check)| predicate(check.as_ref(), slug))
                .cloned()
                .collect(),
        )
    }

    /// Keep only the given slugs, in collection order. Unknown slugs are
    /// ignored; an empty list keeps everything.
    pub fn include(&self, slugs: &[String]) -> Self {
        if slugs.is_empty() {
            return self.clone();
        }
        self.filter(|_, slug| slugs.iter().any(|s| s == slug))
    }

    /// Drop the given slugs; an empty list keeps everything.
    pub fn exclude(&self, slugs: &[String]) -> Self {
        if slugs.is_empty() {
            return self.clone();
        }
        self.filter(|_, slug| !slugs.iter().any(|s| s == slug))
    }

    /// Fail with [`Error::UnknownCheck`] for the first absent slug.
    pub fn require(&self, slugs: &[String]) -> Result<Self> {
        if let Some(missing) = slugs.iter().find(|s| self.get(s).is_none()) {
            return Err(Error::UnknownCheck(missing.clone()));
        }
        Ok(self.clone())
    }

    /// Add a check, or replace the check already registered under `slug`.
    pub fn insert(&self, slug: impl Into<String>, check: Arc<dyn Check>) -> Self {
        let slug = slug.into();
        let mut entries = self.entries.clone();
        match entries.iter_mut().find(|(s, _)| *s == slug) {
            Some(entry) => entry.1 = check,
            None => entries.push((slug, check)),
        }
        Self::from_unique(entries)
    }

    pub fn get(&self, slug: &str) -> Option<&Arc<dyn Check>> {
        self.entries.iter().find(|(s, _)| s == slug).map(|(_, c)| c)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &Arc<dyn Check>)> {
        self.entries.get(index).map(|(s, c)| (s.as_str(), c))
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any check needs a live site.
    pub fn has_runtime(&self) -> bool {
        self.entries.iter().any(|(_, c)| c.is_runtime())
    }
}

impl std::fmt::Debug for CheckCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(s, _)| s)).finish()
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
