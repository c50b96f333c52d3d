// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check categories.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::collection::CheckCollection;

/// A category slug.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const GENERAL: Category = Category(Cow::Borrowed("general"));
    pub const PLUGIN_REPO: Category = Category(Cow::Borrowed("plugin_repo"));
    pub const SECURITY: Category = Category(Cow::Borrowed("security"));
    pub const PERFORMANCE: Category = Category(Cow::Borrowed("performance"));
    pub const ACCESSIBILITY: Category = Category(Cow::Borrowed("accessibility"));

    pub fn new(slug: impl Into<String>) -> Self {
        Category(Cow::Owned(slug.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(slug: &str) -> Self {
        Category::new(slug.trim())
    }
}

/// Built-in categories with their labels.
pub const DEFAULT: &[(Category, &str)] = &[
    (Category::GENERAL, "General"),
    (Category::PLUGIN_REPO, "Plugin Repo"),
    (Category::SECURITY, "Security"),
    (Category::PERFORMANCE, "Performance"),
    (Category::ACCESSIBILITY, "Accessibility"),
];

/// The category vocabulary of a run.
#[derive(Debug, Clone, Default)]
pub struct Categories {
    overridden: Option<Vec<(Category, String)>>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the vocabulary outright.
    pub fn with_override(categories: Vec<(Category, String)>) -> Self {
        Self {
            overridden: Some(categories),
        }
    }

    /// Category slugs in display order.
    pub fn all(&self) -> Vec<Category> {
        match &self.overridden {
            Some(list) => list.iter().map(|(c, _)| c.clone()).collect(),
            None => DEFAULT.iter().map(|(c, _)| c.clone()).collect(),
        }
    }

    /// Human label of a category, falling back to its slug.
    pub fn label(&self, category: &Category) -> String {
        let found = match &self.overridden {
            Some(list) => list
                .iter()
                .find(|(c, _)| c == category)
                .map(|(_, l)| l.clone()),
            None => DEFAULT
                .iter()
                .find(|(c, _)| c == category)
                .map(|(_, l)| l.to_string()),
        };
        found.unwrap_or_else(|| category.to_string())
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.all().contains(category)
    }
}

/// Keep checks sharing at least one category with `categories`.
pub fn filter_checks_by_categories(
    collection: &CheckCollection,
    categories: &[Category],
) -> CheckCollection {
    collection.filter(|check, _| check.categories().iter().any(|c| categories.contains(c)))
}

#[cfg(test)]
#[path = "categories_tests.rs"]
mod tests;
