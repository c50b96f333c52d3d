// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for check results and listings.

pub mod json;
pub mod text;

use serde::Serialize;

use crate::categories::{Categories, Category};
use crate::check::{ExecutionMode, Stability};
use crate::collection::CheckCollection;

/// One row of `list-checks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInfo {
    pub slug: String,
    pub mode: ExecutionMode,
    pub stability: Stability,
    pub categories: Vec<Category>,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub documentation_url: String,
}

impl CheckInfo {
    pub fn from_collection(collection: &CheckCollection) -> Vec<CheckInfo> {
        collection
            .iter()
            .map(|(slug, check)| CheckInfo {
                slug: slug.to_string(),
                mode: check.execution_mode(),
                stability: check.stability(),
                categories: check.categories(),
                description: check.description().to_string(),
                documentation_url: check.documentation_url().to_string(),
            })
            .collect()
    }
}

/// One row of `list-categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub slug: Category,
    pub name: String,
}

impl CategoryInfo {
    pub fn from_categories(categories: &Categories) -> Vec<CategoryInfo> {
        categories
            .all()
            .into_iter()
            .map(|slug| CategoryInfo {
                name: categories.label(&slug),
                slug,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
