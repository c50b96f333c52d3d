// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runner source reading the process arguments.

use super::RunnerSource;
use crate::categories::Category;
use crate::cli::CheckArgs;

/// Options that consume the following argument when not written `--opt=value`.
const VALUE_OPTIONS: &[&str] = &[
    "--checks",
    "--exclude-checks",
    "--categories",
    "--format",
    "--config",
    "-C",
    "--color",
];

/// Selection already parsed from the command line.
#[derive(Debug, Clone, Default)]
struct Selection {
    plugin: String,
    checks: Vec<String>,
    exclude: Vec<String>,
    categories: Vec<String>,
    experimental: bool,
}

/// Reads a `plugin-check check <plugin> [options]` invocation.
#[derive(Debug, Clone)]
pub struct CliSource {
    args: Vec<String>,
    selection: Option<Selection>,
}

impl CliSource {
    /// `args` includes the program name, as in `std::env::args()`.
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            selection: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::args().collect())
    }

    /// Take the plugin and check selection from parsed `check` arguments
    /// instead of scanning the raw arguments.
    pub fn with_check_args(mut self, args: &CheckArgs) -> Self {
        let list = |value: &Option<String>| value.as_deref().map(split_list).unwrap_or_default();
        self.selection = Some(Selection {
            plugin: args.plugin.clone(),
            checks: list(&args.checks),
            exclude: list(&args.exclude_checks),
            categories: list(&args.categories),
            experimental: args.include_experimental,
        });
        self
    }

    /// Positional arguments after the program name.
    fn positionals(&self) -> Vec<&str> {
        let mut positionals = Vec::new();
        let mut iter = self.args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if VALUE_OPTIONS.contains(&arg.as_str()) {
                iter.next();
            } else if !arg.starts_with('-') {
                positionals.push(arg.as_str());
            }
        }
        positionals
    }

    fn option(&self, name: &str) -> Option<String> {
        let long = format!("--{}", name);
        let prefix = format!("{}=", long);
        let mut iter = self.args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = arg.strip_prefix(&prefix) {
                return Some(value.to_string());
            }
            if *arg == long {
                return iter.next().cloned();
            }
        }
        None
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.option(name)
            .map(|value| split_list(&value))
            .unwrap_or_default()
    }

    fn flag(&self, name: &str) -> bool {
        let long = format!("--{}", name);
        self.args.iter().any(|a| *a == long)
    }
}

/// Split a comma-separated list, dropping empty items.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl RunnerSource for CliSource {
    fn is_plugin_check(&self) -> bool {
        self.positionals().first() == Some(&"check")
    }

    fn plugin_input(&self) -> Option<String> {
        if let Some(selection) = &self.selection {
            return Some(selection.plugin.clone());
        }
        let positionals = self.positionals();
        match positionals.as_slice() {
            ["check", plugin, ..] => Some(plugin.to_string()),
            _ => None,
        }
    }

    fn check_slugs(&self) -> Vec<String> {
        match &self.selection {
            Some(selection) => selection.checks.clone(),
            None => self.list("checks"),
        }
    }

    fn exclude_slugs(&self) -> Vec<String> {
        match &self.selection {
            Some(selection) => selection.exclude.clone(),
            None => self.list("exclude-checks"),
        }
    }

    fn categories(&self) -> Vec<Category> {
        let names = match &self.selection {
            Some(selection) => selection.categories.clone(),
            None => self.list("categories"),
        };
        names.into_iter().map(Category::new).collect()
    }

    fn include_experimental(&self) -> bool {
        match &self.selection {
            Some(selection) => selection.experimental,
            None => self.flag("include-experimental"),
        }
    }

    fn manages_environment(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
