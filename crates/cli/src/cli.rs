// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::color::ColorMode;

/// Checks WordPress plugins against the plugin directory guidelines
#[derive(Parser)]
#[command(name = "plugin-check")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "PLUGIN_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run checks against a plugin
    Check(CheckArgs),
    /// List the available checks
    ListChecks(ListChecksArgs),
    /// List the check categories
    ListCategories(ListCategoriesArgs),
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Plugin slug or basename (e.g. `akismet` or `akismet/akismet.php`)
    pub plugin: String,

    /// Only run these checks (comma-separated slugs)
    #[arg(long, value_name = "SLUGS")]
    pub checks: Option<String>,

    /// Skip these checks (comma-separated slugs)
    #[arg(long, value_name = "SLUGS")]
    pub exclude_checks: Option<String>,

    /// Only run checks in these categories (comma-separated)
    #[arg(long, value_name = "CATEGORIES")]
    pub categories: Option<String>,

    /// Include experimental checks
    #[arg(long)]
    pub include_experimental: bool,

    /// Do not report warnings
    #[arg(long)]
    pub ignore_warnings: bool,

    /// Do not report errors
    #[arg(long)]
    pub ignore_errors: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args)]
pub struct ListChecksArgs {
    /// Only list checks in these categories (comma-separated)
    #[arg(long, value_name = "CATEGORIES")]
    pub categories: Option<String>,

    /// Include experimental checks
    #[arg(long)]
    pub include_experimental: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args)]
pub struct ListCategoriesArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
