// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Main file header fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::categories::Category;
use crate::check::{Check, ExecutionMode};
use crate::error::Result;
use crate::result::{CheckResult, MessageArgs};

use super::main_header;

#[allow(clippy::expect_used)]
static WP_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("valid regex"));

#[allow(clippy::expect_used)]
static PHP_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){1,2}$").expect("valid regex"));

#[allow(clippy::expect_used)]
static PLUGIN_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*([-+][0-9A-Za-z.\-]+)?$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static PLUGIN_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

fn is_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    rest.is_some_and(|r| {
        let host = r.split(['/', '?', '#']).next().unwrap_or_default();
        !host.is_empty() && host.contains('.') && !host.contains(char::is_whitespace)
    })
}

fn same_url(a: &str, b: &str) -> bool {
    let normalize = |u: &str| {
        u.trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.")
            .trim_end_matches('/')
            .to_lowercase()
    };
    normalize(a) == normalize(b)
}

pub struct PluginHeaderFieldsCheck;

impl Check for PluginHeaderFieldsCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PLUGIN_REPO]
    }

    fn description(&self) -> &str {
        "Checks adherence to the plugin header requirements."
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/plugin-basics/header-requirements/"
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let context = result.context().clone();
        let header = main_header(&context)?;
        let args = |code: &str| MessageArgs::new(code).file(context.main_file());

        if header.name.is_empty() {
            result.add_error(
                "The \"Plugin Name\" header is missing in the main plugin file.",
                args("plugin_header_no_name"),
            );
        }

        if header.version.is_empty() {
            result.add_error(
                "The \"Version\" header is missing in the main plugin file.",
                args("plugin_header_no_version"),
            );
        } else if !PLUGIN_VERSION.is_match(&header.version) {
            result.add_error(
                format!(
                    "The \"Version\" header in the main plugin file must be a version number such as 1.0.0. Found \"{}\".",
                    header.version
                ),
                args("plugin_header_invalid_version"),
            );
        }

        if !header.requires_wp.is_empty() && !WP_VERSION.is_match(&header.requires_wp) {
            result.add_error(
                format!(
                    "The \"Requires at least\" header must be a WordPress version such as 6.5. Found \"{}\".",
                    header.requires_wp
                ),
                args("plugin_header_invalid_requires_wp"),
            );
        }

        if !header.requires_php.is_empty() && !PHP_VERSION.is_match(&header.requires_php) {
            result.add_error(
                format!(
                    "The \"Requires PHP\" header must be a PHP version such as 7.4. Found \"{}\".",
                    header.requires_php
                ),
                args("plugin_header_invalid_requires_php"),
            );
        }

        if let Some(invalid) = header
            .requires_plugins
            .iter()
            .find(|slug| !PLUGIN_SLUG.is_match(slug))
        {
            result.add_warning(
                format!(
                    "The \"Requires Plugins\" header must be a comma-separated list of plugin slugs. Found \"{}\".",
                    invalid
                ),
                args("plugin_header_invalid_requires_plugins"),
            );
        }

        if !header.plugin_uri.is_empty() && !is_url(&header.plugin_uri) {
            result.add_warning(
                format!("The \"Plugin URI\" header is not a valid URL. Found \"{}\".", header.plugin_uri),
                args("plugin_header_invalid_plugin_uri"),
            );
        }
        if !header.author_uri.is_empty() && !is_url(&header.author_uri) {
            result.add_warning(
                format!("The \"Author URI\" header is not a valid URL. Found \"{}\".", header.author_uri),
                args("plugin_header_invalid_author_uri"),
            );
        }
        if !header.plugin_uri.is_empty()
            && !header.author_uri.is_empty()
            && same_url(&header.plugin_uri, &header.author_uri)
        {
            result.add_warning(
                "The \"Plugin URI\" and \"Author URI\" headers must be different.",
                args("plugin_header_same_plugin_author_uri"),
            );
        }

        if !header.update_uri.is_empty() {
            result.add_error(
                "Plugin Updater detected. Use of the Update URI header is not allowed in plugins hosted on WordPress.org.",
                args("plugin_header_update_uri_not_allowed"),
            );
        }

        if header.license.is_empty() {
            result.add_warning(
                "The \"License\" header is missing in the main plugin file.",
                args("plugin_header_no_license"),
            );
        }

        if !header.text_domain.is_empty() && header.text_domain != context.slug() {
            result.add_warning(
                format!(
                    "The \"Text Domain\" header in the main plugin file does not match the plugin slug. Found \"{}\", expected \"{}\".",
                    header.text_domain,
                    context.slug()
                ),
                args("textdomain_mismatch"),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "plugin_header_fields_tests.rs"]
mod tests;
