// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Readme presence and fields.

use std::path::Path;

use crate::categories::Category;
use crate::check::{Check, ExecutionMode};
use crate::error::Result;
use crate::plugin::PluginHeader;
use crate::readme::{Readme, ReadmeWarning, find_readme};
use crate::result::{CheckResult, MessageArgs};

use super::main_header;

/// Maximum length of one upgrade notice, in characters.
pub const MAX_UPGRADE_NOTICE: usize = 300;

const DEFAULT_SHORT_DESCRIPTION: &str = "Here is a short description of the plugin.";
const DEFAULT_TAG: &str = "tag1";
const DEFAULT_DONATE_LINK: &str = "http://example.com/";

/// Fragments of GPL-compatible license names.
const COMPATIBLE_LICENSES: &[&str] = &[
    "gpl",
    "gnu",
    "mit",
    "freebsd",
    "new bsd",
    "bsd-3-clause",
    "bsd 3 clause",
    "openldap",
    "expat",
];

/// Comparable form of a license name: `GPLv2 or later` and
/// `GPL-2.0-or-later` both become `gpl2+`.
pub fn normalize_license(license: &str) -> String {
    let lower = license
        .to_lowercase()
        .replace("gnu general public license", "gpl")
        .replace("or later", "+")
        .replace("or-later", "+")
        .replace("-only", "")
        .replace(".0", "")
        .replace("version", "");
    lower
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '+')
        .collect::<String>()
        .replace("gplv", "gpl")
}

pub fn is_compatible_license(license: &str) -> bool {
    let lower = license.to_lowercase();
    COMPATIBLE_LICENSES.iter().any(|l| lower.contains(l))
}

pub struct PluginReadmeCheck;

impl PluginReadmeCheck {
    fn check_default_text(readme: &Readme, file: &Path, result: &mut CheckResult) {
        let is_default = readme.short_description == DEFAULT_SHORT_DESCRIPTION
            || readme.tags.iter().any(|t| t == DEFAULT_TAG)
            || readme.donate_link == DEFAULT_DONATE_LINK;
        if is_default {
            result.add_error(
                "The readme appears to contain default text.",
                MessageArgs::new("default_readme_text").file(file),
            );
        }
    }

    fn check_license(
        readme: &Readme,
        header: &PluginHeader,
        file: &Path,
        result: &mut CheckResult,
    ) {
        if readme.license.is_empty() {
            result.add_error(
                "Your plugin has no license declared. Please update your readme with a GPLv2 (or later) compatible license.",
                MessageArgs::new("no_license").file(file),
            );
            return;
        }
        if !is_compatible_license(&readme.license) {
            result.add_error(
                "Your plugin has an invalid license declared. Please update your readme with a valid SPDX license identifier.",
                MessageArgs::new("invalid_license").file(file),
            );
            return;
        }
        if !header.license.is_empty()
            && normalize_license(&header.license) != normalize_license(&readme.license)
        {
            result.add_warning(
                format!(
                    "Your plugin has a different license declared in the readme file (\"{}\") and plugin header (\"{}\").",
                    readme.license, header.license
                ),
                MessageArgs::new("license_mismatch").file(file),
            );
        }
    }

    fn check_stable_tag(
        readme: &Readme,
        header: &PluginHeader,
        file: &Path,
        result: &mut CheckResult,
    ) {
        let stable_tag = readme.stable_tag.trim();
        if stable_tag.is_empty() {
            result.add_error(
                "Invalid or missing Stable Tag. Your Stable Tag is meant to be the stable version of your plugin and it needs to be exactly the same as the Version in your main plugin file's header.",
                MessageArgs::new("no_stable_tag").file(file),
            );
        } else if stable_tag.eq_ignore_ascii_case("trunk") {
            result.add_error(
                "It's recommended not to use 'Stable Tag: trunk'.",
                MessageArgs::new("trunk_stable_tag").file(file),
            );
        } else if !header.version.is_empty() && stable_tag != header.version {
            result.add_error(
                format!(
                    "The Stable Tag in your readme file (\"{}\") does not match the version in your main plugin file (\"{}\").",
                    stable_tag, header.version
                ),
                MessageArgs::new("stable_tag_mismatch").file(file),
            );
        }
    }
}

impl Check for PluginReadmeCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Static
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PLUGIN_REPO]
    }

    fn description(&self) -> &str {
        "Checks adherence to the readme requirements."
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/wordpress-org/how-your-readme-txt-works/"
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let context = result.context().clone();
        if context.is_single_file() {
            return Ok(());
        }

        let Some(path) = find_readme(&context.path("")) else {
            result.add_error(
                "The plugin readme.txt does not exist.",
                MessageArgs::new("no_plugin_readme").file("readme.txt"),
            );
            return Ok(());
        };
        let readme = Readme::read(&path)?;
        let header = main_header(&context)?;
        let file = path.as_path();

        for warning in &readme.warnings {
            let is_error = *warning == ReadmeWarning::InvalidPluginNameHeader;
            result.add_message(
                is_error,
                warning.message(),
                MessageArgs::new(warning.code()).file(file),
            );
        }

        Self::check_default_text(&readme, file, result);
        Self::check_license(&readme, &header, file, result);
        Self::check_stable_tag(&readme, &header, file, result);

        if !readme.name.is_empty() && !header.name.is_empty() && readme.name != header.name {
            result.add_warning(
                format!(
                    "Plugin name \"{}\" is different from the name declared in plugin header \"{}\".",
                    readme.name, header.name
                ),
                MessageArgs::new("mismatched_plugin_name").file(file),
            );
        }

        for (version, notice) in &readme.upgrade_notice {
            if notice.chars().count() > MAX_UPGRADE_NOTICE {
                result.add_warning(
                    format!(
                        "The upgrade notice for \"{}\" exceeds the limit of {} characters.",
                        version, MAX_UPGRADE_NOTICE
                    ),
                    MessageArgs::new("upgrade_notice_limit").file(file),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "plugin_readme_tests.rs"]
mod tests;
