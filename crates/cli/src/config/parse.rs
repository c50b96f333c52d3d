// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parse helper functions for configuration.

use std::path::{Path, PathBuf};

use super::suggest::warn_unknown_check;
use super::{
    AssetSizeConfig, CheckConfig, CodeObfuscationConfig, FileTypeConfig, LinterConfig,
    RuntimeConfig, TrademarksConfig, WordPressConfig, config_error,
};
use crate::error::Result;

/// Parse a TOML array of strings into a Vec<String>.
pub(super) fn parse_string_array(value: Option<&toml::Value>) -> Option<Vec<String>> {
    value?.as_array().map(|arr| {
        arr.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    })
}

/// Parse a TOML array of strings, returning empty vec if not found.
pub(super) fn parse_string_array_or_empty(value: Option<&toml::Value>) -> Vec<String> {
    parse_string_array(value).unwrap_or_default()
}

/// Parse a TOML string value as Option<String>.
pub(super) fn parse_string_option(value: Option<&toml::Value>) -> Option<String> {
    value.and_then(|v| v.as_str()).map(String::from)
}

/// Parse a TOML path, resolved against `base` when relative.
fn parse_path_option(value: Option<&toml::Value>, base: &Path) -> Option<PathBuf> {
    parse_string_option(value).map(|s| base.join(s))
}

/// Parse a non-negative TOML integer as Option<u64>.
pub(super) fn parse_u64_option(value: Option<&toml::Value>) -> Option<u64> {
    value
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
}

/// Warn about unknown config key.
pub(super) fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "plugin-check: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

/// Warn about keys of `section` not in `known`.
fn warn_unknown_fields(table: &toml::Table, section: &str, known: &[&str], path: &Path, warn: bool) {
    if !warn {
        return;
    }
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            warn_unknown_key(path, &format!("{}.{}", section, key));
        }
    }
}

/// Parse `[wordpress]`.
pub(super) fn parse_wordpress_config(
    value: Option<&toml::Value>,
    base: &Path,
    path: &Path,
    warn: bool,
) -> Result<WordPressConfig> {
    let Some(toml::Value::Table(t)) = value else {
        return Ok(WordPressConfig::default());
    };
    warn_unknown_fields(
        t,
        "wordpress",
        &["root", "environment_type", "home_url", "plugins_url"],
        path,
        warn,
    );

    let environment_type = match parse_string_option(t.get("environment_type")) {
        Some(s) => Some(
            s.parse()
                .map_err(|e: crate::error::Error| config_error(path, e.to_string()))?,
        ),
        None => None,
    };

    Ok(WordPressConfig {
        root: parse_path_option(t.get("root"), base),
        environment_type,
        home_url: parse_string_option(t.get("home_url")),
        plugins_url: parse_string_option(t.get("plugins_url")),
    })
}

/// Parse `[runtime]`.
pub(super) fn parse_runtime_config(
    value: Option<&toml::Value>,
    base: &Path,
    path: &Path,
    warn: bool,
) -> Result<RuntimeConfig> {
    let Some(toml::Value::Table(t)) = value else {
        return Ok(RuntimeConfig::default());
    };
    warn_unknown_fields(t, "runtime", &["table_prefix", "theme_root"], path, warn);

    let table_prefix = parse_string_option(t.get("table_prefix"))
        .unwrap_or_else(|| RuntimeConfig::default().table_prefix);
    if table_prefix.is_empty()
        || !table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(config_error(
            path,
            format!("invalid runtime.table_prefix {:?}", table_prefix),
        ));
    }

    Ok(RuntimeConfig {
        table_prefix,
        theme_root: parse_path_option(t.get("theme_root"), base),
    })
}

/// Parse `[linter]`.
pub(super) fn parse_linter_config(
    value: Option<&toml::Value>,
    path: &Path,
    warn: bool,
) -> LinterConfig {
    let Some(toml::Value::Table(t)) = value else {
        return LinterConfig::default();
    };
    warn_unknown_fields(t, "linter", &["phpcs"], path, warn);

    LinterConfig {
        phpcs: parse_string_option(t.get("phpcs")).unwrap_or_else(|| LinterConfig::default().phpcs),
    }
}

/// Known `[check.*]` tables.
pub(super) const KNOWN_CHECKS: &[&str] = &[
    "enqueued_scripts_size",
    "enqueued_styles_size",
    "file_type",
    "code_obfuscation",
    "trademarks",
];

/// Parse `[check.*]`.
pub(super) fn parse_check_config(value: Option<&toml::Value>, path: &Path, warn: bool) -> CheckConfig {
    let Some(toml::Value::Table(t)) = value else {
        return CheckConfig::default();
    };

    if warn {
        for key in t.keys() {
            if !KNOWN_CHECKS.contains(&key.as_str()) {
                warn_unknown_check(path, key);
            }
        }
    }

    let file_type = match check_section(t, "file_type") {
        Some(section) => {
            warn_unknown_fields(
                section,
                "check.file_type",
                &["types", "ignore_directories"],
                path,
                warn,
            );
            FileTypeConfig {
                types: parse_string_array(section.get("types")),
                ignore_directories: parse_string_array(section.get("ignore_directories")),
            }
        }
        None => FileTypeConfig::default(),
    };

    let code_obfuscation = match check_section(t, "code_obfuscation") {
        Some(section) => {
            warn_unknown_fields(section, "check.code_obfuscation", &["tools"], path, warn);
            CodeObfuscationConfig {
                tools: parse_string_array(section.get("tools")),
            }
        }
        None => CodeObfuscationConfig::default(),
    };

    let trademarks = match check_section(t, "trademarks") {
        Some(section) => {
            warn_unknown_fields(section, "check.trademarks", &["extra_terms"], path, warn);
            TrademarksConfig {
                extra_terms: parse_string_array_or_empty(section.get("extra_terms")),
            }
        }
        None => TrademarksConfig::default(),
    };

    CheckConfig {
        enqueued_scripts_size: parse_asset_size(t, "enqueued_scripts_size", path, warn),
        enqueued_styles_size: parse_asset_size(t, "enqueued_styles_size", path, warn),
        file_type,
        code_obfuscation,
        trademarks,
    }
}

fn check_section<'a>(check: &'a toml::Table, name: &str) -> Option<&'a toml::Table> {
    match check.get(name) {
        Some(toml::Value::Table(section)) => Some(section),
        _ => None,
    }
}

fn parse_asset_size(check: &toml::Table, name: &str, path: &Path, warn: bool) -> AssetSizeConfig {
    let Some(section) = check_section(check, name) else {
        return AssetSizeConfig::default();
    };
    warn_unknown_fields(section, &format!("check.{}", name), &["threshold"], path, warn);
    AssetSizeConfig {
        threshold: parse_u64_option(section.get("threshold"))
            .unwrap_or_else(|| AssetSizeConfig::default().threshold),
    }
}
