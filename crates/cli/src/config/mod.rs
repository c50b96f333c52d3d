// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles plugin-check.toml parsing with version validation and unknown key
//! warnings.

mod parse;
mod suggest;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::host::EnvironmentType;
use parse::{
    parse_check_config, parse_linter_config, parse_runtime_config, parse_wordpress_config,
    warn_unknown_key,
};

pub use suggest::suggest_check_name;

/// Supported config file version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Config file name looked up during discovery.
pub const CONFIG_FILE: &str = "plugin-check.toml";

/// Default table prefix runtime checks run under.
pub const DEFAULT_TABLE_PREFIX: &str = "wppc_";

/// Default size above which an enqueued asset is reported, in bytes.
pub const DEFAULT_ASSET_SIZE_THRESHOLD: u64 = 300_000;

/// Minimum config structure for version checking.
#[derive(Deserialize)]
struct VersionOnly {
    version: Option<i64>,
}

/// Config with flexible parsing that captures unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    version: i64,

    #[serde(default)]
    wordpress: Option<toml::Value>,

    #[serde(default)]
    runtime: Option<toml::Value>,

    #[serde(default)]
    linter: Option<toml::Value>,

    #[serde(default)]
    check: Option<toml::Value>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// The WordPress install to check plugins of.
    pub wordpress: WordPressConfig,

    /// Runtime environment settings.
    pub runtime: RuntimeConfig,

    /// External linter settings.
    pub linter: LinterConfig,

    /// Per-check settings.
    pub check: CheckConfig,
}

/// `[wordpress]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordPressConfig {
    /// Install root, relative paths resolved against the config file.
    pub root: Option<PathBuf>,

    pub environment_type: Option<EnvironmentType>,

    /// Public URL of the site; plugin URLs derive from it.
    pub home_url: Option<String>,

    /// Public URL of the plugins directory.
    pub plugins_url: Option<String>,
}

/// `[runtime]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Table prefix of the scoped runtime tables.
    pub table_prefix: String,

    /// Directory holding the minimal theme.
    pub theme_root: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            theme_root: None,
        }
    }
}

/// `[linter]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LinterConfig {
    /// phpcs executable, a path or a name looked up on `PATH`.
    pub phpcs: String,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            phpcs: "phpcs".to_string(),
        }
    }
}

/// `[check.*]` sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckConfig {
    pub enqueued_scripts_size: AssetSizeConfig,
    pub enqueued_styles_size: AssetSizeConfig,
    pub file_type: FileTypeConfig,
    pub code_obfuscation: CodeObfuscationConfig,
    pub trademarks: TrademarksConfig,
}

/// `[check.enqueued_scripts_size]` and `[check.enqueued_styles_size]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSizeConfig {
    /// Size above which an asset is reported, in bytes.
    pub threshold: u64,
}

impl Default for AssetSizeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ASSET_SIZE_THRESHOLD,
        }
    }
}

/// `[check.file_type]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTypeConfig {
    /// File kinds to look for; all when unset.
    pub types: Option<Vec<String>>,

    /// Directory names whose contents are not checked.
    pub ignore_directories: Option<Vec<String>>,
}

/// `[check.code_obfuscation]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeObfuscationConfig {
    /// Obfuscators to look for; all when unset.
    pub tools: Option<Vec<String>>,
}

/// `[check.trademarks]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrademarksConfig {
    /// Terms reported in addition to the built-in list.
    pub extra_terms: Vec<String>,
}

/// Known top-level keys in the config.
const KNOWN_KEYS: &[&str] = &["version", "wordpress", "runtime", "linter", "check"];

/// Load and validate config from a file path.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&content, path)
}

/// Load config with warnings for unknown keys.
pub fn load_with_warnings(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_with_warnings(&content, path)
}

fn config_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Config {
        message: message.into(),
        path: Some(path.to_path_buf()),
    }
}

/// Parse config from string content, rejecting any unsupported version.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let version_check: VersionOnly =
        toml::from_str(content).map_err(|e| config_error(path, e.to_string()))?;

    let version = version_check
        .version
        .ok_or_else(|| config_error(path, "missing required field: version"))?;

    if version != SUPPORTED_VERSION {
        return Err(config_error(
            path,
            format!(
                "unsupported config version {} (supported: {})\n  Upgrade plugin-check to use this config.",
                version, SUPPORTED_VERSION
            ),
        ));
    }

    parse_sections(content, path, false)
}

/// Parse config, warning on unknown keys.
pub fn parse_with_warnings(content: &str, path: &Path) -> Result<Config> {
    parse(content, path)?;
    parse_sections(content, path, true)
}

fn parse_sections(content: &str, path: &Path, warn: bool) -> Result<Config> {
    let flexible: FlexibleConfig =
        toml::from_str(content).map_err(|e| config_error(path, e.to_string()))?;

    if warn {
        for key in flexible.unknown.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn_unknown_key(path, key);
            }
        }
    }

    let base = path.parent().unwrap_or(Path::new(""));
    Ok(Config {
        version: flexible.version,
        wordpress: parse_wordpress_config(flexible.wordpress.as_ref(), base, path, warn)?,
        runtime: parse_runtime_config(flexible.runtime.as_ref(), base, path, warn)?,
        linter: parse_linter_config(flexible.linter.as_ref(), path, warn),
        check: parse_check_config(flexible.check.as_ref(), path, warn),
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
