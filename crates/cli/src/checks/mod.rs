// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in checks.
//!
//! Static checks:
//! - file_type: forbidden files and directories
//! - code_obfuscation: encoder signatures in PHP files
//! - trademarks: restricted terms in the plugin name and slug
//! - plugin_readme: readme presence and fields
//! - plugin_header_fields: main file header fields
//! - no_unfiltered_uploads: `ALLOW_UNFILTERED_UPLOADS` definitions
//! - phpcs-backed rules (see [`phpcs::RULES`])
//!
//! Runtime checks:
//! - enqueued_scripts_size / enqueued_styles_size
//! - enqueued_scripts_scope / enqueued_styles_scope (experimental)

pub mod code_obfuscation;
pub mod enqueued_assets;
pub mod file_type;
pub mod no_unfiltered_uploads;
pub mod phpcs;
pub mod plugin_header_fields;
pub mod plugin_readme;
pub mod trademarks;

use std::sync::Arc;

use crate::check::CheckContext;
use crate::config::Config;
use crate::error::Result;
use crate::host::{AssetKind, Host};
use crate::linter::Linter;
use crate::plugin::{PluginHeader, read_header};
use crate::repository::CheckRepository;
use crate::walker::{FileWalker, Walked, WalkedFile, WalkerConfig};

use code_obfuscation::{CodeObfuscationCheck, ObfuscationTools};
use enqueued_assets::{EnqueuedAssetsScopeCheck, EnqueuedAssetsSizeCheck};
use file_type::{FileTypeCheck, FileTypes};
use no_unfiltered_uploads::NoUnfilteredUploadsCheck;
use phpcs::PhpcsCheck;
use plugin_header_fields::PluginHeaderFieldsCheck;
use plugin_readme::PluginReadmeCheck;
use trademarks::TrademarksCheck;

/// Slugs of the built-in checks, static checks first.
pub fn check_names() -> Vec<&'static str> {
    let mut names = vec![
        "file_type",
        "code_obfuscation",
        "trademarks",
        "plugin_readme",
        "plugin_header_fields",
        "no_unfiltered_uploads",
    ];
    names.extend(phpcs::RULES.iter().map(|r| r.slug));
    names.extend([
        "enqueued_scripts_size",
        "enqueued_styles_size",
        "enqueued_scripts_scope",
        "enqueued_styles_scope",
    ]);
    names
}

/// Repository of every built-in check, configured from `config`.
pub fn default_repository(
    config: &Config,
    host: &Arc<dyn Host>,
    linter: Arc<dyn Linter>,
) -> Result<CheckRepository> {
    let checks = &config.check;
    let mut repository = CheckRepository::new();

    let file_types = match &checks.file_type.types {
        Some(names) => FileTypes::from_names(names)?,
        None => FileTypes::ALL,
    };
    let mut walker = WalkerConfig::default();
    if let Some(dirs) = &checks.file_type.ignore_directories {
        walker.ignore_directories = dirs.clone();
    }
    repository.register_check(
        "file_type",
        FileTypeCheck::new(file_types, host.environment_type()).with_walker(walker),
    )?;

    let tools = match &checks.code_obfuscation.tools {
        Some(names) => ObfuscationTools::from_names(names)?,
        None => ObfuscationTools::ALL,
    };
    repository.register_check("code_obfuscation", CodeObfuscationCheck::new(tools)?)?;
    repository.register_check(
        "trademarks",
        TrademarksCheck::new(&checks.trademarks.extra_terms)?,
    )?;
    repository.register_check("plugin_readme", PluginReadmeCheck)?;
    repository.register_check("plugin_header_fields", PluginHeaderFieldsCheck)?;
    repository.register_check("no_unfiltered_uploads", NoUnfilteredUploadsCheck::new()?)?;

    for rule in phpcs::RULES {
        repository.register_check(rule.slug, PhpcsCheck::new(rule, Arc::clone(&linter)))?;
    }

    repository.register_check(
        "enqueued_scripts_size",
        EnqueuedAssetsSizeCheck::new(
            Arc::clone(host),
            AssetKind::Script,
            checks.enqueued_scripts_size.threshold,
        ),
    )?;
    repository.register_check(
        "enqueued_styles_size",
        EnqueuedAssetsSizeCheck::new(
            Arc::clone(host),
            AssetKind::Style,
            checks.enqueued_styles_size.threshold,
        ),
    )?;
    repository.register_check(
        "enqueued_scripts_scope",
        EnqueuedAssetsScopeCheck::new(Arc::clone(host), AssetKind::Script),
    )?;
    repository.register_check(
        "enqueued_styles_scope",
        EnqueuedAssetsScopeCheck::new(Arc::clone(host), AssetKind::Style),
    )?;

    Ok(repository)
}

/// Files of the plugin: the main file alone for single-file plugins.
pub(crate) fn plugin_files(context: &CheckContext, walker: &WalkerConfig) -> Walked {
    let root = if context.is_single_file() {
        context.main_file().to_path_buf()
    } else {
        context.path("")
    };
    FileWalker::new(walker.clone()).walk(&root)
}

/// PHP files of the plugin.
pub(crate) fn php_files(context: &CheckContext) -> Vec<WalkedFile> {
    plugin_files(context, &WalkerConfig::default())
        .files
        .into_iter()
        .filter(|f| f.has_extension("php"))
        .collect()
}

/// Content of a file checks may read, `None` when too large or unreadable.
pub(crate) fn read_source(file: &WalkedFile) -> Option<String> {
    if !file.is_readable() {
        return None;
    }
    match std::fs::read(&file.path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("cannot read {}: {}", file.path.display(), e);
            None
        }
    }
}

/// Header of the plugin main file. A file without header yields defaults.
pub(crate) fn main_header(context: &CheckContext) -> Result<PluginHeader> {
    Ok(read_header(context.main_file())?.unwrap_or_default())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
