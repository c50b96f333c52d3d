// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The WordPress host runtime boundary.
//!
//! Checks and preparations never talk to WordPress directly. They go through
//! [`Host`], which exposes the handful of services a check run needs:
//! installed plugins, filters over plugin/theme resolution, the database
//! table prefix, demo content, and simulated front-end requests.

mod filters;
mod local;
mod memory;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use filters::{FilterId, FilterValue, Filters, Hook};
pub use local::LocalHost;
pub use memory::MemoryHost;

use crate::error::{Error, Result};
use crate::plugin::PluginHeader;

/// `wp_get_environment_type()` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
    Local,
    Development,
    Staging,
    #[default]
    Production,
}

impl FromStr for EnvironmentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(Error::Config {
                message: format!("unknown environment type: {}", other),
                path: None,
            }),
        }
    }
}

/// Data for a post to insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostData {
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub status: String,
}

impl PostData {
    /// A published demo post of the given type.
    pub fn demo(post_type: impl Into<String>) -> Self {
        let post_type = post_type.into();
        Self {
            title: format!("Demo {} post", post_type),
            content: "Test content".to_string(),
            status: "publish".to_string(),
            post_type,
        }
    }
}

/// A front-end request to dispatch through the host's routing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedRequest {
    pub url: String,
}

impl SimulatedRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Kind of an enqueued asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Style,
}

/// An asset observed in the enqueue registry after a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueuedAsset {
    pub handle: String,
    pub kind: AssetKind,
    /// Source URL as registered.
    pub src: String,
    /// Local file backing the asset, when the host could map it.
    pub path: Option<PathBuf>,
    /// File size plus inline code size, in bytes.
    pub size: u64,
}

/// Services consumed from the WordPress host runtime.
///
/// Methods take `&self`: host state is process-wide and implementations
/// use interior mutability. Whoever changes host state through this trait
/// is responsible for restoring it.
pub trait Host: Send + Sync {
    /// Absolute path of the plugins directory.
    fn plugins_dir(&self) -> PathBuf;

    /// Public URL of the plugins directory, without trailing slash.
    fn plugins_url(&self) -> String;

    /// Public home URL, without trailing slash.
    fn home_url(&self) -> String;

    /// Absolute path of the content directory (drop-ins live here).
    fn content_dir(&self) -> PathBuf;

    fn environment_type(&self) -> EnvironmentType;

    /// Installed plugins keyed by basename.
    fn installed_plugins(&self) -> Result<BTreeMap<String, PluginHeader>>;

    /// The stored `active_plugins` option, before filters.
    fn stored_active_plugins(&self) -> Result<Vec<String>>;

    /// Overwrite the stored `active_plugins` option under the current prefix.
    fn set_stored_active_plugins(&self, plugins: &[String]) -> Result<()>;

    /// The stored theme directory name, before filters.
    fn stored_theme(&self) -> String;

    fn filters(&self) -> &Filters;

    /// Add a theme search directory. Returns false if it was already known.
    fn register_theme_directory(&self, dir: &Path) -> bool;

    fn deregister_theme_directory(&self, dir: &Path);

    /// The table prefix that identifies the site's own tables.
    fn site_prefix(&self) -> String;

    /// The table prefix currently in use.
    fn table_prefix(&self) -> String;

    /// Switch the table prefix, returning the previous one.
    fn set_table_prefix(&self, prefix: &str) -> Result<String>;

    /// Tables that exist under `prefix`.
    fn tables(&self, prefix: &str) -> Result<Vec<String>>;

    /// Run the install routine against the current prefix.
    fn install(&self) -> Result<()>;

    fn drop_table(&self, table: &str) -> Result<()>;

    /// Insert a post, returning its id.
    fn insert_post(&self, post: &PostData) -> Result<u64>;

    /// Permanently delete a post.
    fn delete_post(&self, id: u64) -> Result<()>;

    /// Most recent published post of a type, if any.
    fn find_post(&self, post_type: &str) -> Result<Option<u64>>;

    fn permalink(&self, id: u64) -> Result<String>;

    /// Publicly viewable post types.
    fn public_post_types(&self) -> Vec<String>;

    /// Whether [`Host::dispatch`] can simulate front-end requests.
    fn supports_requests(&self) -> bool;

    /// Dispatch a request as a visitor would and report the enqueued assets.
    ///
    /// Global request state is reset before each dispatch.
    fn dispatch(&self, request: &SimulatedRequest) -> Result<Vec<EnqueuedAsset>>;

    fn verify_nonce(&self, nonce: &str, action: &str) -> bool;
}

/// Active plugins as the site sees them, after filters.
pub fn active_plugins(host: &dyn Host) -> Result<Vec<String>> {
    let stored = host.stored_active_plugins()?;
    Ok(host.filters().apply_list(Hook::ActivePlugins, stored))
}

/// Active parent theme, after filters.
pub fn template(host: &dyn Host) -> String {
    host.filters().apply_text(Hook::Template, host.stored_theme())
}

/// Active child theme, after filters.
pub fn stylesheet(host: &dyn Host) -> String {
    host.filters().apply_text(Hook::Stylesheet, host.stored_theme())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
