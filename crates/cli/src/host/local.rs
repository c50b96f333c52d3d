// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Host backed by a WordPress install on the local filesystem.
//!
//! Plugins, the content directory and the configured table prefix are read
//! from disk. Everything the process would otherwise change in the database
//! (prefix switches, installed tables, posts, active plugins) is tracked in
//! process so that preparations can apply and undo it. Front-end requests
//! cannot be simulated without a PHP runtime.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use regex::Regex;

use super::memory::CORE_TABLES;
use super::{EnqueuedAsset, EnvironmentType, Filters, Host, PostData, SimulatedRequest};
use crate::error::{Error, Result};
use crate::plugin::{PluginHeader, discover_plugins};

#[allow(clippy::expect_used)]
static TABLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$table_prefix\s*=\s*['"]([A-Za-z0-9_]+)['"]\s*;"#).expect("valid regex")
});

const DEFAULT_PREFIX: &str = "wp_";

#[derive(Default)]
struct State {
    prefix: String,
    tables: BTreeSet<String>,
    active: BTreeMap<String, Vec<String>>,
    posts: BTreeMap<u64, (String, PostData)>,
    next_post_id: u64,
    theme_dirs: BTreeSet<PathBuf>,
}

/// A WordPress install rooted at a directory.
pub struct LocalHost {
    root: PathBuf,
    content_dir: PathBuf,
    home_url: String,
    plugins_url: String,
    environment: EnvironmentType,
    theme: String,
    site_prefix: String,
    filters: Filters,
    state: Mutex<State>,
}

/// Read `$table_prefix` from a `wp-config.php` body.
pub fn parse_table_prefix(config: &str) -> Option<String> {
    TABLE_PREFIX
        .captures(config)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

impl LocalHost {
    /// Open the install at `root`.
    ///
    /// `root` must contain `wp-content/plugins`. The site prefix comes from
    /// `wp-config.php` when present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let content_dir = root.join("wp-content");
        if !content_dir.join("plugins").is_dir() {
            return Err(Error::Config {
                message: format!(
                    "{} does not look like a WordPress install (no wp-content/plugins)",
                    root.display()
                ),
                path: None,
            });
        }

        let config_path = root.join("wp-config.php");
        let site_prefix = match std::fs::read_to_string(&config_path) {
            Ok(body) => parse_table_prefix(&body).unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DEFAULT_PREFIX.to_string(),
            Err(e) => return Err(Error::io(config_path, e)),
        };
        tracing::debug!("opened {} with table prefix {}", root.display(), site_prefix);

        let mut state = State {
            prefix: site_prefix.clone(),
            next_post_id: 1,
            ..State::default()
        };
        for table in CORE_TABLES {
            state.tables.insert(format!("{}{}", site_prefix, table));
        }
        state.active.insert(site_prefix.clone(), Vec::new());

        Ok(Self {
            root,
            content_dir,
            home_url: "http://localhost".to_string(),
            plugins_url: "http://localhost/wp-content/plugins".to_string(),
            environment: EnvironmentType::Production,
            theme: "twentytwentyfour".to_string(),
            site_prefix,
            filters: Filters::new(),
            state: Mutex::new(state),
        })
    }

    pub fn with_environment(mut self, environment: EnvironmentType) -> Self {
        self.environment = environment;
        self
    }

    /// Set the home URL; the plugins URL follows unless set explicitly.
    pub fn with_home_url(mut self, url: &str) -> Self {
        let url = url.trim_end_matches('/');
        self.home_url = url.to_string();
        self.plugins_url = format!("{}/wp-content/plugins", url);
        self
    }

    pub fn with_plugins_url(mut self, url: &str) -> Self {
        self.plugins_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Seed the site's stored active plugins.
    pub fn with_active_plugins(self, plugins: Vec<String>) -> Self {
        {
            let mut state = self.state();
            let prefix = self.site_prefix.clone();
            state.active.insert(prefix, plugins);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Host for LocalHost {
    fn plugins_dir(&self) -> PathBuf {
        self.content_dir.join("plugins")
    }

    fn plugins_url(&self) -> String {
        self.plugins_url.clone()
    }

    fn home_url(&self) -> String {
        self.home_url.clone()
    }

    fn content_dir(&self) -> PathBuf {
        self.content_dir.clone()
    }

    fn environment_type(&self) -> EnvironmentType {
        self.environment
    }

    fn installed_plugins(&self) -> Result<BTreeMap<String, PluginHeader>> {
        discover_plugins(&self.plugins_dir())
    }

    fn stored_active_plugins(&self) -> Result<Vec<String>> {
        let state = self.state();
        Ok(state.active.get(&state.prefix).cloned().unwrap_or_default())
    }

    fn set_stored_active_plugins(&self, plugins: &[String]) -> Result<()> {
        let mut state = self.state();
        let prefix = state.prefix.clone();
        if !state.tables.contains(&format!("{}options", prefix)) {
            return Err(Error::Host(format!("no options table under prefix {}", prefix)));
        }
        state.active.insert(prefix, plugins.to_vec());
        Ok(())
    }

    fn stored_theme(&self) -> String {
        self.theme.clone()
    }

    fn filters(&self) -> &Filters {
        &self.filters
    }

    fn register_theme_directory(&self, dir: &Path) -> bool {
        self.state().theme_dirs.insert(dir.to_path_buf())
    }

    fn deregister_theme_directory(&self, dir: &Path) {
        self.state().theme_dirs.remove(dir);
    }

    fn site_prefix(&self) -> String {
        self.site_prefix.clone()
    }

    fn table_prefix(&self) -> String {
        self.state().prefix.clone()
    }

    fn set_table_prefix(&self, prefix: &str) -> Result<String> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::Host(format!("invalid table prefix: {:?}", prefix)));
        }
        let mut state = self.state();
        Ok(std::mem::replace(&mut state.prefix, prefix.to_string()))
    }

    fn tables(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .state()
            .tables
            .iter()
            .filter(|t| {
                t.strip_prefix(prefix)
                    .is_some_and(|rest| CORE_TABLES.contains(&rest))
            })
            .cloned()
            .collect())
    }

    fn install(&self) -> Result<()> {
        let mut state = self.state();
        let prefix = state.prefix.clone();
        for table in CORE_TABLES {
            state.tables.insert(format!("{}{}", prefix, table));
        }
        state.active.entry(prefix).or_default();
        Ok(())
    }

    fn drop_table(&self, table: &str) -> Result<()> {
        let mut state = self.state();
        state.tables.remove(table);
        if let Some(prefix) = table.strip_suffix("options") {
            state.active.remove(prefix);
        }
        Ok(())
    }

    fn insert_post(&self, post: &PostData) -> Result<u64> {
        let mut state = self.state();
        let id = state.next_post_id;
        state.next_post_id += 1;
        let prefix = state.prefix.clone();
        state.posts.insert(id, (prefix, post.clone()));
        Ok(id)
    }

    fn delete_post(&self, id: u64) -> Result<()> {
        match self.state().posts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::Host(format!("post {} does not exist", id))),
        }
    }

    fn find_post(&self, post_type: &str) -> Result<Option<u64>> {
        let state = self.state();
        Ok(state
            .posts
            .iter()
            .rev()
            .find(|(_, (prefix, post))| {
                *prefix == state.prefix && post.post_type == post_type && post.status == "publish"
            })
            .map(|(id, _)| *id))
    }

    fn permalink(&self, id: u64) -> Result<String> {
        if !self.state().posts.contains_key(&id) {
            return Err(Error::Host(format!("post {} does not exist", id)));
        }
        Ok(format!("{}/?p={}", self.home_url, id))
    }

    fn public_post_types(&self) -> Vec<String> {
        vec!["post".to_string(), "page".to_string()]
    }

    fn supports_requests(&self) -> bool {
        false
    }

    fn dispatch(&self, request: &SimulatedRequest) -> Result<Vec<EnqueuedAsset>> {
        Err(Error::Host(format!(
            "cannot dispatch {} without a PHP runtime",
            request.url
        )))
    }

    fn verify_nonce(&self, _nonce: &str, _action: &str) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
