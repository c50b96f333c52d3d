// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory host for tests and embedders.
//!
//! Every piece of host state lives in process memory, including a fake
//! enqueue registry that answers simulated requests. Only the drop-in file
//! under `content_dir` touches the filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dashmap::{DashMap, DashSet};

use super::{
    EnqueuedAsset, EnvironmentType, Filters, Host, PostData, SimulatedRequest, active_plugins,
};
use crate::error::{Error, Result};
use crate::plugin::PluginHeader;

/// Table names created by the install routine, without prefix.
pub(crate) const CORE_TABLES: &[&str] = &[
    "commentmeta",
    "comments",
    "links",
    "options",
    "postmeta",
    "posts",
    "term_relationships",
    "term_taxonomy",
    "termmeta",
    "terms",
    "usermeta",
    "users",
];

struct RegisteredAsset {
    plugin: String,
    only_on: Option<String>,
    asset: EnqueuedAsset,
}

struct StoredPost {
    prefix: String,
    data: PostData,
}

/// Host whose state is entirely in memory.
pub struct MemoryHost {
    plugins_dir: PathBuf,
    content_dir: PathBuf,
    plugins_url: String,
    home_url: String,
    environment: EnvironmentType,
    plugins: BTreeMap<String, PluginHeader>,
    theme: String,
    post_types: Vec<String>,
    assets: Vec<RegisteredAsset>,
    requests: bool,
    nonces: Vec<(String, String)>,
    site_prefix: String,
    filters: Filters,
    prefix: Mutex<String>,
    active: DashMap<String, Vec<String>>,
    tables: DashSet<String>,
    theme_dirs: DashSet<PathBuf>,
    posts: DashMap<u64, StoredPost>,
    next_post_id: AtomicU64,
    inserts: AtomicUsize,
    fail_insert_at: Option<usize>,
    fail_delete: bool,
    dispatched: Mutex<Vec<String>>,
}

impl MemoryHost {
    /// A fresh installed site with prefix `wp_` rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let site_prefix = "wp_".to_string();
        let tables = DashSet::new();
        for table in CORE_TABLES {
            tables.insert(format!("{}{}", site_prefix, table));
        }
        let active = DashMap::new();
        active.insert(site_prefix.clone(), Vec::new());

        Self {
            plugins_dir: root.join("wp-content").join("plugins"),
            content_dir: root.join("wp-content"),
            plugins_url: "http://example.org/wp-content/plugins".to_string(),
            home_url: "http://example.org".to_string(),
            environment: EnvironmentType::Production,
            plugins: BTreeMap::new(),
            theme: "twentytwentyfour".to_string(),
            post_types: vec!["post".to_string(), "page".to_string()],
            assets: Vec::new(),
            requests: true,
            nonces: Vec::new(),
            prefix: Mutex::new(site_prefix.clone()),
            site_prefix,
            filters: Filters::new(),
            active,
            tables,
            theme_dirs: DashSet::new(),
            posts: DashMap::new(),
            next_post_id: AtomicU64::new(1),
            inserts: AtomicUsize::new(0),
            fail_insert_at: None,
            fail_delete: false,
            dispatched: Mutex::new(Vec::new()),
        }
    }

    /// Register an installed plugin.
    pub fn with_plugin(mut self, basename: impl Into<String>, header: PluginHeader) -> Self {
        self.plugins.insert(basename.into(), header);
        self
    }

    /// Set the stored active plugins of the site.
    pub fn with_active_plugins(self, plugins: &[&str]) -> Self {
        self.active.insert(
            self.site_prefix.clone(),
            plugins.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentType) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_post_types(mut self, post_types: &[&str]) -> Self {
        self.post_types = post_types.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Enqueue `asset` on every request while `plugin` is active.
    pub fn with_asset(mut self, plugin: impl Into<String>, asset: EnqueuedAsset) -> Self {
        self.assets.push(RegisteredAsset {
            plugin: plugin.into(),
            only_on: None,
            asset,
        });
        self
    }

    /// Enqueue `asset` only when `url` is dispatched while `plugin` is active.
    pub fn with_asset_on(
        mut self,
        plugin: impl Into<String>,
        url: impl Into<String>,
        asset: EnqueuedAsset,
    ) -> Self {
        self.assets.push(RegisteredAsset {
            plugin: plugin.into(),
            only_on: Some(url.into()),
            asset,
        });
        self
    }

    /// Make the host unable to simulate requests.
    pub fn without_requests(mut self) -> Self {
        self.requests = false;
        self
    }

    /// Accept `nonce` for `action`.
    pub fn with_nonce(mut self, action: impl Into<String>, nonce: impl Into<String>) -> Self {
        self.nonces.push((action.into(), nonce.into()));
        self
    }

    /// Fail the `n`-th post insertion (zero-based).
    pub fn failing_insert_at(mut self, n: usize) -> Self {
        self.fail_insert_at = Some(n);
        self
    }

    /// Fail every post deletion.
    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    fn current_prefix(&self) -> MutexGuard<'_, String> {
        self.prefix.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ids of all posts currently stored.
    pub fn post_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.posts.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of post insertions attempted so far.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// URLs dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether `dir` is a registered theme directory.
    pub fn has_theme_directory(&self, dir: &Path) -> bool {
        self.theme_dirs.contains(dir)
    }
}

impl Host for MemoryHost {
    fn plugins_dir(&self) -> PathBuf {
        self.plugins_dir.clone()
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
        Ok(self.plugins.clone())
    }

    fn stored_active_plugins(&self) -> Result<Vec<String>> {
        let prefix = self.current_prefix().clone();
        Ok(self
            .active
            .get(&prefix)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    fn set_stored_active_plugins(&self, plugins: &[String]) -> Result<()> {
        let prefix = self.current_prefix().clone();
        if !self.tables.contains(&format!("{}options", prefix)) {
            return Err(Error::Host(format!("no options table under prefix {}", prefix)));
        }
        self.active.insert(prefix, plugins.to_vec());
        Ok(())
    }

    fn stored_theme(&self) -> String {
        self.theme.clone()
    }

    fn filters(&self) -> &Filters {
        &self.filters
    }

    fn register_theme_directory(&self, dir: &Path) -> bool {
        self.theme_dirs.insert(dir.to_path_buf())
    }

    fn deregister_theme_directory(&self, dir: &Path) {
        self.theme_dirs.remove(dir);
    }

    fn site_prefix(&self) -> String {
        self.site_prefix.clone()
    }

    fn table_prefix(&self) -> String {
        self.current_prefix().clone()
    }

    fn set_table_prefix(&self, prefix: &str) -> Result<String> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::Host(format!("invalid table prefix: {:?}", prefix)));
        }
        let mut current = self.current_prefix();
        Ok(std::mem::replace(&mut *current, prefix.to_string()))
    }

    fn tables(&self, prefix: &str) -> Result<Vec<String>> {
        let mut tables: Vec<String> = self
            .tables
            .iter()
            .filter(|t| {
                t.strip_prefix(prefix)
                    .is_some_and(|rest| CORE_TABLES.contains(&rest))
            })
            .map(|t| t.key().clone())
            .collect();
        tables.sort();
        Ok(tables)
    }

    fn install(&self) -> Result<()> {
        let prefix = self.current_prefix().clone();
        for table in CORE_TABLES {
            self.tables.insert(format!("{}{}", prefix, table));
        }
        self.active.entry(prefix).or_default();
        Ok(())
    }

    fn drop_table(&self, table: &str) -> Result<()> {
        self.tables.remove(table);
        if let Some(prefix) = table.strip_suffix("options") {
            self.active.remove(prefix);
        }
        Ok(())
    }

    fn insert_post(&self, post: &PostData) -> Result<u64> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert_at == Some(n) {
            return Err(Error::Host(format!("could not insert {} post", post.post_type)));
        }
        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst);
        self.posts.insert(
            id,
            StoredPost {
                prefix: self.current_prefix().clone(),
                data: post.clone(),
            },
        );
        Ok(id)
    }

    fn delete_post(&self, id: u64) -> Result<()> {
        if self.fail_delete {
            return Err(Error::Host(format!("could not delete post {}", id)));
        }
        match self.posts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::Host(format!("post {} does not exist", id))),
        }
    }

    fn find_post(&self, post_type: &str) -> Result<Option<u64>> {
        let prefix = self.current_prefix().clone();
        Ok(self
            .posts
            .iter()
            .filter(|e| {
                e.value().prefix == prefix
                    && e.value().data.post_type == post_type
                    && e.value().data.status == "publish"
            })
            .map(|e| *e.key())
            .max())
    }

    fn permalink(&self, id: u64) -> Result<String> {
        if !self.posts.contains_key(&id) {
            return Err(Error::Host(format!("post {} does not exist", id)));
        }
        Ok(format!("{}/?p={}", self.home_url, id))
    }

    fn public_post_types(&self) -> Vec<String> {
        self.post_types.clone()
    }

    fn supports_requests(&self) -> bool {
        self.requests
    }

    fn dispatch(&self, request: &SimulatedRequest) -> Result<Vec<EnqueuedAsset>> {
        if !self.requests {
            return Err(Error::Host("request simulation is disabled".to_string()));
        }
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.url.clone());

        let active = active_plugins(self)?;
        Ok(self
            .assets
            .iter()
            .filter(|a| active.contains(&a.plugin))
            .filter(|a| a.only_on.as_ref().is_none_or(|url| url == &request.url))
            .map(|a| a.asset.clone())
            .collect())
    }

    fn verify_nonce(&self, nonce: &str, action: &str) -> bool {
        self.nonces.iter().any(|(a, n)| a == action && n == nonce)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
