// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime checks over the scripts and styles a plugin enqueues.
//!
//! Both checks visit the home page and one demo post per public post type,
//! dispatching each as a visitor request and inspecting the plugin's own
//! assets in the resulting enqueue registry.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::categories::Category;
use crate::check::{Check, CheckContext, ExecutionMode, Stability};
use crate::error::Result;
use crate::host::{AssetKind, EnqueuedAsset, Host, PostData, SimulatedRequest};
use crate::preparation::{DemoPostsCreation, SharedPreparation};
use crate::result::{CheckResult, MessageArgs};

/// Demo posts for every public post type, shared by all asset checks.
fn demo_posts(host: &dyn Host) -> SharedPreparation {
    DemoPostsCreation::shared(
        host.public_post_types()
            .into_iter()
            .map(PostData::demo)
            .collect(),
    )
}

/// Home page plus the latest post of each public post type.
pub fn urls_to_visit(host: &dyn Host) -> Result<Vec<String>> {
    let mut urls = vec![format!("{}/", host.home_url())];
    for post_type in host.public_post_types() {
        if let Some(id) = host.find_post(&post_type)? {
            urls.push(host.permalink(id)?);
        }
    }
    Ok(urls)
}

/// Whether `asset` is served from the plugin directory.
fn is_plugin_asset(asset: &EnqueuedAsset, context: &CheckContext) -> bool {
    match &asset.path {
        Some(path) => path.starts_with(context.path("")),
        None => asset.src.starts_with(&context.url("")),
    }
}

/// Location reported for `asset`: its file, or its source path decoded.
fn asset_file(asset: &EnqueuedAsset, context: &CheckContext) -> PathBuf {
    if let Some(path) = &asset.path {
        return path.clone();
    }
    let plugin_url = context.url("");
    let relative = asset.src.strip_prefix(&plugin_url).unwrap_or(&asset.src);
    let relative = relative.split(['?', '#']).next().unwrap_or_default();
    PathBuf::from(percent_decode_str(relative).decode_utf8_lossy().into_owned())
}

/// Plugin assets of `kind` enqueued by a request to `url`.
fn plugin_assets(
    host: &dyn Host,
    context: &CheckContext,
    kind: AssetKind,
    url: &str,
) -> Result<Vec<EnqueuedAsset>> {
    let assets = host.dispatch(&SimulatedRequest::new(url))?;
    Ok(assets
        .into_iter()
        .filter(|a| a.kind == kind && is_plugin_asset(a, context))
        .collect())
}

fn noun(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Script => "script",
        AssetKind::Style => "style",
    }
}

fn size_code(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Script => "EnqueuedScriptsSize.ScriptSizeGreaterThanThreshold",
        AssetKind::Style => "EnqueuedStylesSize.StyleSizeGreaterThanThreshold",
    }
}

fn scope_code(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Script => "EnqueuedScriptsScope",
        AssetKind::Style => "EnqueuedStylesScope",
    }
}

/// Warns when a page's plugin assets add up to more than a threshold.
pub struct EnqueuedAssetsSizeCheck {
    host: Arc<dyn Host>,
    kind: AssetKind,
    threshold: u64,
}

impl EnqueuedAssetsSizeCheck {
    pub fn new(host: Arc<dyn Host>, kind: AssetKind, threshold: u64) -> Self {
        Self {
            host,
            kind,
            threshold,
        }
    }
}

impl Check for EnqueuedAssetsSizeCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Runtime
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PERFORMANCE]
    }

    fn description(&self) -> &str {
        match self.kind {
            AssetKind::Script => "Checks whether the cumulative size of all scripts enqueued on a page exceeds the threshold.",
            AssetKind::Style => "Checks whether the cumulative size of all stylesheets enqueued on a page exceeds the threshold.",
        }
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/javascript/enqueuing/"
    }

    fn shared_preparations(&self) -> Vec<SharedPreparation> {
        vec![demo_posts(self.host.as_ref())]
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let context = result.context().clone();
        for url in urls_to_visit(self.host.as_ref())? {
            let _span = tracing::debug_span!("visit", url = %url).entered();
            let assets = plugin_assets(self.host.as_ref(), &context, self.kind, &url)?;
            let total: u64 = assets.iter().map(|a| a.size).sum();
            if total <= self.threshold {
                continue;
            }
            for asset in &assets {
                result.add_warning(
                    format!(
                        "This {} has a size of {} bytes which in combination with the other {}s enqueued on {} exceeds the {} size threshold of {} bytes.",
                        noun(self.kind),
                        asset.size,
                        noun(self.kind),
                        url,
                        noun(self.kind),
                        self.threshold
                    ),
                    MessageArgs::new(size_code(self.kind)).file(asset_file(asset, &context)),
                );
            }
        }
        Ok(())
    }
}

/// Warns about plugin assets enqueued on every visited page.
pub struct EnqueuedAssetsScopeCheck {
    host: Arc<dyn Host>,
    kind: AssetKind,
}

impl EnqueuedAssetsScopeCheck {
    pub fn new(host: Arc<dyn Host>, kind: AssetKind) -> Self {
        Self { host, kind }
    }
}

impl Check for EnqueuedAssetsScopeCheck {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Runtime
    }

    fn stability(&self) -> Stability {
        Stability::Experimental
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PERFORMANCE]
    }

    fn description(&self) -> &str {
        match self.kind {
            AssetKind::Script => "Checks whether any scripts are loaded on all pages, which is usually not desirable.",
            AssetKind::Style => "Checks whether any stylesheets are loaded on all pages, which is usually not desirable.",
        }
    }

    fn documentation_url(&self) -> &str {
        "https://developer.wordpress.org/plugins/javascript/enqueuing/"
    }

    fn shared_preparations(&self) -> Vec<SharedPreparation> {
        vec![demo_posts(self.host.as_ref())]
    }

    fn run(&self, result: &mut CheckResult) -> Result<()> {
        let context = result.context().clone();
        let urls = urls_to_visit(self.host.as_ref())?;

        let mut seen: BTreeMap<String, (usize, EnqueuedAsset)> = BTreeMap::new();
        for url in &urls {
            let _span = tracing::debug_span!("visit", url = %url).entered();
            let page: BTreeMap<String, EnqueuedAsset> =
                plugin_assets(self.host.as_ref(), &context, self.kind, url)?
                    .into_iter()
                    .map(|a| (a.handle.clone(), a))
                    .collect();
            for (handle, asset) in page {
                seen.entry(handle)
                    .and_modify(|(count, _)| *count += 1)
                    .or_insert((1, asset));
            }
        }

        for (count, asset) in seen.values() {
            if *count == urls.len() {
                result.add_warning(
                    format!("This {} is being loaded in all contexts.", noun(self.kind)),
                    MessageArgs::new(scope_code(self.kind)).file(asset_file(asset, &context)),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "enqueued_assets_tests.rs"]
mod tests;
