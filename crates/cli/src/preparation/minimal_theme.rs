// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::sync::Arc;

use super::{Cleanup, Preparation};
use crate::error::Result;
use crate::host::{FilterValue, Host, Hook};

/// Directory name of the bundled theme that renders nothing but the
/// standard hooks.
pub const MINIMAL_THEME: &str = "wp-empty-theme";

/// Switches the active theme to a minimal one so theme assets don't mix
/// with the plugin's.
pub struct UseMinimalTheme {
    host: Arc<dyn Host>,
    theme: String,
    theme_root: Option<PathBuf>,
}

impl UseMinimalTheme {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            theme: MINIMAL_THEME.to_string(),
            theme_root: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Register `dir` as a theme directory while prepared.
    pub fn with_theme_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_root = Some(dir.into());
        self
    }
}

impl Preparation for UseMinimalTheme {
    fn prepare(&self) -> Result<Cleanup> {
        let registered = match &self.theme_root {
            Some(dir) if self.host.register_theme_directory(dir) => Some(dir.clone()),
            _ => None,
        };

        let ids = [Hook::Template, Hook::Stylesheet].map(|hook| {
            let theme = self.theme.clone();
            self.host
                .filters()
                .add(hook, move |_| FilterValue::Text(theme.clone()))
        });
        tracing::debug!("using theme {}", self.theme);

        let host = Arc::clone(&self.host);
        Ok(Cleanup::new("use_minimal_theme", move || {
            for id in ids {
                host.filters().remove(id);
            }
            if let Some(dir) = registered {
                host.deregister_theme_directory(&dir);
            }
            Ok(())
        }))
    }
}

#[cfg(test)]
#[path = "minimal_theme_tests.rs"]
mod tests;
