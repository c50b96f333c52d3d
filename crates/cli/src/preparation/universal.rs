// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::sync::Arc;

use super::{Cleanup, ForceSinglePlugin, Preparation, UseMinimalTheme};
use crate::error::Result;
use crate::host::Host;

/// Preparation every run with runtime checks needs: the minimal theme and
/// the plugin under test as the only active plugin.
pub struct UniversalRuntimePreparation {
    theme: UseMinimalTheme,
    single_plugin: ForceSinglePlugin,
}

impl UniversalRuntimePreparation {
    pub fn new(host: Arc<dyn Host>, basename: impl Into<String>) -> Self {
        Self {
            theme: UseMinimalTheme::new(Arc::clone(&host)),
            single_plugin: ForceSinglePlugin::new(host, basename),
        }
    }

    pub fn with_theme_root(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.theme = self.theme.with_theme_root(dir);
        }
        self
    }

    pub fn keeping(mut self, tool_basename: Option<String>) -> Self {
        if let Some(tool) = tool_basename {
            self.single_plugin = self.single_plugin.keeping(tool);
        }
        self
    }
}

impl Preparation for UniversalRuntimePreparation {
    fn prepare(&self) -> Result<Cleanup> {
        let theme = self.theme.prepare()?;
        match self.single_plugin.prepare() {
            Ok(single_plugin) => Ok(Cleanup::chain(
                "universal_runtime_preparation",
                vec![theme, single_plugin],
            )),
            Err(e) => {
                if let Err(cleanup_err) = theme.run() {
                    tracing::warn!("theme cleanup failed: {}", cleanup_err);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "universal_tests.rs"]
mod tests;
