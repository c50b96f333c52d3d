// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::{Cleanup, Preparation};
use crate::error::{Error, Result};
use crate::host::{FilterValue, Host, Hook};

/// Makes the plugin under test the only active plugin.
///
/// The checker itself stays active when it is installed as a plugin.
pub struct ForceSinglePlugin {
    host: Arc<dyn Host>,
    basename: String,
    tool_basename: Option<String>,
}

impl ForceSinglePlugin {
    pub fn new(host: Arc<dyn Host>, basename: impl Into<String>) -> Self {
        Self {
            host,
            basename: basename.into(),
            tool_basename: None,
        }
    }

    /// Keep `basename` active alongside the target when it is installed.
    pub fn keeping(mut self, basename: impl Into<String>) -> Self {
        self.tool_basename = Some(basename.into());
        self
    }
}

impl Preparation for ForceSinglePlugin {
    fn prepare(&self) -> Result<Cleanup> {
        let installed = self.host.installed_plugins()?;
        if !installed.contains_key(&self.basename) {
            return Err(Error::Preparation {
                name: "force_single_plugin",
                message: format!("invalid plugin {}: plugin does not exist", self.basename),
            });
        }

        let mut forced = Vec::new();
        if let Some(tool) = &self.tool_basename
            && installed.contains_key(tool)
            && *tool != self.basename
        {
            forced.push(tool.clone());
        }
        forced.push(self.basename.clone());

        let target = self.basename.clone();
        let id = self.host.filters().add(Hook::ActivePlugins, move |value| match value {
            FilterValue::List(active) if active.contains(&target) => FilterValue::List(forced.clone()),
            other => other,
        });
        tracing::debug!("forcing {} as the only active plugin", self.basename);

        let host = Arc::clone(&self.host);
        Ok(Cleanup::new("force_single_plugin", move || {
            host.filters().remove(id);
            Ok(())
        }))
    }
}

#[cfg(test)]
#[path = "force_single_plugin_tests.rs"]
mod tests;
