// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dedicated database tables and object-cache drop-in for runtime checks.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::host::Host;

/// Drop-in installed as `object-cache.php` so runtime checks can switch
/// the table prefix before WordPress loads its options.
pub const OBJECT_CACHE_DROPIN: &str = r#"<?php
/**
 * Plugin Name: Plugin Check Object Cache Drop-In
 * Description: Switches to the plugin check tables during runtime checks.
 *
 * Installed and removed by plugin-check. Do not edit.
 */
if ( defined( 'WP_PLUGIN_CHECK_TABLE_PREFIX' ) && isset( $_COOKIE['wp_plugin_check_checks'] ) ) {
	$GLOBALS['table_prefix'] = WP_PLUGIN_CHECK_TABLE_PREFIX;
}
"#;

const DROPIN_FILE: &str = "object-cache.php";

/// Sets up and tears down the environment runtime checks run in.
pub struct RuntimeEnvironmentSetup {
    host: Arc<dyn Host>,
    prefix: String,
}

impl RuntimeEnvironmentSetup {
    pub fn new(host: Arc<dyn Host>, prefix: impl Into<String>) -> Self {
        Self {
            host,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn dropin_path(&self) -> PathBuf {
        self.host.content_dir().join(DROPIN_FILE)
    }

    /// Install the scoped tables (if missing) and the drop-in (if absent).
    ///
    /// The current prefix is restored before returning, also on failure.
    pub fn set_up(&self) -> Result<()> {
        let active = self.host.stored_active_plugins()?;
        let previous = self.host.set_table_prefix(&self.prefix)?;

        let installed = self.install_tables(&active);
        self.host.set_table_prefix(&previous)?;
        installed?;

        let dropin = self.dropin_path();
        if !dropin.exists() {
            std::fs::write(&dropin, OBJECT_CACHE_DROPIN).map_err(|e| Error::io(&dropin, e))?;
            tracing::debug!("installed {}", dropin.display());
        }
        Ok(())
    }

    fn install_tables(&self, active: &[String]) -> Result<()> {
        if !self.host.tables(&self.prefix)?.is_empty() {
            return Ok(());
        }
        tracing::debug!("installing tables under prefix {}", self.prefix);
        self.host.install()?;
        self.host.set_stored_active_plugins(active)
    }

    /// Drop the scoped tables and remove the drop-in if it is the one
    /// [`set_up`](Self::set_up) installs.
    ///
    /// The prefix current on entry is kept, unless it is the scoped prefix
    /// whose tables were just dropped; then the site prefix is restored.
    pub fn clean_up(&self) -> Result<()> {
        let mut previous = self.host.table_prefix();
        if previous == self.prefix {
            previous = self.host.site_prefix();
        }
        for table in self.host.tables(&self.prefix)? {
            self.host.drop_table(&table)?;
        }
        self.host.set_table_prefix(&previous)?;

        let dropin = self.dropin_path();
        match std::fs::read(&dropin) {
            Ok(content) if content == OBJECT_CACHE_DROPIN.as_bytes() => {
                std::fs::remove_file(&dropin).map_err(|e| Error::io(&dropin, e))?;
                tracing::debug!("removed {}", dropin.display());
            }
            Ok(_) => tracing::debug!("leaving foreign {} in place", dropin.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&dropin, e)),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runtime_environment_tests.rs"]
mod tests;
