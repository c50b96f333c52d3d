// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring shared by the commands: config, host, linter and repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::checks::default_repository;
use crate::config::{self, Config};
use crate::discovery;
use crate::env;
use crate::error::Result;
use crate::host::{EnvironmentType, Host, LocalHost};
use crate::linter::{Linter, Phpcs};
use crate::repository::CheckRepository;
use crate::runner::RunnerSettings;

/// Resolved configuration of one invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    cwd: PathBuf,
}

impl Session {
    /// Load the config named by `explicit`, or the one discovered from `cwd`.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config_path = discovery::resolve_config(explicit, cwd)?;
        let config = match &config_path {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                config::load_with_warnings(path)?
            }
            None => {
                tracing::debug!("no config found, using defaults");
                Config::default()
            }
        };
        Ok(Self {
            config,
            config_path,
            cwd: cwd.to_path_buf(),
        })
    }

    /// The WordPress install: `PLUGIN_CHECK_WP_ROOT`, then `[wordpress] root`,
    /// else the working directory.
    pub fn wordpress_root(&self) -> PathBuf {
        env::wp_root()
            .or_else(|| self.config.wordpress.root.clone())
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// `WP_ENVIRONMENT_TYPE` overrides `[wordpress] environment_type`.
    pub fn environment_type(&self) -> Result<Option<EnvironmentType>> {
        match env::environment_type() {
            Some(value) => value.parse().map(Some),
            None => Ok(self.config.wordpress.environment_type),
        }
    }

    pub fn open_host(&self) -> Result<LocalHost> {
        let wordpress = &self.config.wordpress;
        let mut host = LocalHost::open(self.wordpress_root())?;
        if let Some(environment) = self.environment_type()? {
            host = host.with_environment(environment);
        }
        if let Some(url) = &wordpress.home_url {
            host = host.with_home_url(url);
        }
        if let Some(url) = &wordpress.plugins_url {
            host = host.with_plugins_url(url);
        }
        Ok(host)
    }

    pub fn linter(&self) -> Phpcs {
        Phpcs::new(&self.config.linter.phpcs)
    }

    pub fn runner_settings(&self) -> RunnerSettings {
        RunnerSettings {
            testing_prefix: self.config.runtime.table_prefix.clone(),
            theme_root: self.config.runtime.theme_root.clone(),
            ..RunnerSettings::default()
        }
    }

    pub fn repository(
        &self,
        host: &Arc<dyn Host>,
        linter: Arc<dyn Linter>,
    ) -> Result<CheckRepository> {
        default_repository(&self.config, host, linter)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
