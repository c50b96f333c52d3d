// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! AJAX entry point: the admin screen drives a run in four requests.
//!
//! 1. `plugin_check_set_up_environment` installs the runtime environment.
//! 2. `plugin_check_get_checks_to_run` lists the checks for the plugin.
//! 3. `plugin_check_run_checks` runs them (one request per batch).
//! 4. `plugin_check_clean_up_environment` removes the runtime environment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{CheckRunner, RunnerSettings, RunnerSource};
use crate::categories::Category;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::preparation::RuntimeEnvironmentSetup;
use crate::repository::CheckRepository;

/// Nonce action every request must carry a valid nonce for.
pub const NONCE_ACTION: &str = "plugin-check-run-checks";

pub const SET_UP_ENVIRONMENT: &str = "plugin_check_set_up_environment";
pub const GET_CHECKS_TO_RUN: &str = "plugin_check_get_checks_to_run";
pub const RUN_CHECKS: &str = "plugin_check_run_checks";
pub const CLEAN_UP_ENVIRONMENT: &str = "plugin_check_clean_up_environment";

pub const ACTIONS: [&str; 4] = [
    SET_UP_ENVIRONMENT,
    GET_CHECKS_TO_RUN,
    RUN_CHECKS,
    CLEAN_UP_ENVIRONMENT,
];

/// Fields of an AJAX request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AjaxRequest {
    pub action: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub plugin: String,
    #[serde(default)]
    pub checks: Vec<String>,
    #[serde(default)]
    pub exclude_checks: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub include_experimental: bool,
}

/// `wp_send_json_*` style response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjaxResponse {
    pub success: bool,
    pub data: Value,
}

impl AjaxResponse {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            success: false,
            data: json!({ "message": err.to_string() }),
        }
    }
}

/// Runner source backed by an AJAX request.
pub struct AjaxSource {
    request: AjaxRequest,
    host: Arc<dyn Host>,
}

impl AjaxSource {
    pub fn new(request: AjaxRequest, host: Arc<dyn Host>) -> Self {
        Self { request, host }
    }

    pub fn request(&self) -> &AjaxRequest {
        &self.request
    }
}

impl RunnerSource for AjaxSource {
    fn is_plugin_check(&self) -> bool {
        ACTIONS.contains(&self.request.action.as_str())
            && self.host.verify_nonce(&self.request.nonce, NONCE_ACTION)
    }

    fn plugin_input(&self) -> Option<String> {
        Some(self.request.plugin.clone()).filter(|p| !p.is_empty())
    }

    fn check_slugs(&self) -> Vec<String> {
        self.request.checks.clone()
    }

    fn exclude_slugs(&self) -> Vec<String> {
        self.request.exclude_checks.clone()
    }

    fn categories(&self) -> Vec<Category> {
        self.request
            .categories
            .iter()
            .map(|c| Category::from(c.as_str()))
            .collect()
    }

    fn include_experimental(&self) -> bool {
        self.request.include_experimental
    }
}

/// Dispatches AJAX requests to runners.
pub struct Ajax {
    host: Arc<dyn Host>,
    repository: Arc<CheckRepository>,
    settings: RunnerSettings,
}

impl Ajax {
    pub fn new(host: Arc<dyn Host>, repository: Arc<CheckRepository>) -> Self {
        Self {
            host,
            repository,
            settings: RunnerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Handle one request. Failures become unsuccessful responses.
    pub fn handle(&self, request: AjaxRequest) -> AjaxResponse {
        let action = request.action.clone();
        let span = tracing::debug_span!("ajax", action = %action);
        let _enter = span.enter();

        match self.dispatch(request) {
            Ok(data) => AjaxResponse::ok(data),
            Err(e) => {
                tracing::debug!("request failed: {}", e);
                AjaxResponse::error(&e)
            }
        }
    }

    /// Handle a JSON-encoded request and encode the response.
    pub fn handle_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<AjaxRequest>(body) {
            Ok(request) => self.handle(request),
            Err(e) => AjaxResponse::error(&Error::Argument(format!("invalid request: {}", e))),
        };
        serde_json::to_string(&response).unwrap_or_else(|_| {
            r#"{"success":false,"data":{"message":"unserializable response"}}"#.to_string()
        })
    }

    fn dispatch(&self, request: AjaxRequest) -> Result<Value> {
        if !ACTIONS.contains(&request.action.as_str()) {
            return Err(Error::Argument(format!("unknown action {}", request.action)));
        }
        let action = request.action.clone();
        let mut runner = CheckRunner::new(
            Arc::clone(&self.host),
            Arc::clone(&self.repository),
            AjaxSource::new(request, Arc::clone(&self.host)),
        )
        .with_settings(self.settings.clone());
        if !runner.is_plugin_check() {
            return Err(Error::Argument("invalid nonce".to_string()));
        }

        match action.as_str() {
            SET_UP_ENVIRONMENT => {
                if !runner.checks_to_run()?.has_runtime() {
                    return Ok(json!({
                        "message": "No runtime checks, runtime environment was not set up."
                    }));
                }
                self.environment().set_up()?;
                Ok(json!({ "message": "Runtime environment set up successfully." }))
            }
            GET_CHECKS_TO_RUN => {
                let checks = runner.checks_to_run()?;
                Ok(json!({
                    "plugin": runner.plugin_basename()?,
                    "checks": checks.slugs(),
                }))
            }
            RUN_CHECKS => {
                let result = runner.execute()?;
                Ok(json!({
                    "message": "Checks run successfully.",
                    "errors": result.errors(),
                    "warnings": result.warnings(),
                }))
            }
            _ => {
                if !runner.checks_to_run()?.has_runtime() {
                    return Ok(json!({
                        "message": "No runtime checks, runtime environment was not cleaned up."
                    }));
                }
                self.environment().clean_up()?;
                Ok(json!({ "message": "Runtime environment cleaned up successfully." }))
            }
        }
    }

    fn environment(&self) -> RuntimeEnvironmentSetup {
        RuntimeEnvironmentSetup::new(
            Arc::clone(&self.host),
            self.settings.testing_prefix.clone(),
        )
    }
}

#[cfg(test)]
#[path = "ajax_tests.rs"]
mod tests;
