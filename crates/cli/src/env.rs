// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable names and accessors.

/// Generated env var name constants.
pub mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

/// Name of the variable holding the tracing filter.
pub fn log_var() -> &'static str {
    names::PLUGIN_CHECK_LOG
}

/// WordPress root override, if set and non-empty.
pub fn wp_root() -> Option<std::path::PathBuf> {
    std::env::var_os(names::PLUGIN_CHECK_WP_ROOT)
        .filter(|v| !v.is_empty())
        .map(std::path::PathBuf::from)
}

/// Environment type override (`WP_ENVIRONMENT_TYPE`), if set.
pub fn environment_type() -> Option<String> {
    std::env::var(names::WP_ENVIRONMENT_TYPE)
        .ok()
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
