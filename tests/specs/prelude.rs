//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;
use std::path::PathBuf;
use std::process::Command;

/// Environment variables that would leak the caller's setup into a spec.
const ISOLATED_VARS: &[&str] = &[
    "PLUGIN_CHECK_CONFIG",
    "PLUGIN_CHECK_WP_ROOT",
    "PLUGIN_CHECK_LOG",
    "WP_ENVIRONMENT_TYPE",
    "NO_COLOR",
    "COLOR",
];

/// Path of a fixture under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

/// The plugin-check binary with a clean environment.
pub fn plugin_check_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("plugin-check"));
    for var in ISOLATED_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// The binary run from inside the fixture WordPress install.
pub fn in_wordpress() -> Command {
    let mut cmd = plugin_check_cmd();
    cmd.current_dir(fixture("wordpress"));
    cmd
}

/// `plugin-check check <plugin> [args]` inside the fixture install.
pub fn check(plugin: &str, args: &[&str]) -> Command {
    let mut cmd = in_wordpress();
    cmd.arg("check").arg(plugin).args(args);
    cmd
}

/// Parse stdout of a finished command as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
