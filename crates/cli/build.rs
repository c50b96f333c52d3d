// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Build script that generates env var name constants for `env.rs`.

// Build scripts should panic on failure; there is no meaningful recovery.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("env_names.rs");

    let contents = r#"
/// Environment variable: disables color output (any value).
pub const NO_COLOR: &str = "NO_COLOR";
/// Environment variable: forces color output (any value).
pub const COLOR: &str = "COLOR";
/// Environment variable: indicates CI environment.
pub const CI: &str = "CI";
/// Environment variable: configures tracing log filter.
pub const PLUGIN_CHECK_LOG: &str = "PLUGIN_CHECK_LOG";
/// Environment variable: explicit config file path.
pub const PLUGIN_CHECK_CONFIG: &str = "PLUGIN_CHECK_CONFIG";
/// Environment variable: WordPress root directory override.
pub const PLUGIN_CHECK_WP_ROOT: &str = "PLUGIN_CHECK_WP_ROOT";
/// Environment variable: WordPress environment type override.
pub const WP_ENVIRONMENT_TYPE: &str = "WP_ENVIRONMENT_TYPE";
"#;

    fs::write(dest, contents).expect("failed to write env_names.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
