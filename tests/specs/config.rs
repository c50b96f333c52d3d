//! Config discovery and environment overrides.

use crate::prelude::*;

#[test]
fn explicit_config_must_exist() {
    in_wordpress()
        .args(["-C", "missing.toml", "check", "tidy"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("config file not found"));
}

#[test]
fn invalid_config_version_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("plugin-check.toml");
    std::fs::write(&config, "version = 2\n").unwrap();

    in_wordpress()
        .arg("-C")
        .arg(&config)
        .args(["check", "tidy"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("unsupported config version 2"));
}

#[test]
fn wp_root_env_points_at_the_install() {
    let dir = tempfile::TempDir::new().unwrap();
    plugin_check_cmd()
        .current_dir(dir.path())
        .env("PLUGIN_CHECK_WP_ROOT", fixture("wordpress"))
        .arg("-C")
        .arg(fixture("wordpress/plugin-check.toml"))
        .args(["check", "tidy"])
        .assert()
        .code(0);
}

#[test]
fn non_install_directory_is_a_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    plugin_check_cmd()
        .current_dir(dir.path())
        .args(["check", "tidy"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("does not look like a WordPress install"));
}

#[test]
fn invalid_environment_type_env_is_rejected() {
    check("tidy", &[])
        .env("WP_ENVIRONMENT_TYPE", "qa")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("unknown environment type: qa"));
}

#[test]
fn unknown_config_keys_warn() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("plugin-check.toml");
    std::fs::write(
        &config,
        "version = 1\nextra = true\n[linter]\nphpcs = \"/nonexistent/bin/phpcs\"\n",
    )
    .unwrap();

    in_wordpress()
        .arg("-C")
        .arg(&config)
        .args(["check", "tidy"])
        .assert()
        .code(0)
        .stderr(predicates::str::contains("extra"));
}
