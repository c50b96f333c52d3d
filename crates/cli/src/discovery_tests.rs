// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn finds_config_next_to_the_install() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE);
    fs::write(&config_path, "version = 1\n").unwrap();

    assert_eq!(find_config(dir.path()), Some(config_path));
}

#[test]
fn finds_config_from_inside_a_plugin() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE);
    fs::write(&config_path, "version = 1\n").unwrap();
    let plugin = dir.path().join("wp-content/plugins/foo");
    fs::create_dir_all(&plugin).unwrap();

    assert_eq!(find_config(&plugin), Some(config_path));
}

#[test]
fn plugin_repository_boundary_stops_the_search() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "version = 1\n").unwrap();
    let plugin = dir.path().join("foo");
    fs::create_dir_all(plugin.join(".git")).unwrap();
    fs::create_dir_all(plugin.join("includes")).unwrap();

    assert_eq!(find_config(&plugin.join("includes")), None);
}

#[test]
fn config_at_the_repository_root_is_found() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    let config_path = dir.path().join(CONFIG_FILE);
    fs::write(&config_path, "version = 1\n").unwrap();
    fs::create_dir(dir.path().join("includes")).unwrap();

    assert_eq!(find_config(&dir.path().join("includes")), Some(config_path));
}

#[test]
fn directory_named_like_the_config_is_skipped() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::create_dir(dir.path().join(CONFIG_FILE)).unwrap();

    assert_eq!(find_config(dir.path()), None);
}

#[test]
fn explicit_path_wins_over_discovery() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), "version = 1\n").unwrap();
    let explicit = dir.path().join("ci.toml");
    fs::write(&explicit, "version = 1\n").unwrap();

    let resolved = resolve_config(Some(&explicit), dir.path()).unwrap();
    assert_eq!(resolved, Some(explicit));
}

#[test]
fn missing_explicit_path_is_a_config_error() {
    let dir = tempdir().unwrap();
    let err = resolve_config(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("config file not found"));
}
