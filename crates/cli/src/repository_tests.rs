// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::test_utils::FakeCheck;
use yare::parameterized;

fn repository() -> CheckRepository {
    let mut repo = CheckRepository::new();
    repo.register_check("static_check", FakeCheck::static_check("static_check")).unwrap();
    repo.register_check("runtime_check", FakeCheck::runtime_check("runtime_check")).unwrap();
    repo.register_check(
        "experimental_static_check",
        FakeCheck::static_check("experimental_static_check").experimental(),
    )
    .unwrap();
    repo.register_check(
        "experimental_runtime_check",
        FakeCheck::runtime_check("experimental_runtime_check").experimental(),
    )
    .unwrap();
    repo
}

#[parameterized(
    static_static = { ExecutionMode::Static, ExecutionMode::Static },
    runtime_runtime = { ExecutionMode::Runtime, ExecutionMode::Runtime },
    static_runtime = { ExecutionMode::Static, ExecutionMode::Runtime },
    runtime_static = { ExecutionMode::Runtime, ExecutionMode::Static },
)]
fn duplicate_slug_fails(first: ExecutionMode, second: ExecutionMode) {
    let mut repo = CheckRepository::new();
    repo.register_check("dup", FakeCheck::new("dup", first)).unwrap();
    let err = repo.register_check("dup", FakeCheck::new("dup", second)).unwrap_err();
    assert!(matches!(err, Error::DuplicateCheck { .. }));
    assert_eq!(repo.len(), 1);
}

#[test]
fn empty_categories_fail() {
    let mut repo = CheckRepository::new();
    let err = repo
        .register_check("bare", FakeCheck::static_check("bare").categories(&[]))
        .unwrap_err();
    assert!(matches!(err, Error::MissingCategories { slug } if slug == "bare"));
    assert!(repo.is_empty());
}

#[test]
fn default_excludes_experimental() {
    let repo = repository();
    assert_eq!(
        repo.get_checks(CheckFlags::default()).slugs(),
        vec!["static_check", "runtime_check"]
    );
}

#[test]
fn experimental_flag_returns_everything_static_first() {
    let repo = repository();
    let all = repo.get_checks(CheckFlags::ALL | CheckFlags::INCLUDE_EXPERIMENTAL);
    assert_eq!(
        all.slugs(),
        vec![
            "static_check",
            "experimental_static_check",
            "runtime_check",
            "experimental_runtime_check"
        ]
    );
}

#[parameterized(
    static_only = { CheckFlags::STATIC, &["static_check"] },
    runtime_only = { CheckFlags::RUNTIME, &["runtime_check"] },
    static_experimental = { CheckFlags::STATIC.with_experimental(true), &["static_check", "experimental_static_check"] },
    experimental_toggled_off = { CheckFlags::ALL.with_experimental(true).with_experimental(false), &["static_check", "runtime_check"] },
)]
fn flags_select_partitions(flags: CheckFlags, expected: &[&str]) {
    assert_eq!(repository().get_checks(flags).slugs(), expected);
}

#[test]
fn include_on_repository_checks() {
    let repo = repository();
    let included = repo
        .get_checks(CheckFlags::ALL)
        .include(&["static_check".to_string()]);
    assert_eq!(included.len(), 1);
    assert!(!included.get("static_check").unwrap().is_runtime());
}
