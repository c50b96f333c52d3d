// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;
use std::sync::atomic::Ordering;

use super::*;
use crate::categories::Category;
use crate::test_utils::{FakeCheck, LoggingPreparation, foo_context, foo_host};
use tempfile::TempDir;

fn strings(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(|s| s.to_string()).collect()
}

fn orchestrator(repo: CheckRepository) -> (TempDir, Checks) {
    let tmp = TempDir::new().unwrap();
    let host = foo_host(tmp.path());
    let checks = Checks::new(foo_context(host.as_ref()), Arc::new(repo));
    (tmp, checks)
}

#[test]
fn runs_in_request_order_and_ignores_unknown() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut repo = CheckRepository::new();
    repo.register_check("a", FakeCheck::static_check("a").logging_to(&log)).unwrap();
    repo.register_check("b", FakeCheck::static_check("b").logging_to(&log)).unwrap();
    let (_tmp, checks) = orchestrator(repo);

    let result = checks.run_checks(&strings(&["b", "unknown", "a", "b"])).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["run:b", "run:a"]);
    assert_eq!(result.warning_count(), 2);
}

#[test]
fn private_preparation_wraps_the_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut repo = CheckRepository::new();
    repo.register_check(
        "prepared",
        FakeCheck::static_check("prepared")
            .logging_to(&log)
            .with_preparation(LoggingPreparation::new("private", &log)),
    )
    .unwrap();
    let (_tmp, checks) = orchestrator(repo);

    checks.run_checks(&strings(&["prepared"])).unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["prepare:private", "run:prepared", "cleanup:private"]
    );
}

#[test]
fn failing_check_cleans_up_once_then_aborts() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut repo = CheckRepository::new();
    repo.register_check("first", FakeCheck::static_check("first").logging_to(&log)).unwrap();
    repo.register_check(
        "broken",
        FakeCheck::static_check("broken")
            .failing()
            .logging_to(&log)
            .with_preparation(LoggingPreparation::new("private", &log)),
    )
    .unwrap();
    repo.register_check("never", FakeCheck::static_check("never").logging_to(&log)).unwrap();
    let (_tmp, checks) = orchestrator(repo);

    let mut result = CheckResult::new(checks.context().clone());
    let err = checks
        .run_checks_into(&strings(&["first", "broken", "never"]), &mut result)
        .unwrap_err();

    assert!(matches!(err, Error::CheckFailed { ref slug, .. } if slug == "broken"));
    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|l| *l == "cleanup:private").count(), 1);
    assert!(!log.contains(&"run:never".to_string()));
    assert_eq!(result.warning_count(), 1);
}

#[test]
fn failing_private_preparation_skips_the_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let check = FakeCheck::static_check("c")
        .logging_to(&log)
        .with_preparation(LoggingPreparation::new("private", &log).failing());
    let runs = Arc::clone(&check.runs);
    let mut repo = CheckRepository::new();
    repo.register_check("c", check).unwrap();
    let (_tmp, checks) = orchestrator(repo);

    let err = checks.run_checks(&strings(&["c"])).unwrap_err();
    assert!(matches!(err, Error::Preparation { .. }));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn extensions_add_replace_and_remove() {
    let mut repo = CheckRepository::new();
    repo.register_check("keep", FakeCheck::static_check("keep")).unwrap();
    repo.register_check("drop", FakeCheck::static_check("drop")).unwrap();
    let (_tmp, checks) = orchestrator(repo);

    let checks = checks
        .with_extension(extension(|all| {
            Ok(all
                .exclude(&["drop".to_string()])
                .insert("added", Arc::new(FakeCheck::runtime_check("added"))))
        }))
        .with_extension(extension(|all| {
            Ok(all.insert("keep", Arc::new(FakeCheck::runtime_check("keep"))))
        }));

    let all = checks.get_checks().unwrap();
    assert_eq!(all.slugs(), vec!["keep", "added"]);
    assert!(all.get("keep").unwrap().is_runtime());
}

#[test]
fn extension_checks_need_categories() {
    let (_tmp, checks) = orchestrator(CheckRepository::new());
    let checks = checks.with_extension(extension(|all| {
        Ok(all.insert("bare", Arc::new(FakeCheck::static_check("bare").categories(&[]))))
    }));
    assert!(matches!(
        checks.get_checks().unwrap_err(),
        Error::MissingCategories { .. }
    ));
}

#[test]
fn available_checks_resolve_once() {
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut repo = CheckRepository::new();
    repo.register_check(
        "exp",
        FakeCheck::static_check("exp")
            .experimental()
            .categories(&[Category::SECURITY]),
    )
    .unwrap();
    let (_tmp, checks) = orchestrator(repo);
    let checks = checks.with_extension(extension(move |all| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(all)
    }));

    assert_eq!(checks.get_checks().unwrap().slugs(), vec!["exp"]);
    checks.get_checks().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
