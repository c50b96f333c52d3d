// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;
use std::sync::atomic::Ordering;

use super::*;
use crate::check::{Check, ExecutionMode};
use crate::host::MemoryHost;
use crate::plugin::PluginHeader;
use crate::test_utils::{
    FakeCheck, foo_host, shared_builds, shared_log, shared_logging, temp_install,
};

#[derive(Default)]
struct TestSource {
    plugin_check: bool,
    plugin: Option<String>,
    checks: Vec<String>,
    experimental: bool,
}

impl TestSource {
    fn checking(plugin: &str) -> Self {
        Self {
            plugin_check: true,
            plugin: Some(plugin.to_string()),
            ..Self::default()
        }
    }

    fn with_checks(mut self, checks: &[&str]) -> Self {
        self.checks = checks.iter().map(|c| c.to_string()).collect();
        self
    }
}

impl RunnerSource for TestSource {
    fn is_plugin_check(&self) -> bool {
        self.plugin_check
    }

    fn plugin_input(&self) -> Option<String> {
        self.plugin.clone()
    }

    fn check_slugs(&self) -> Vec<String> {
        self.checks.clone()
    }

    fn include_experimental(&self) -> bool {
        self.experimental
    }
}

/// Records the table prefix seen while running.
struct PrefixProbe {
    host: Arc<dyn Host>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Check for PrefixProbe {
    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Runtime
    }

    fn categories(&self) -> Vec<Category> {
        vec![Category::PERFORMANCE]
    }

    fn run(&self, _result: &mut CheckResult) -> Result<()> {
        self.seen.lock().unwrap().push(self.host.table_prefix());
        Ok(())
    }
}

fn strings(slugs: &[&str]) -> Vec<String> {
    slugs.iter().map(|s| s.to_string()).collect()
}

fn runner(
    host: Arc<dyn Host>,
    repo: CheckRepository,
    source: TestSource,
) -> CheckRunner<TestSource> {
    CheckRunner::new(host, Arc::new(repo), source)
}

fn static_repo() -> CheckRepository {
    let mut repo = CheckRepository::new();
    repo.register_check("a", FakeCheck::static_check("a")).unwrap();
    repo.register_check("b", FakeCheck::static_check("b")).unwrap();
    repo
}

#[test]
fn walks_the_state_machine() {
    let tmp = temp_install();
    let mut runner = runner(foo_host(tmp.path()), static_repo(), TestSource::checking("foo"));
    assert_eq!(runner.state(), RunnerState::Idle);

    runner.prepare().unwrap();
    assert_eq!(runner.state(), RunnerState::Prepared);

    let result = runner.run().unwrap();
    assert_eq!(runner.state(), RunnerState::Ran);
    assert_eq!(result.warning_count(), 2);

    runner.cleanup().unwrap();
    assert_eq!(runner.state(), RunnerState::CleanedUp);
}

#[test]
fn run_prepares_when_idle() {
    let tmp = temp_install();
    let mut runner = runner(foo_host(tmp.path()), static_repo(), TestSource::checking("foo"));
    runner.run().unwrap();
    assert_eq!(runner.state(), RunnerState::Ran);
}

#[test]
fn cannot_prepare_twice_or_run_after_cleanup() {
    let tmp = temp_install();
    let mut runner = runner(foo_host(tmp.path()), static_repo(), TestSource::checking("foo"));
    runner.prepare().unwrap();
    assert!(matches!(runner.prepare(), Err(Error::Internal(_))));

    runner.cleanup().unwrap();
    assert!(matches!(runner.run(), Err(Error::Internal(_))));
}

#[test]
fn resolves_slug_to_basename() {
    let tmp = temp_install();
    let runner = runner(foo_host(tmp.path()), static_repo(), TestSource::checking("foo"));
    assert_eq!(runner.plugin_basename().unwrap(), "foo/foo.php");
}

#[test]
fn missing_plugin_is_invalid() {
    let tmp = temp_install();
    let mut runner = runner(foo_host(tmp.path()), static_repo(), TestSource::default());
    assert!(matches!(runner.prepare(), Err(Error::InvalidPlugin(_))));

    let mut runner = runner_for("nope", &tmp);
    assert!(matches!(runner.run(), Err(Error::InvalidPlugin(_))));
}

fn runner_for(plugin: &str, tmp: &tempfile::TempDir) -> CheckRunner<TestSource> {
    runner(foo_host(tmp.path()), static_repo(), TestSource::checking(plugin))
}

#[test]
fn changed_plugin_after_creation_is_rejected() {
    let tmp = temp_install();
    let host = Arc::new(
        MemoryHost::new(tmp.path())
            .with_plugin("foo/foo.php", PluginHeader::named("Foo"))
            .with_plugin("bar/bar.php", PluginHeader::named("Bar")),
    );
    let mut runner = runner(host, static_repo(), TestSource::checking("foo"));
    runner.set_plugin("bar");

    let err = runner.run().unwrap_err();
    assert!(matches!(err, Error::InvalidPlugin(_)), "{err}");
}

#[test]
fn changed_checks_after_creation_are_rejected() {
    let tmp = temp_install();
    let mut runner = runner(
        foo_host(tmp.path()),
        static_repo(),
        TestSource::checking("foo").with_checks(&["a"]),
    );
    runner.set_check_slugs(strings(&["b"]));

    assert!(matches!(runner.prepare(), Err(Error::InvalidChecks(_))));
}

#[test]
fn setters_are_free_outside_a_plugin_check() {
    let tmp = temp_install();
    let mut runner = runner(foo_host(tmp.path()), static_repo(), TestSource::default());
    runner.set_plugin("foo");
    runner.set_check_slugs(strings(&["b"]));

    let result = runner.execute().unwrap();
    assert_eq!(result.warning_count(), 1);
    assert!(result.warnings().contains_key("b.php"));
}

#[test]
fn unknown_requested_check_fails() {
    let tmp = temp_install();
    let mut runner = runner(
        foo_host(tmp.path()),
        static_repo(),
        TestSource::checking("foo").with_checks(&["a", "missing"]),
    );
    let err = runner.checks_to_run().unwrap_err();
    assert!(matches!(err, Error::UnknownCheck(ref slug) if slug == "missing"));
}

#[test]
fn experimental_checks_need_the_flag() {
    let tmp = temp_install();
    let mut repo = static_repo();
    repo.register_check("lab", FakeCheck::static_check("lab").experimental())
        .unwrap();

    let mut runner = runner(foo_host(tmp.path()), repo, TestSource::checking("foo"));
    assert_eq!(runner.checks_to_run().unwrap().slugs(), strings(&["a", "b"]));

    let mut repo = static_repo();
    repo.register_check("lab", FakeCheck::static_check("lab").experimental())
        .unwrap();
    let mut runner = self::runner(foo_host(tmp.path()), repo, TestSource::checking("foo"));
    runner.set_experimental_flag(true);
    assert!(runner.checks_to_run().unwrap().contains("lab"));
}

#[test]
fn requesting_an_experimental_check_still_needs_the_flag() {
    let tmp = temp_install();
    let mut repo = static_repo();
    repo.register_check("lab", FakeCheck::static_check("lab").experimental())
        .unwrap();
    let mut runner = runner(
        foo_host(tmp.path()),
        repo,
        TestSource::checking("foo").with_checks(&["lab"]),
    );
    let err = runner.checks_to_run().unwrap_err();
    assert!(matches!(err, Error::UnknownCheck(ref slug) if slug == "lab"));

    let mut repo = static_repo();
    repo.register_check("lab", FakeCheck::static_check("lab").experimental())
        .unwrap();
    let mut runner = self::runner(
        foo_host(tmp.path()),
        repo,
        TestSource::checking("foo").with_checks(&["lab"]),
    );
    runner.set_experimental_flag(true);
    assert_eq!(runner.checks_to_run().unwrap().slugs(), strings(&["lab"]));
}

#[test]
fn exclude_and_categories_narrow_the_selection() {
    let tmp = temp_install();
    let mut repo = static_repo();
    repo.register_check(
        "secure",
        FakeCheck::static_check("secure").categories(&[Category::SECURITY]),
    )
    .unwrap();

    let mut runner = runner(foo_host(tmp.path()), repo, TestSource::checking("foo"));
    runner.set_exclude_checks(strings(&["a"]));
    runner.set_categories(vec![Category::GENERAL]);
    assert_eq!(runner.checks_to_run().unwrap().slugs(), strings(&["b"]));
}

#[test]
fn runtime_checks_are_dropped_without_request_support() {
    let tmp = temp_install();
    let host = Arc::new(
        MemoryHost::new(tmp.path())
            .with_plugin("foo/foo.php", PluginHeader::named("Foo"))
            .without_requests(),
    );
    let mut repo = static_repo();
    repo.register_check("front", FakeCheck::runtime_check("front"))
        .unwrap();

    let mut runner = runner(host, repo, TestSource::checking("foo"));
    assert_eq!(runner.checks_to_run().unwrap().slugs(), strings(&["a", "b"]));
}

#[test]
fn requested_unavailable_check_fails() {
    let tmp = temp_install();
    let host = Arc::new(
        MemoryHost::new(tmp.path())
            .with_plugin("foo/foo.php", PluginHeader::named("Foo"))
            .without_requests(),
    );
    let mut repo = static_repo();
    repo.register_check("front", FakeCheck::runtime_check("front"))
        .unwrap();

    let mut runner = runner(host, repo, TestSource::checking("foo").with_checks(&["front"]));
    let err = runner.prepare().unwrap_err();
    assert!(matches!(err, Error::CheckUnavailable { ref slug, .. } if slug == "front"));
}

#[test]
fn check_reporting_unavailable_is_skipped() {
    let tmp = temp_install();
    let mut repo = static_repo();
    repo.register_check(
        "lint",
        FakeCheck::static_check("lint").unavailable("phpcs is not installed"),
    )
    .unwrap();

    let mut runner = runner(foo_host(tmp.path()), repo, TestSource::checking("foo"));
    assert!(!runner.checks_to_run().unwrap().contains("lint"));
}

#[test]
fn runtime_checks_run_under_the_testing_prefix() {
    let tmp = temp_install();
    let host = foo_host(tmp.path());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut repo = CheckRepository::new();
    repo.register_check(
        "probe",
        PrefixProbe {
            host: host.clone(),
            seen: Arc::clone(&seen),
        },
    )
    .unwrap();

    let mut runner = runner(host.clone(), repo, TestSource::checking("foo"));
    runner.prepare().unwrap();
    assert_eq!(host.table_prefix(), "wppc_");
    assert_eq!(host.filters().count(crate::host::Hook::ActivePlugins), 1);

    runner.run().unwrap();
    runner.cleanup().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["wppc_"]);
    assert_eq!(host.table_prefix(), "wp_");
    assert!(host.filters().is_empty());
}

#[test]
fn static_only_run_leaves_the_host_alone() {
    let tmp = temp_install();
    let host = foo_host(tmp.path());
    let mut runner = runner(host.clone(), static_repo(), TestSource::checking("foo"));
    runner.prepare().unwrap();
    assert_eq!(host.table_prefix(), "wp_");
    assert!(host.filters().is_empty());
}

#[test]
fn shared_preparations_are_deduplicated() {
    let tmp = temp_install();
    let before = shared_builds();
    let log = shared_log();
    log.lock().unwrap().clear();

    let mut repo = CheckRepository::new();
    repo.register_check(
        "a",
        FakeCheck::static_check("a")
            .logging_to(&log)
            .with_shared(shared_logging("posts")),
    )
    .unwrap();
    repo.register_check(
        "b",
        FakeCheck::static_check("b")
            .logging_to(&log)
            .with_shared(shared_logging("posts")),
    )
    .unwrap();

    let mut runner = runner(foo_host(tmp.path()), repo, TestSource::checking("foo"));
    runner.execute().unwrap();

    assert_eq!(shared_builds() - before, 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["prepare:posts", "run:a", "run:b", "cleanup:posts"]
    );
}

#[test]
fn failed_shared_preparation_rolls_back() {
    let tmp = temp_install();
    let ok = FakeCheck::static_check("ok").with_shared(shared_logging("first"));
    let ok_runs = Arc::clone(&ok.runs);

    let mut repo = CheckRepository::new();
    repo.register_check("ok", ok).unwrap();
    repo.register_check(
        "broken",
        FakeCheck::static_check("broken").with_shared(crate::preparation::SharedPreparation {
                name: "failing",
                args: serde_json::Value::Null,
                factory: |_, _| {
                    Err(Error::Preparation {
                        name: "failing",
                        message: "no database".to_string(),
                    })
                },
            }),
    )
    .unwrap();

    let shared = shared_log();
    shared.lock().unwrap().clear();

    let mut runner = runner(foo_host(tmp.path()), repo, TestSource::checking("foo"));
    let err = runner.execute().unwrap_err();
    assert!(matches!(err, Error::Preparation { name: "failing", .. }));
    assert_eq!(*shared.lock().unwrap(), vec!["prepare:first", "cleanup:first"]);
    assert_eq!(ok_runs.load(Ordering::SeqCst), 0);
    assert_eq!(runner.state(), RunnerState::CleanedUp);
}

#[test]
fn execute_cleans_up_after_a_failing_check() {
    let tmp = temp_install();
    let host = foo_host(tmp.path());
    let mut repo = CheckRepository::new();
    repo.register_check("front", FakeCheck::runtime_check("front").failing())
        .unwrap();

    let mut runner = runner(host.clone(), repo, TestSource::checking("foo"));
    let err = runner.execute().unwrap_err();
    assert!(matches!(err, Error::CheckFailed { ref slug, .. } if slug == "front"));
    assert_eq!(host.table_prefix(), "wp_");
    assert!(host.filters().is_empty());
}

#[test]
fn dropping_a_prepared_runner_cleans_up() {
    let tmp = temp_install();
    let host = foo_host(tmp.path());
    let mut repo = CheckRepository::new();
    repo.register_check("front", FakeCheck::runtime_check("front"))
        .unwrap();

    {
        let mut runner = runner(host.clone(), repo, TestSource::checking("foo"));
        runner.prepare().unwrap();
        assert_eq!(host.table_prefix(), "wppc_");
    }
    assert_eq!(host.table_prefix(), "wp_");
    assert!(host.filters().is_empty());
}

#[test]
fn extensions_add_checks() {
    let tmp = temp_install();
    let extra: Arc<dyn Check> = Arc::new(FakeCheck::static_check("extra"));
    let mut runner = runner(foo_host(tmp.path()), static_repo(), TestSource::checking("foo"))
        .with_extension(crate::orchestrator::extension(move |all| {
            Ok(all.insert("extra", Arc::clone(&extra)))
        }));
    assert!(runner.checks_to_run().unwrap().contains("extra"));
}
