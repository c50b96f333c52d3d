//! `plugin-check check`.

use crate::prelude::*;

#[test]
fn clean_plugin_passes() {
    check("tidy", &[])
        .assert()
        .code(0)
        .stdout("Success: Checks complete. No errors found.\n");
}

#[test]
fn basename_and_slug_are_equivalent() {
    check("tidy/tidy.php", &[]).assert().code(0);
}

#[test]
fn single_file_plugin_passes() {
    check("hello", &[]).assert().code(0);
}

#[test]
fn error_findings_exit_with_one() {
    check("messy", &[])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("FILE: messy.php"))
        .stdout(predicates::str::contains(
            "7:1 ERROR allow_unfiltered_uploads_detected ALLOW_UNFILTERED_UPLOADS is not permitted.",
        ))
        .stdout(predicates::str::contains("FILE: readme.txt"))
        .stdout(predicates::str::contains("3 errors, 1 warning"));
}

#[test]
fn json_output_has_result_shape() {
    let output = check("messy", &["--format", "json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value = stdout_json(&output);
    assert_eq!(value["error_count"], 3);
    assert_eq!(value["warning_count"], 1);
    assert_eq!(
        value["errors"]["messy.php"]["7"]["1"][0]["code"],
        "allow_unfiltered_uploads_detected"
    );
    assert_eq!(
        value["errors"]["readme.txt"]["0"]["0"][0]["code"],
        "no_plugin_readme"
    );
}

#[test]
fn ignore_errors_keeps_warnings_and_passes() {
    check("messy", &["--ignore-errors"])
        .assert()
        .code(0)
        .stdout(predicates::str::contains("plugin_header_no_license"))
        .stdout(predicates::str::contains("ERROR").not());
}

#[test]
fn ignore_warnings_still_fails_on_errors() {
    check("messy", &["--ignore-warnings"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("WARNING").not());
}

#[test]
fn only_requested_checks_run() {
    check("messy", &["--checks=no_unfiltered_uploads", "--format=json"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("allow_unfiltered_uploads_detected"))
        .stdout(predicates::str::contains("no_plugin_readme").not());
}

#[test]
fn excluded_checks_do_not_run() {
    check("messy", &["--exclude-checks", "no_unfiltered_uploads"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("ALLOW_UNFILTERED_UPLOADS").not());
}

#[test]
fn category_filter_limits_checks() {
    // Every performance check needs phpcs or request simulation.
    check("messy", &["--categories=performance"])
        .assert()
        .code(0)
        .stdout(predicates::str::contains("Success"));
}

#[test]
fn unknown_check_is_an_argument_error() {
    check("tidy", &["--checks=nope"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains(
            "plugin-check: check with the slug \"nope\" does not exist",
        ));
}

#[test]
fn unknown_plugin_is_rejected() {
    check("missing", &[])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("invalid plugin"));
}

#[test]
fn requested_runtime_check_cannot_run_on_a_local_install() {
    check("tidy", &["--checks=enqueued_scripts_size"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains(
            "check \"enqueued_scripts_size\" cannot run",
        ));
}

#[test]
fn requested_phpcs_check_needs_the_executable() {
    check("tidy", &["--checks=i18n_usage"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("the phpcs executable was not found"));
}

#[test]
fn fatal_errors_print_no_partial_output() {
    check("missing", &[]).assert().code(2).stdout("");
}

#[test]
fn color_env_forces_escape_codes() {
    check("tidy", &[])
        .env("COLOR", "1")
        .assert()
        .code(0)
        .stdout(predicates::str::contains("\u{1b}["));
}

#[test]
fn color_flag_never_wins_over_env() {
    check("tidy", &["--color", "never"])
        .env("COLOR", "1")
        .assert()
        .code(0)
        .stdout(predicates::str::contains("\u{1b}[").not());
}
