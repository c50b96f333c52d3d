// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::check::CheckContext;

const REPORT: &str = r#"{
    "totals": {"errors": 1, "warnings": 1, "fixable": 0},
    "files": {
        "/srv/wp/wp-content/plugins/foo/foo.php": {
            "errors": 1,
            "warnings": 1,
            "messages": [
                {
                    "message": "All output should be run through an escaping function",
                    "source": "WordPress.Security.EscapeOutput.OutputNotEscaped",
                    "severity": 5,
                    "fixable": false,
                    "type": "ERROR",
                    "line": 12,
                    "column": 6
                },
                {
                    "message": "Processing form data without nonce verification.",
                    "source": "WordPress.Security.NonceVerification.Missing",
                    "severity": 5,
                    "fixable": false,
                    "type": "WARNING",
                    "line": 20,
                    "column": 1
                }
            ]
        }
    }
}"#;

fn result() -> CheckResult {
    CheckResult::new(CheckContext::from_parts(
        "/srv/wp/wp-content/plugins/foo/foo.php",
        Path::new("/srv/wp/wp-content/plugins"),
        "http://example.org/wp-content/plugins",
    ))
}

#[test]
fn parses_phpcs_json() {
    let report = LinterReport::parse(REPORT).unwrap();
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.message_count(), 2);
}

#[test]
fn rejects_garbage() {
    assert!(matches!(
        LinterReport::parse("PHP Fatal error"),
        Err(Error::Linter { .. })
    ));
}

#[test]
fn report_without_files_is_empty() {
    let report = LinterReport::parse(r#"{"totals": {"errors": 0}}"#).unwrap();
    assert_eq!(report.message_count(), 0);
}

#[test]
fn applies_errors_and_warnings_relative_to_plugin() {
    let report = LinterReport::parse(REPORT).unwrap();
    let mut result = result();
    apply_report(&report, &mut result);

    assert_eq!(result.error_count(), 1);
    assert_eq!(result.warning_count(), 1);
    let error = &result.errors()["foo.php"][&12][&6][0];
    assert_eq!(error.code, "WordPress.Security.EscapeOutput.OutputNotEscaped");
    let warning = &result.warnings()["foo.php"][&20][&1][0];
    assert_eq!(warning.code, "WordPress.Security.NonceVerification.Missing");
}

#[test]
fn missing_executable_is_unavailable() {
    let phpcs = Phpcs::new("/nonexistent/bin/phpcs");
    assert!(!phpcs.is_available());
    let err = phpcs
        .run("WordPress", &[], Path::new("/tmp"))
        .unwrap_err();
    assert!(matches!(err, Error::Linter { .. }));
}

#[cfg(unix)]
#[test]
fn runs_executable_and_parses_stdout() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::TempDir::new().unwrap();
    let script = tmp.path().join("phpcs");
    let args_file = tmp.path().join("args");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" > {}\ncat <<'EOF'\n{}\nEOF\nexit 2\n",
            args_file.display(),
            REPORT
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let phpcs = Phpcs::new(&script);
    assert!(phpcs.is_available());
    let report = phpcs
        .run("PluginCheck", &[("extensions", "php")], Path::new("/srv/foo"))
        .unwrap();
    assert_eq!(report.message_count(), 2);

    let args = std::fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        args.trim(),
        "--report=json --standard=PluginCheck --extensions=php /srv/foo"
    );
}

#[cfg(unix)]
#[test]
fn processing_failure_is_an_error() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::TempDir::new().unwrap();
    let script = tmp.path().join("phpcs");
    std::fs::write(&script, "#!/bin/sh\necho 'bad standard' >&2\nexit 3\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let err = Phpcs::new(&script)
        .run("Nope", &[], Path::new("/srv/foo"))
        .unwrap_err();
    assert!(err.to_string().contains("bad standard"));
}
