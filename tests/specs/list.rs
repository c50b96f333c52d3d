//! `plugin-check list-checks` and `list-categories`.

use crate::prelude::*;

#[test]
fn list_checks_hides_experimental_by_default() {
    in_wordpress()
        .arg("list-checks")
        .assert()
        .success()
        .stdout(predicates::str::contains("file_type"))
        .stdout(predicates::str::contains("enqueued_scripts_size"))
        .stdout(predicates::str::contains("enqueued_scripts_scope").not());
}

#[test]
fn list_checks_with_experimental() {
    in_wordpress()
        .args(["list-checks", "--include-experimental"])
        .assert()
        .success()
        .stdout(predicates::str::contains("enqueued_scripts_scope"))
        .stdout(predicates::str::contains("(experimental)"));
}

#[test]
fn list_checks_by_category_as_json() {
    let output = in_wordpress()
        .args(["list-checks", "--categories=security", "--format=json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    let slugs: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["late_escaping", "direct_db_queries"]);
}

#[test]
fn list_checks_works_outside_an_install() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    plugin_check_cmd()
        .current_dir(dir.path())
        .arg("list-checks")
        .assert()
        .success()
        .stdout(predicates::str::contains("plugin_readme"));
}

#[test]
fn list_categories() {
    in_wordpress()
        .arg("list-categories")
        .assert()
        .success()
        .stdout(predicates::str::contains("plugin_repo"))
        .stdout(predicates::str::contains("Performance"));
}

#[test]
fn list_categories_as_json() {
    let output = in_wordpress()
        .args(["list-categories", "--format", "json"])
        .output()
        .unwrap();
    let value = stdout_json(&output);
    assert_eq!(value[0]["slug"], "general");
    assert_eq!(value.as_array().unwrap().len(), 5);
}
