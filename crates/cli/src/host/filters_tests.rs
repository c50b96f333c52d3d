// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

fn upper(value: FilterValue) -> FilterValue {
    match value {
        FilterValue::Text(t) => FilterValue::Text(t.to_uppercase()),
        other => other,
    }
}

#[test]
fn no_filters_returns_value_unchanged() {
    let filters = Filters::new();
    assert_eq!(filters.apply_text(Hook::Template, "twentytwenty".into()), "twentytwenty");
    assert!(filters.is_empty());
}

#[test]
fn filters_apply_in_insertion_order() {
    let filters = Filters::new();
    filters.add(Hook::Template, |_| FilterValue::Text("a".into()));
    filters.add(Hook::Template, upper);
    assert_eq!(filters.apply_text(Hook::Template, "x".into()), "A");
}

#[test]
fn filters_only_touch_their_hook() {
    let filters = Filters::new();
    filters.add(Hook::Stylesheet, upper);
    assert_eq!(filters.apply_text(Hook::Template, "x".into()), "x");
    assert_eq!(filters.apply_text(Hook::Stylesheet, "x".into()), "X");
    assert_eq!(filters.count(Hook::Stylesheet), 1);
    assert_eq!(filters.count(Hook::Template), 0);
}

#[test]
fn removed_filter_no_longer_applies() {
    let filters = Filters::new();
    let id = filters.add(Hook::Template, upper);
    assert!(filters.remove(id));
    assert!(!filters.remove(id));
    assert_eq!(filters.apply_text(Hook::Template, "x".into()), "x");
    assert!(filters.is_empty());
}

#[test]
fn mismatched_value_kind_is_ignored() {
    let filters = Filters::new();
    filters.add(Hook::ActivePlugins, |_| FilterValue::Text("oops".into()));
    let list = vec!["a/a.php".to_string()];
    assert_eq!(filters.apply_list(Hook::ActivePlugins, list.clone()), list);
}
