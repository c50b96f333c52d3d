// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin discovery, header parsing, and target resolution.
//!
//! Headers are read the way WordPress reads them: only the first 8 KiB of
//! the file are scanned, one `Field: value` pair per line, with comment
//! decoration stripped.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

/// Bytes of a PHP file that are scanned for header fields.
const HEADER_SCAN_BYTES: usize = 8 * 1024;

/// Header fields of a plugin main file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginHeader {
    pub name: String,
    pub plugin_uri: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub author_uri: String,
    pub text_domain: String,
    pub domain_path: String,
    pub network: bool,
    pub requires_wp: String,
    pub requires_php: String,
    pub requires_plugins: Vec<String>,
    pub update_uri: String,
    pub license: String,
    pub license_uri: String,
}

impl PluginHeader {
    /// Header with only a name, handy for registering plugins in tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Field label, as written in the file, for each header property.
const FIELDS: &[&str] = &[
    "Plugin Name",
    "Plugin URI",
    "Version",
    "Description",
    "Author",
    "Author URI",
    "Text Domain",
    "Domain Path",
    "Network",
    "Requires at least",
    "Requires PHP",
    "Requires Plugins",
    "Update URI",
    "License",
    "License URI",
];

#[allow(clippy::expect_used)]
static FIELD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    FIELDS
        .iter()
        .map(|field| {
            Regex::new(&format!(
                r"(?mi)^(?:[ \t]*<\?php)?[ \t/*#@]*{}:(.*)$",
                regex::escape(field)
            ))
            .expect("valid regex")
        })
        .collect()
});

/// Strip a trailing comment close and surrounding whitespace.
fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = match trimmed.find("*/") {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    let trimmed = match trimmed.find("?>") {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    trimmed.trim().to_string()
}

/// Cut `content` to the scanned window without splitting a UTF-8 sequence.
fn header_window(content: &str) -> &str {
    if content.len() <= HEADER_SCAN_BYTES {
        return content;
    }
    let mut end = HEADER_SCAN_BYTES;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

/// Parse plugin header fields from file content.
///
/// Returns `None` when there is no `Plugin Name` header.
pub fn parse_header(content: &str) -> Option<PluginHeader> {
    let window = header_window(content).replace('\r', "\n");
    let values: Vec<String> = FIELD_PATTERNS
        .iter()
        .map(|re| {
            re.captures(&window)
                .and_then(|c| c.get(1))
                .map(|m| clean_value(m.as_str()))
                .unwrap_or_default()
        })
        .collect();

    let get = |i: usize| values.get(i).cloned().unwrap_or_default();
    let name = get(0);
    if name.is_empty() {
        return None;
    }

    Some(PluginHeader {
        name,
        plugin_uri: get(1),
        version: get(2),
        description: get(3),
        author: get(4),
        author_uri: get(5),
        text_domain: get(6),
        domain_path: get(7),
        network: get(8).eq_ignore_ascii_case("true"),
        requires_wp: get(9),
        requires_php: get(10),
        requires_plugins: get(11)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        update_uri: get(12),
        license: get(13),
        license_uri: get(14),
    })
}

/// Read and parse the header of a plugin file.
pub fn read_header(path: &Path) -> Result<Option<PluginHeader>> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_header(&String::from_utf8_lossy(&bytes)))
}

fn is_php(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
}

/// Find installed plugins under `plugins_dir`, keyed by basename.
///
/// Like WordPress, only PHP files directly in the plugins directory or one
/// level below are considered.
pub fn discover_plugins(plugins_dir: &Path) -> Result<BTreeMap<String, PluginHeader>> {
    let mut plugins = BTreeMap::new();
    let entries = std::fs::read_dir(plugins_dir).map_err(|e| Error::io(plugins_dir, e))?;

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            let Ok(children) = std::fs::read_dir(&path) else {
                continue;
            };
            for child in children.flatten() {
                let child_path = child.path();
                if !child_path.is_file() || !is_php(&child_path) {
                    continue;
                }
                if let Ok(Some(header)) = read_header(&child_path) {
                    let basename = format!("{}/{}", name, child.file_name().to_string_lossy());
                    plugins.insert(basename, header);
                }
            }
        } else if is_php(&path)
            && let Ok(Some(header)) = read_header(&path)
        {
            plugins.insert(name, header);
        }
    }

    tracing::debug!("discovered {} plugins in {}", plugins.len(), plugins_dir.display());
    Ok(plugins)
}

/// Resolve user input (a slug or a basename) to an installed plugin basename.
///
/// Accepts `dir/main.php`, a directory slug `dir`, or a single-file slug
/// `hello` for `hello.php`.
pub fn resolve_basename(input: &str, plugins: &BTreeMap<String, PluginHeader>) -> Result<String> {
    let input = input.trim().trim_matches('/');
    if input.is_empty() {
        return Err(Error::InvalidPlugin("no plugin given".to_string()));
    }

    if plugins.contains_key(input) {
        return Ok(input.to_string());
    }

    if !input.contains('/') {
        let prefix = format!("{}/", input);
        let mut candidates = plugins.keys().filter(|basename| basename.starts_with(&prefix));
        if let Some(first) = candidates.next() {
            if candidates.next().is_some() {
                // WordPress picks the first match too, but the ambiguity is worth a note.
                tracing::debug!("plugin slug {} matches several main files", input);
            }
            return Ok(first.clone());
        }

        let single = format!("{}.php", input);
        if plugins.contains_key(&single) {
            return Ok(single);
        }
    }

    Err(Error::InvalidPlugin(format!(
        "plugin with slug {} is not installed",
        input
    )))
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
