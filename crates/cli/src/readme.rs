// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin readme parser.
//!
//! Understands the `readme.txt` format of the plugin directory:
//!
//! ```text
//! === Plugin Name ===
//! Contributors: alice, bob
//! Tags: forms, contact
//! Requires at least: 6.0
//! Tested up to: 6.5
//! Requires PHP: 7.4
//! Stable tag: 1.2.0
//! License: GPLv2 or later
//!
//! Short description.
//!
//! == Description ==
//! ...
//! == Upgrade Notice ==
//! = 1.2.0 =
//! Upgrade now.
//! ```
//!
//! `readme.md` files are first rewritten into that shape (`#` headings,
//! `**Field:**` labels).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Tags kept from the `Tags` header.
pub const MAX_TAGS: usize = 5;

/// Characters kept from the short description.
pub const MAX_SHORT_DESCRIPTION: usize = 150;

/// Tags the directory ignores.
const IGNORED_TAGS: &[&str] = &["plugin", "wordpress"];

#[allow(clippy::expect_used)]
static WP_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("valid regex"));

#[allow(clippy::expect_used)]
static PHP_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){1,2}$").expect("valid regex"));

/// Problems the parser noticed and worked around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadmeWarning {
    InvalidPluginNameHeader,
    IgnoredTags,
    TooManyTags,
    RequiresHeaderIgnored,
    TestedHeaderIgnored,
    RequiresPhpHeaderIgnored,
    NoShortDescriptionPresent,
    TrimmedShortDescription,
}

impl ReadmeWarning {
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidPluginNameHeader => "invalid_plugin_name_header",
            Self::IgnoredTags => "ignored_tags",
            Self::TooManyTags => "too_many_tags",
            Self::RequiresHeaderIgnored => "requires_header_ignored",
            Self::TestedHeaderIgnored => "tested_header_ignored",
            Self::RequiresPhpHeaderIgnored => "requires_php_header_ignored",
            Self::NoShortDescriptionPresent => "no_short_description_present",
            Self::TrimmedShortDescription => "trimmed_short_description",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidPluginNameHeader => {
                "The plugin name header in the readme is missing or malformed."
            }
            Self::IgnoredTags => "One or more tags were ignored.",
            Self::TooManyTags => "Only the first five tags are used.",
            Self::RequiresHeaderIgnored => {
                "The \"Requires at least\" field was ignored. It must be a WordPress version."
            }
            Self::TestedHeaderIgnored => {
                "The \"Tested up to\" field was ignored. It must be a WordPress version."
            }
            Self::RequiresPhpHeaderIgnored => {
                "The \"Requires PHP\" field was ignored. It must be a PHP version."
            }
            Self::NoShortDescriptionPresent => "The readme has no short description.",
            Self::TrimmedShortDescription => {
                "The short description exceeds the limit of 150 characters."
            }
        }
    }
}

/// A parsed plugin readme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readme {
    pub name: String,
    pub contributors: Vec<String>,
    pub tags: Vec<String>,
    pub donate_link: String,
    pub requires: String,
    pub tested: String,
    pub requires_php: String,
    pub stable_tag: String,
    pub license: String,
    pub license_uri: String,
    pub short_description: String,
    /// Sections by lowercased title (`faq` for the questions section).
    pub sections: BTreeMap<String, String>,
    /// Upgrade notices by version.
    pub upgrade_notice: BTreeMap<String, String>,
    pub warnings: BTreeSet<ReadmeWarning>,
}

impl Readme {
    /// Parse readme text; markdown readmes are detected by their first heading.
    pub fn parse(text: &str) -> Self {
        let text = text.trim_start_matches('\u{feff}').replace("\r\n", "\n");
        let is_markdown = text
            .lines()
            .find(|l| !l.trim().is_empty())
            .is_some_and(|l| l.trim_start().starts_with('#'));
        let text = if is_markdown {
            markdown_to_txt(&text)
        } else {
            text
        };
        Parser::default().parse(&text)
    }

    /// Read and parse a readme file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse(&String::from_utf8_lossy(&content)))
    }
}

/// The readme of the plugin in `dir`: `readme.txt` preferred over
/// `readme.md`, file names matched case-insensitively.
pub fn find_readme(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut candidates: Vec<(u8, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_lowercase();
            let rank = match name.as_str() {
                "readme.txt" => 0,
                "readme.md" => 1,
                _ => return None,
            };
            Some((rank, e.path()))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next().map(|(_, path)| path)
}

/// Rewrite markdown headings and bold labels into readme.txt syntax.
fn markdown_to_txt(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            let level = trimmed.chars().take_while(|c| *c == '#').count();
            if (1..=3).contains(&level) && trimmed[level..].starts_with(' ') {
                let title = trimmed.trim_matches('#').trim();
                let marks = "=".repeat(4 - level);
                return format!("{} {} {}", marks, title, marks);
            }
            match trimmed.strip_prefix("**").and_then(|r| r.split_once(":**")) {
                Some((label, value)) => format!("{}:{}", label, value),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `=== Title ===` → (3, "Title").
fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim();
    let level = trimmed.chars().take_while(|c| *c == '=').count();
    if level == 0 || level > 3 {
        return None;
    }
    let inner = trimmed.trim_matches('=').trim();
    (!inner.is_empty() && trimmed.ends_with('=')).then_some((level, inner))
}

fn split_csv(value: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(String::from)
        .collect()
}

#[derive(Default)]
struct Parser {
    readme: Readme,
}

impl Parser {
    fn parse(mut self, text: &str) -> Readme {
        let mut lines = text.lines().peekable();

        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }
        match lines.peek().copied().and_then(heading) {
            Some((3, name)) => {
                self.readme.name = name.to_string();
                lines.next();
            }
            _ => {
                self.warn(ReadmeWarning::InvalidPluginNameHeader);
            }
        }

        // Header fields, up to the first blank line after at least one field.
        let mut fields = 0;
        while let Some(&line) = lines.peek() {
            if line.trim().is_empty() {
                lines.next();
                if fields > 0 {
                    break;
                }
                continue;
            }
            if heading(line).is_some() {
                break;
            }
            let Some((key, value)) = line.split_once(':') else {
                break;
            };
            if !self.field(key.trim(), value.trim()) && fields == 0 {
                break;
            }
            fields += 1;
            lines.next();
        }

        // Everything up to the first section is the short description.
        let mut short = Vec::new();
        while let Some(&line) = lines.peek() {
            if heading(line).is_some_and(|(level, _)| level == 2) {
                break;
            }
            short.push(line.trim());
            lines.next();
        }
        self.short_description(&short.join(" "));

        let mut current: Option<(String, Vec<&str>)> = None;
        for line in lines {
            if let Some((2, title)) = heading(line) {
                if let Some((title, body)) = current.take() {
                    self.section(title, &body);
                }
                current = Some((title.to_lowercase(), Vec::new()));
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line);
            }
        }
        if let Some((title, body)) = current {
            self.section(title, &body);
        }

        self.readme
    }

    fn warn(&mut self, warning: ReadmeWarning) {
        self.readme.warnings.insert(warning);
    }

    /// Apply a header field; returns false for unknown fields.
    fn field(&mut self, key: &str, value: &str) -> bool {
        match key.to_lowercase().as_str() {
            "contributors" => self.readme.contributors = split_csv(value),
            "tags" => self.tags(value),
            "donate link" => self.readme.donate_link = value.to_string(),
            "requires at least" => {
                if WP_VERSION.is_match(value) {
                    self.readme.requires = value.to_string();
                } else {
                    self.warn(ReadmeWarning::RequiresHeaderIgnored);
                }
            }
            "tested up to" | "tested" => {
                if WP_VERSION.is_match(value) {
                    self.readme.tested = value.to_string();
                } else {
                    self.warn(ReadmeWarning::TestedHeaderIgnored);
                }
            }
            "requires php" => {
                if PHP_VERSION.is_match(value) {
                    self.readme.requires_php = value.to_string();
                } else {
                    self.warn(ReadmeWarning::RequiresPhpHeaderIgnored);
                }
            }
            "stable tag" => self.readme.stable_tag = value.to_string(),
            "license" => self.readme.license = value.to_string(),
            "license uri" => self.readme.license_uri = value.to_string(),
            _ => return false,
        }
        true
    }

    fn tags(&mut self, value: &str) {
        let mut tags = split_csv(value);
        let before = tags.len();
        tags.retain(|t| !IGNORED_TAGS.contains(&t.to_lowercase().as_str()));
        if tags.len() != before {
            self.warn(ReadmeWarning::IgnoredTags);
        }
        if tags.len() > MAX_TAGS {
            tags.truncate(MAX_TAGS);
            self.warn(ReadmeWarning::TooManyTags);
        }
        self.readme.tags = tags;
    }

    fn short_description(&mut self, raw: &str) {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            self.warn(ReadmeWarning::NoShortDescriptionPresent);
            return;
        }
        if collapsed.chars().count() > MAX_SHORT_DESCRIPTION {
            self.warn(ReadmeWarning::TrimmedShortDescription);
            self.readme.short_description = collapsed.chars().take(MAX_SHORT_DESCRIPTION).collect();
        } else {
            self.readme.short_description = collapsed;
        }
    }

    fn section(&mut self, title: String, body: &[&str]) {
        let title = match title.as_str() {
            "frequently asked questions" => "faq".to_string(),
            _ => title,
        };
        if title == "upgrade notice" {
            self.upgrade_notices(body);
        }
        let text = body.join("\n").trim().to_string();
        self.readme.sections.insert(title, text);
    }

    fn upgrade_notices(&mut self, body: &[&str]) {
        let mut version: Option<&str> = None;
        let mut text: Vec<&str> = Vec::new();
        for line in body {
            if let Some((1, v)) = heading(line) {
                if let Some(v) = version.take() {
                    self.notice(v, &text);
                }
                version = Some(v);
                text.clear();
            } else if version.is_some() {
                text.push(line.trim());
            }
        }
        if let Some(v) = version {
            self.notice(v, &text);
        }
    }

    fn notice(&mut self, version: &str, text: &[&str]) {
        let notice = text.join(" ").trim().to_string();
        self.readme
            .upgrade_notice
            .insert(version.to_string(), notice);
    }
}

#[cfg(test)]
#[path = "readme_tests.rs"]
mod tests;
