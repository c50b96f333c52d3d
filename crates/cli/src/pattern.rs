// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Source patterns for content checks.
//!
//! A pattern compiles to the cheapest matcher that can express it:
//! - Single literal: memchr::memmem
//! - Multiple literals: aho-corasick
//! - Anything else: regex

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use memchr::memmem::Finder;
use regex::Regex;

/// A compiled pattern.
pub enum SourcePattern {
    Literal(Finder<'static>),
    Literals(AhoCorasick),
    Regex(Regex),
}

/// A match located in the scanned content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

impl From<PatternError> for crate::error::Error {
    fn from(e: PatternError) -> Self {
        crate::error::Error::Internal(e.to_string())
    }
}

impl SourcePattern {
    /// Compile `pattern`, picking the matcher from its structure.
    ///
    /// - Plain literal -> memmem finder
    /// - Pure alternation of literals -> Aho-Corasick
    /// - Anything else -> regex
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if is_literal(pattern) {
            Ok(Self::literal(pattern))
        } else if let Some(literals) = alternation_literals(pattern) {
            Self::literals(&literals)
        } else {
            Ok(Self::Regex(Regex::new(pattern)?))
        }
    }

    pub fn literal(pattern: &str) -> Self {
        Self::Literal(Finder::new(pattern.as_bytes()).into_owned())
    }

    /// Any of `patterns`, matched exactly as written.
    pub fn literals<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let automaton = AhoCorasickBuilder::new()
            .build(patterns.iter().map(AsRef::as_ref))
            .map_err(|e| PatternError::InvalidPattern(format!("aho-corasick error: {}", e)))?;
        Ok(Self::Literals(automaton))
    }

    /// Byte ranges of all non-overlapping matches.
    pub fn find_all(&self, content: &str) -> Vec<(usize, usize)> {
        match self {
            Self::Literal(finder) => {
                let len = finder.needle().len();
                finder
                    .find_iter(content.as_bytes())
                    .map(|start| (start, start + len))
                    .collect()
            }
            Self::Literals(automaton) => automaton
                .find_iter(content)
                .map(|m| (m.start(), m.end()))
                .collect(),
            Self::Regex(regex) => regex
                .find_iter(content)
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }

    pub fn is_match(&self, content: &str) -> bool {
        match self {
            Self::Literal(finder) => finder.find(content.as_bytes()).is_some(),
            Self::Literals(automaton) => automaton.is_match(content),
            Self::Regex(regex) => regex.is_match(content),
        }
    }

    /// All matches with line and column.
    pub fn locate_all(&self, content: &str) -> Vec<Located> {
        self.find_all(content)
            .into_iter()
            .map(|(start, end)| {
                let (line, column) = line_column(content, start);
                Located {
                    line,
                    column,
                    text: content[start..end].to_string(),
                }
            })
            .collect()
    }

    /// The first match with line and column.
    pub fn locate_first(&self, content: &str) -> Option<Located> {
        self.locate_all(content).into_iter().next()
    }
}

/// Check if pattern is a plain literal (no regex metacharacters).
fn is_literal(pattern: &str) -> bool {
    !pattern.is_empty()
        && !pattern.chars().any(|c| {
            matches!(
                c,
                '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
            )
        })
}

/// Literals of a pattern like "foo|bar|baz", if it is nothing more.
fn alternation_literals(pattern: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = pattern.split('|').collect();
    if parts.len() < 2 || !parts.iter().all(|p| is_literal(p)) {
        return None;
    }
    Some(parts.into_iter().map(String::from).collect())
}

/// 1-based line and character column of a byte offset.
pub fn line_column(content: &str, offset: usize) -> (u32, u32) {
    let before = &content[..offset];
    let line = memchr::memchr_iter(b'\n', before.as_bytes()).count() as u32 + 1;
    let line_start = memchr::memrchr(b'\n', before.as_bytes()).map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() as u32 + 1;
    (line, column)
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
