// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON output formatter.
//!
//! Results serialize as `{errors, warnings, error_count, warning_count}`.
//! Output is buffered and written at the end.

use std::io::{self, Write};

use serde::Serialize;

use super::{CategoryInfo, CheckInfo};
use crate::result::CheckResult;

/// JSON output formatter.
pub struct JsonFormatter<W: Write> {
    out: W,
}

impl JsonFormatter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_result(&mut self, result: &CheckResult) -> io::Result<()> {
        self.write_value(result)
    }

    pub fn write_checks(&mut self, checks: &[CheckInfo]) -> io::Result<()> {
        self.write_value(checks)
    }

    pub fn write_categories(&mut self, categories: &[CategoryInfo]) -> io::Result<()> {
        self.write_value(categories)
    }

    fn write_value<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        writeln!(self.out, "{}", json)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
