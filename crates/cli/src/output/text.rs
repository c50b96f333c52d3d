// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! Messages are grouped per file:
//! ```text
//! FILE: readme.txt
//! 0:0 ERROR no_license Your plugin has no license declared. ...
//! 12:5 WARNING WordPress.WP.I18n.MissingTranslatorsComment ...
//!
//! 1 error, 1 warning
//! ```

use std::collections::BTreeSet;
use std::io::{self, Write};

use termcolor::{ColorChoice, StandardStream, WriteColor};

use super::{CategoryInfo, CheckInfo};
use crate::check::{ExecutionMode, Stability};
use crate::color::scheme;
use crate::result::{CheckResult, Message, Messages};

/// One row of a file listing, errors before warnings on the same spot.
struct Row<'a> {
    line: u32,
    column: u32,
    is_error: bool,
    message: &'a Message,
}

fn rows<'a>(errors: &'a Messages, warnings: &'a Messages, file: &str) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    for (is_error, messages) in [(true, errors), (false, warnings)] {
        let Some(lines) = messages.get(file) else {
            continue;
        };
        for (line, columns) in lines {
            for (column, list) in columns {
                rows.extend(list.iter().map(|message| Row {
                    line: *line,
                    column: *column,
                    is_error,
                    message,
                }));
            }
        }
    }
    // Stable sort keeps errors ahead of warnings at equal positions.
    rows.sort_by_key(|r| (r.line, r.column));
    rows
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
}

impl TextFormatter<StandardStream> {
    pub fn stdout(color_choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(color_choice))
    }
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_result(&mut self, result: &CheckResult) -> io::Result<()> {
        if result.is_empty() {
            self.out.set_color(&scheme::pass())?;
            write!(self.out, "Success")?;
            self.out.reset()?;
            writeln!(self.out, ": Checks complete. No errors found.")?;
            return Ok(());
        }

        let files: BTreeSet<&String> = result
            .errors()
            .keys()
            .chain(result.warnings().keys())
            .collect();
        for file in files {
            self.write_file(result, file)?;
        }

        writeln!(
            self.out,
            "{}, {}",
            plural(result.error_count(), "error"),
            plural(result.warning_count(), "warning")
        )?;
        Ok(())
    }

    fn write_file(&mut self, result: &CheckResult, file: &str) -> io::Result<()> {
        write!(self.out, "FILE: ")?;
        self.out.set_color(&scheme::path())?;
        writeln!(self.out, "{}", file)?;
        self.out.reset()?;

        for row in rows(result.errors(), result.warnings(), file) {
            self.out.set_color(&scheme::line_number())?;
            write!(self.out, "{}:{}", row.line, row.column)?;
            self.out.reset()?;
            write!(self.out, " ")?;
            if row.is_error {
                self.out.set_color(&scheme::error())?;
                write!(self.out, "ERROR")?;
            } else {
                self.out.set_color(&scheme::warning())?;
                write!(self.out, "WARNING")?;
            }
            self.out.reset()?;
            write!(self.out, " ")?;
            self.out.set_color(&scheme::code())?;
            write!(self.out, "{}", row.message.code)?;
            self.out.reset()?;
            writeln!(self.out, " {}", row.message.message)?;
            if let Some(link) = &row.message.link {
                writeln!(self.out, "    {}", link)?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_checks(&mut self, checks: &[CheckInfo]) -> io::Result<()> {
        let width = checks.iter().map(|c| c.slug.len()).max().unwrap_or(0);
        for check in checks {
            self.out.set_color(&scheme::code())?;
            write!(self.out, "{:width$}", check.slug, width = width)?;
            self.out.reset()?;

            let mode = match check.mode {
                ExecutionMode::Static => "static",
                ExecutionMode::Runtime => "runtime",
            };
            let categories: Vec<&str> = check.categories.iter().map(|c| c.as_str()).collect();
            write!(self.out, "  {:7}  {}", mode, categories.join(","))?;
            if check.stability == Stability::Experimental {
                self.out.set_color(&scheme::warning())?;
                write!(self.out, " (experimental)")?;
                self.out.reset()?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn write_categories(&mut self, categories: &[CategoryInfo]) -> io::Result<()> {
        let width = categories
            .iter()
            .map(|c| c.slug.as_str().len())
            .max()
            .unwrap_or(0);
        for category in categories {
            self.out.set_color(&scheme::code())?;
            write!(self.out, "{:width$}", category.slug.as_str(), width = width)?;
            self.out.reset()?;
            writeln!(self.out, "  {}", category.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
