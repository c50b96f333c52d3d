// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin check library.
//!
//! Runs static and runtime checks against a WordPress plugin and collects
//! errors and warnings per file, line and column.

pub mod categories;
pub mod check;
pub mod checks;
pub mod cli;
pub mod collection;
pub mod color;
pub mod config;
pub mod discovery;
pub mod env;
pub mod error;
pub mod host;
pub mod linter;
pub mod orchestrator;
pub mod output;
pub mod pattern;
pub mod plugin;
pub mod preparation;
pub mod readme;
pub mod repository;
pub mod result;
pub mod runner;
pub mod session;
pub mod walker;

pub use categories::{Categories, Category};
pub use check::{Check, CheckContext, ExecutionMode, Stability};
pub use cli::{CheckArgs, Cli, Command, OutputFormat};
pub use collection::CheckCollection;
pub use color::ColorMode;
pub use error::{Error, ExitCode, Result};
pub use host::{Host, LocalHost, MemoryHost};
pub use repository::{CheckFlags, CheckRepository};
pub use result::{CheckResult, Message, MessageArgs};
pub use runner::{CheckRunner, CliSource, RunnerSource};
pub use walker::{FileWalker, Walked, WalkedFile, WalkerConfig};

#[cfg(test)]
pub mod test_utils;
