// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Plugin check error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A check was registered under a slug that is already taken.
    #[error("check slug \"{slug}\" is already registered")]
    DuplicateCheck { slug: String },

    /// A check was registered without any category.
    #[error("check \"{slug}\" must declare at least one category")]
    MissingCategories { slug: String },

    /// A required check slug does not exist.
    #[error("check with the slug \"{0}\" does not exist")]
    UnknownCheck(String),

    /// The plugin to check could not be resolved or was tampered with.
    #[error("invalid plugin: {0}")]
    InvalidPlugin(String),

    /// The requested check slugs changed between detection and run.
    #[error("invalid checks: {0}")]
    InvalidChecks(String),

    /// A check was explicitly requested but cannot run in this environment.
    #[error("check \"{slug}\" cannot run: {reason}")]
    CheckUnavailable { slug: String, reason: String },

    /// An environment preparation could not be applied.
    #[error("preparation {name} failed: {message}")]
    Preparation { name: &'static str, message: String },

    /// A check aborted with a failure unrelated to its findings.
    #[error("check \"{slug}\" failed: {source}")]
    CheckFailed {
        slug: String,
        #[source]
        source: Box<Error>,
    },

    /// The host runtime rejected an operation.
    #[error("host error: {0}")]
    Host(String),

    /// The external linter could not be run or returned garbage.
    #[error("linter error: {message}")]
    Linter { message: String },

    /// Configuration file not found or invalid
    #[error("config error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid command-line arguments
    #[error("argument error: {0}")]
    Argument(String),

    /// File I/O error
    #[error("io error: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Internal error (bug)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type using the plugin check Error
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Run completed without error-level messages
    Success = 0,
    /// One or more error-level messages were recorded
    CheckFailed = 1,
    /// Configuration, argument or resolution error
    ConfigError = 2,
    /// Host, linter, preparation or internal failure
    InternalError = 3,
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::DuplicateCheck { .. }
            | Error::MissingCategories { .. }
            | Error::UnknownCheck(_)
            | Error::InvalidPlugin(_)
            | Error::InvalidChecks(_)
            | Error::CheckUnavailable { .. }
            | Error::Config { .. }
            | Error::Argument(_) => ExitCode::ConfigError,
            Error::Preparation { .. }
            | Error::CheckFailed { .. }
            | Error::Host(_)
            | Error::Linter { .. }
            | Error::Io { .. }
            | Error::Internal(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
