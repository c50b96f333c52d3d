// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check command implementation.

use std::sync::Arc;

use plugin_check::cli::{CheckArgs, Cli, OutputFormat};
use plugin_check::color::resolve_color;
use plugin_check::error::ExitCode;
use plugin_check::host::Host;
use plugin_check::linter::Linter;
use plugin_check::output::json::JsonFormatter;
use plugin_check::output::text::TextFormatter;
use plugin_check::runner::{CheckRunner, CliSource};
use plugin_check::session::Session;

/// Run the check command.
pub fn run(cli: &Cli, args: &CheckArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let session = Session::load(cli.config.as_deref(), &cwd)?;

    let host: Arc<dyn Host> = Arc::new(session.open_host()?);
    let linter: Arc<dyn Linter> = Arc::new(session.linter());
    let repository = Arc::new(session.repository(&host, linter)?);
    tracing::trace!("check command starting for {}", args.plugin);

    let source = CliSource::from_env().with_check_args(args);
    let mut runner =
        CheckRunner::new(host, repository, source).with_settings(session.runner_settings());
    let result = runner
        .execute()?
        .without(args.ignore_warnings, args.ignore_errors);

    match args.format {
        OutputFormat::Text => {
            TextFormatter::stdout(resolve_color(cli.color)).write_result(&result)?
        }
        OutputFormat::Json => JsonFormatter::stdout().write_result(&result)?,
    }

    Ok(if result.error_count() > 0 {
        ExitCode::CheckFailed
    } else {
        ExitCode::Success
    })
}
