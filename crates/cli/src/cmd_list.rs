// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `list-checks` and `list-categories`.

use std::sync::Arc;

use plugin_check::categories::{Categories, Category, filter_checks_by_categories};
use plugin_check::cli::{Cli, ListCategoriesArgs, ListChecksArgs, OutputFormat};
use plugin_check::color::resolve_color;
use plugin_check::error::ExitCode;
use plugin_check::host::{Host, MemoryHost};
use plugin_check::linter::Linter;
use plugin_check::output::json::JsonFormatter;
use plugin_check::output::text::TextFormatter;
use plugin_check::output::{CategoryInfo, CheckInfo};
use plugin_check::repository::CheckFlags;
use plugin_check::session::Session;

pub fn checks(cli: &Cli, args: &ListChecksArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let session = Session::load(cli.config.as_deref(), &cwd)?;

    // Listing reads metadata only, so no install is required.
    let host: Arc<dyn Host> = match session.open_host() {
        Ok(host) => Arc::new(host),
        Err(e) => {
            tracing::debug!("listing without an install: {}", e);
            Arc::new(MemoryHost::new(session.wordpress_root()))
        }
    };
    let linter: Arc<dyn Linter> = Arc::new(session.linter());
    let repository = session.repository(&host, linter)?;

    let mut collection =
        repository.get_checks(CheckFlags::ALL.with_experimental(args.include_experimental));
    if let Some(list) = &args.categories {
        let categories: Vec<Category> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Category::from)
            .collect();
        collection = filter_checks_by_categories(&collection, &categories);
    }
    let info = CheckInfo::from_collection(&collection);

    match args.format {
        OutputFormat::Text => TextFormatter::stdout(resolve_color(cli.color)).write_checks(&info)?,
        OutputFormat::Json => JsonFormatter::stdout().write_checks(&info)?,
    }
    Ok(ExitCode::Success)
}

pub fn categories(cli: &Cli, args: &ListCategoriesArgs) -> anyhow::Result<ExitCode> {
    let info = CategoryInfo::from_categories(&Categories::new());
    match args.format {
        OutputFormat::Text => {
            TextFormatter::stdout(resolve_color(cli.color)).write_categories(&info)?
        }
        OutputFormat::Json => JsonFormatter::stdout().write_categories(&info)?,
    }
    Ok(ExitCode::Success)
}
