// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! plugin-check CLI entry point.

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt};

use plugin_check::cli::{Cli, Command};
use plugin_check::env;
use plugin_check::error::ExitCode;

mod cmd_check;
mod cmd_list;

fn init_logging() {
    let filter = EnvFilter::try_from_env(env::log_var()).unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("plugin-check: {}", e);
            match e.downcast_ref::<plugin_check::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::Success)
        }
        Some(Command::Check(args)) => cmd_check::run(&cli, args),
        Some(Command::ListChecks(args)) => cmd_list::checks(&cli, args),
        Some(Command::ListCategories(args)) => cmd_list::categories(&cli, args),
    }
}
