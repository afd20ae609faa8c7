//! `orgpages` command line entry point.
//!
//! Imports organizations into local storage and renders extension page
//! routes against them, printing the render decision as JSON.

mod args;
mod commands;

use anyhow::Result;
use args::{Arguments, Command};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(Arguments::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Arguments) -> Result<()> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args
            .log_level
            .as_deref()
            .unwrap_or_else(|| orgpages_core::default_log_level());
        orgpages_core::init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    match args.command {
        Command::Import { file } => commands::import(&args.db, &file),
        Command::Render { url, refresh } => commands::render(&args.db, &url, refresh),
        Command::List => commands::list(&args.db),
    }
}
