//! phasecam binary entry point.
//!
//! Parses the command line, configures logging and color, and dispatches to
//! the subcommand implementations. Exit status is 0 on success and 1 on any
//! failure; detected motion is a result, not a failure.

use clap::Parser;
use log::LevelFilter;
use std::process;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

/// Maps the `-v` count onto a log level for the env_logger backend.
/// `RUST_LOG`, when set, still takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args, cli.verbose > 0),
        Commands::Compare(args) => commands::compare::run_compare(args),
    };

    if let Err(error) = result {
        output::print_error(&error.to_string());
        process::exit(1);
    }
}
