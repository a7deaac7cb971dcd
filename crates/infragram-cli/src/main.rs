use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use infragram_cli::{Args, error_adapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Infragram");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = infragram_cli::run(&args) {
        for reportable in error_adapter::to_reportables(&err) {
            let report = error_adapter::render_report(&reportable);
            error!("Failed\n{report}");
        }
        process::exit(1);
    }

    info!("Completed successfully");
}
