//! Wirekit CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{Level, LevelFilter, debug, error, info, log};

use wirekit_cli::{
    Args,
    error_adapter::{Reportable, diagnostics_to_reportables, to_reportables},
};

/// Render `reportables` through miette, one log record each.
fn report(reportables: &[Reportable<'_>]) {
    let reporter = miette::GraphicalReportHandler::new();

    for reportable in reportables {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, reportable).is_err() {
            writer = reportable.to_string();
        }

        let level = if reportable.is_error() {
            Level::Error
        } else {
            Level::Warn
        };
        log!(level, "{writer}");
    }
}

fn main() {
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

    info!(log_level:?; "Starting Wirekit");
    debug!(args:?; "Parsed arguments");

    match wirekit_cli::run(&args) {
        Ok(outcome) => {
            report(&diagnostics_to_reportables(&outcome.diagnostics, &outcome.source));
            if outcome.has_errors() {
                error!(input = args.input; "Source has errors");
                process::exit(1);
            }
        }
        Err(err) => {
            report(&to_reportables(&err));
            process::exit(1);
        }
    }

    info!("Completed successfully");
}
