//! Growl Reporter - test results reporter with desktop notifications
//!
//! Consumes the lifecycle events of an external test runner, prints
//! progress and failure details, and sends one desktop notification when
//! the run completes.
//!
//! ## Features
//!
//! - Per-module progress markers and detailed assertion failures
//! - Detection of tests that start but never signal completion
//! - Test selection by name or full name
//! - Growl notifications, or log-only mode
//!
//! ## Usage
//!
//! ```bash
//! # Report a run piped from the runner
//! my-runner --events | growl-reporter run
//!
//! # Replay recorded per-module event logs
//! growl-reporter run math.ndjson strings.ndjson
//!
//! # Only run one test, without notifications
//! growl-reporter run --events run.ndjson --testspec adds --no-notify
//! ```

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info, warn};

mod cli;
mod config;
mod error;
mod executor;
mod models;
mod output;
mod reporter;
mod tracker;
mod utils;

use cli::Args;
use config::env::EnvConfig;
use config::ReporterOptions;
use executor::EventStreamRunner;
use reporter::{GrowlNotifier, LogNotifier, Notifier};
use utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let setting = args.log_level.as_deref().or(env.log_level.as_deref());
    match LogLevel::resolve(setting, args.verbose) {
        Ok(level) => init_logger(level)?,
        Err(e) => {
            init_logger(LogLevel::resolve(None, args.verbose)?)?;
            warn!("{e}, using the default log level");
        }
    }

    match args.command {
        cli::Command::Run(run_args) => run_report(run_args, &env).await,
        cli::Command::Info => {
            println!("{}", reporter::INFO);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_report(args: cli::RunArgs, env: &EnvConfig) -> Result<ExitCode> {
    let options = match args.config.as_ref().or(env.config_file.as_ref()) {
        Some(path) => ReporterOptions::load(path)?,
        None => ReporterOptions::load_default()?,
    }
    .with_testspec(args.testspec)
    .with_test_full_spec(args.test_full_spec);

    let notifier: Box<dyn Notifier> = if args.no_notify || !env.notify_or(true) {
        Box::new(LogNotifier)
    } else {
        let icon_dir = args
            .icons
            .or_else(|| env.icon_dir.clone())
            .unwrap_or_else(config::default_icon_dir);
        let mut growl = GrowlNotifier::new(icon_dir);
        if let Some(program) = &env.program {
            growl = growl.with_program(program);
        }
        Box::new(growl)
    };

    let mut runner = match &args.events {
        Some(path) => EventStreamRunner::open(path).await?,
        None => EventStreamRunner::stdin(),
    };

    let outcome = reporter::run(
        &mut runner,
        &args.files,
        Some(options),
        std::io::stdout(),
        notifier,
        |result| {
            if let Err(e) = result {
                debug!("{} ({}/{} failed)", e, e.failures, e.total);
            }
        },
    )
    .await?;

    info!("Run finished: {:?}", outcome);
    if !outcome.is_success() {
        debug!("Exiting with status {}", outcome.exit_code());
    }
    Ok(ExitCode::from(outcome.exit_code()))
}
