//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Desktop-notifying test results reporter
#[derive(Parser, Debug)]
#[command(name = "growl-reporter")]
#[command(author = "hephaex@gmail.com")]
#[command(version = "0.1.0")]
#[command(about = "Report test runner lifecycle events and notify on completion")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report a test run
    Run(RunArgs),

    /// Print the reporter description
    Info,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Event logs to run, one module per file (reads the module stream when empty)
    pub files: Vec<PathBuf>,

    /// Reporter options file (JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Module event stream to read instead of stdin
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// Only run tests with this name
    #[arg(long)]
    pub testspec: Option<String>,

    /// Only run the test with this full name
    #[arg(long)]
    pub test_full_spec: Option<String>,

    /// Log notifications instead of sending them
    #[arg(long)]
    pub no_notify: bool,

    /// Directory holding success.png and failed.png
    #[arg(long)]
    pub icons: Option<PathBuf>,
}
