//! tt - Tiny Task Tracker CLI
//!
//! A personal task tracker: add, list, filter, complete, archive and
//! export tasks kept in a flat JSON file on local disk.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tt::cli::Cli;
use tt::output::{emit_error, infer_command_name_from_args};

fn main() {
    // Logging is opt-in via RUST_LOG and goes to stderr, keeping stdout
    // clean for --json consumers.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();

    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
