//! FairShare CLI
//!
//! Command-line interface for settling shared expenses from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- participants.csv expenses.csv > report.csv
//! cargo run -- --strategy optimal participants.csv expenses.csv
//! cargo run -- --format text --currency '$' participants.csv expenses.csv
//! cargo run -- --report settlements --format json participants.csv expenses.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr and are controlled with
//! `RUST_LOG` (default `fairshare=warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, write failure)

use fairshare::cli;
use fairshare::pipeline;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fairshare=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = cli::parse_args();
    let config = args.to_report_config();

    let mut output = std::io::stdout();
    if let Err(e) = pipeline::process_files(
        &args.participants_file,
        &args.expenses_file,
        args.strategy,
        &config,
        &mut output,
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
