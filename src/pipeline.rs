//! File-to-report pipeline
//!
//! Streams the participants file and then the expenses file through a
//! [`SettlementEngine`], settles with the requested strategy, and writes the
//! report. This is what the binary runs; it is public so the same flow can be
//! driven from tests and other front ends.

use crate::cli::StrategyType;
use crate::core::{SettlementEngine, SettlementReport};
use crate::io::csv_format::ExpenseRecord;
use crate::io::reader::RecordReader;
use crate::io::report::{write_report, ReportConfig};
use crate::strategy::create_strategy;
use crate::types::{Participant, SplitError};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Process both input files and write the report to `output`
///
/// Returns the computed report so callers can inspect it after writing.
///
/// # Errors
///
/// - `FileNotFound` / `IoError` if either file cannot be read
/// - `IoError` if writing the report fails
///
/// Individual malformed or invalid rows are skipped with a warning.
pub fn process_files(
    participants_path: &Path,
    expenses_path: &Path,
    strategy: StrategyType,
    config: &ReportConfig,
    output: &mut dyn Write,
) -> Result<SettlementReport, SplitError> {
    let mut engine = SettlementEngine::new(create_strategy(strategy));

    let participants = RecordReader::<_, Participant>::open(participants_path)?;
    let people = engine.load_participants(participants)?;
    if !engine.ledger().can_add_expenses() {
        warn!(
            participants = people,
            "Fewer than two participants, nothing can be split"
        );
    }

    let expenses = RecordReader::<_, ExpenseRecord>::open(expenses_path)?;
    let recorded = engine.load_expenses(expenses)?;
    info!(
        participants = people,
        expenses = recorded,
        strategy = engine.strategy_name(),
        "Loaded session"
    );

    let report = engine.report();
    write_report(&report, config, output)?;

    Ok(report)
}
