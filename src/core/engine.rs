//! Settlement engine
//!
//! Owns a [`Ledger`] together with the selected settlement strategy and turns
//! streams of imported records into a [`SettlementReport`].
//!
//! Import is lenient at the record level: a row that fails conversion or
//! validation is logged and skipped, and the rest of the file still counts.
//! Only fatal errors (the underlying reader failing) stop the import.

use crate::core::ledger::Ledger;
use crate::io::csv_format::ExpenseRecord;
use crate::strategy::SettlementStrategy;
use crate::types::{BalanceSheet, LedgerSummary, Participant, SplitError, Transfer};
use serde::Serialize;
use tracing::{debug, warn};

/// Everything a caller needs to present a settlement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementReport {
    pub summary: LedgerSummary,
    pub balances: BalanceSheet,
    pub settlements: Vec<Transfer>,
}

/// Ledger plus settlement strategy
pub struct SettlementEngine {
    ledger: Ledger,
    strategy: Box<dyn SettlementStrategy>,
}

impl SettlementEngine {
    /// Create an engine with an empty ledger
    pub fn new(strategy: Box<dyn SettlementStrategy>) -> Self {
        SettlementEngine {
            ledger: Ledger::new(),
            strategy,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Import participants, returning how many were accepted
    ///
    /// # Errors
    ///
    /// Returns the first fatal error from the record source. Conversion and
    /// validation errors are logged at `warn` and the record is skipped.
    pub fn load_participants<I>(&mut self, records: I) -> Result<usize, SplitError>
    where
        I: IntoIterator<Item = Result<Participant, SplitError>>,
    {
        let mut accepted = 0;
        for record in records {
            let result = record.and_then(|p| self.ledger.insert_participant(p));
            if Self::keep_going(result, "participant")? {
                accepted += 1;
            }
        }
        debug!(accepted, "Loaded participants");
        Ok(accepted)
    }

    /// Import expenses, returning how many were accepted
    ///
    /// Participants must be loaded first; an expense that references an
    /// unknown payer or participant is rejected by the ledger.
    ///
    /// # Errors
    ///
    /// Same as [`SettlementEngine::load_participants`].
    pub fn load_expenses<I>(&mut self, records: I) -> Result<usize, SplitError>
    where
        I: IntoIterator<Item = Result<ExpenseRecord, SplitError>>,
    {
        let mut accepted = 0;
        for record in records {
            let result = record.and_then(|r| self.ledger.insert_expense(r.id, r.draft));
            if Self::keep_going(result, "expense")? {
                accepted += 1;
            }
        }
        debug!(accepted, "Loaded expenses");
        Ok(accepted)
    }

    /// Balances and settlements for the current ledger
    pub fn report(&self) -> SettlementReport {
        let balances = self.ledger.balances();
        let settlements = self.strategy.settle(&balances);
        debug!(
            strategy = self.strategy.name(),
            transfers = settlements.len(),
            "Computed settlement"
        );

        SettlementReport {
            summary: self.ledger.summary(),
            balances,
            settlements,
        }
    }

    // Ok(true) when accepted, Ok(false) when skipped, Err when fatal
    fn keep_going(result: Result<(), SplitError>, kind: &str) -> Result<bool, SplitError> {
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Skipping {}: {}", kind, e);
                Ok(false)
            }
        }
    }
}
