//! Ledger summary type

use rust_decimal::Decimal;
use serde::Serialize;

/// Headline figures for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LedgerSummary {
    /// Sum of all expense amounts
    pub total_amount: Decimal,
    pub expense_count: usize,
    pub participant_count: usize,
}
