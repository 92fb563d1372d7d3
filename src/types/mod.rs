//! Types module
//!
//! Contains core data structures used throughout the application:
//! - `participant`: People taking part in the split
//! - `expense`: Recorded expenses, drafts, and split modes
//! - `balance`: Derived per-participant balances
//! - `transfer`: Suggested settlement payments
//! - `summary`: Headline figures for a session
//! - `money`: Cent rounding and the settlement tolerance
//! - `error`: Error types

pub mod balance;
pub mod error;
pub mod expense;
pub mod money;
pub mod participant;
pub mod summary;
pub mod transfer;

pub use balance::{Balance, BalanceSheet, Standing};
pub use error::SplitError;
pub use expense::{Expense, ExpenseDraft, ExpenseId, SplitMode};
pub use participant::{Participant, ParticipantId};
pub use summary::LedgerSummary;
pub use transfer::Transfer;
