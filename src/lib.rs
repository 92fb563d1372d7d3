//! FairShare expense splitting library
//! # Overview
//!
//! This library turns a list of participants and shared expenses into
//! per-person balances and a short list of "who pays whom" transfers.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Participant, Expense, BalanceSheet, Transfer, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::aggregator`] - Paid / owed / net computation
//!   - [`core::ledger`] - Session bookkeeping and validation
//!   - [`core::engine`] - Record import and report assembly
//! - [`strategy`] - Settlement strategies (greedy and optimal)
//! - [`io`] - CSV ingestion and report writers
//! - [`pipeline`] - End-to-end file processing used by the binary
//!
//! # Split Modes
//!
//! - **Equal**: the amount is divided evenly among the expense's participants
//! - **Custom**: each participant owes an explicit amount
//!
//! # Balances
//!
//! Each participant has:
//! - `paid`: total of the expenses they paid for
//! - `owed`: total of their shares
//! - `net`: `paid - owed`; positive means others owe them
//!
//! Balances within one cent of zero count as settled.
//!
//! # Example
//!
//! ```
//! use fairshare::core::Ledger;
//! use fairshare::strategy::GreedyStrategy;
//! use fairshare::types::ExpenseDraft;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = Ledger::new();
//! let a = ledger.add_participant("A").unwrap();
//! let b = ledger.add_participant("B").unwrap();
//! let c = ledger.add_participant("C").unwrap();
//! ledger
//!     .add_expense(ExpenseDraft::equal("Dinner", Decimal::new(300, 0), a, vec![a, b, c]))
//!     .unwrap();
//!
//! let transfers = ledger.settle(&GreedyStrategy);
//! assert_eq!(transfers[0].display_line("₹"), "B pays A ₹100.00");
//! assert_eq!(transfers[1].display_line("₹"), "C pays A ₹100.00");
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod strategy;
pub mod types;

pub use core::{compute_balances, Ledger, SettlementEngine, SettlementReport};
pub use io::{write_report, ReportConfig};
pub use pipeline::process_files;
pub use strategy::{create_strategy, GreedyStrategy, OptimalStrategy, SettlementStrategy};
pub use types::{
    Balance, BalanceSheet, Expense, ExpenseDraft, ExpenseId, LedgerSummary, Participant,
    ParticipantId, SplitError, SplitMode, Transfer,
};
