//! Core business logic module
//!
//! This module contains the settlement components:
//! - `aggregator` - Balance computation from participants and expenses
//! - `ledger` - Session bookkeeping with validation and cascading deletion
//! - `engine` - Record import and report assembly

pub mod aggregator;
pub mod engine;
pub mod ledger;

pub use aggregator::compute_balances;
pub use engine::{SettlementEngine, SettlementReport};
pub use ledger::Ledger;
