//! Settlement strategy module
//!
//! This module defines the Strategy pattern for turning a balance sheet into a
//! list of transfers. Two strategies are available and selected at runtime:
//!
//! - `greedy` - pairs the first outstanding creditor with the first outstanding
//!   debtor, in participant order (default)
//! - `optimal` - finds the minimum number of transfers by partitioning balances
//!   into as many zero-sum groups as possible

use crate::cli::StrategyType;
use crate::types::{BalanceSheet, Transfer};

pub mod greedy;
pub mod optimal;

pub use greedy::GreedyStrategy;
pub use optimal::OptimalStrategy;

/// Settlement strategy trait
///
/// Implementations must be pure: the same sheet always yields the same
/// transfers in the same order, and every transfer amount is positive and
/// rounded to cents.
pub trait SettlementStrategy: Send + Sync {
    /// Produce transfers that bring every balance to (approximately) zero
    ///
    /// Participants within one cent of zero are treated as settled. If every
    /// participant is settled the result is empty.
    fn settle(&self, balances: &BalanceSheet) -> Vec<Transfer>;

    /// Strategy name used in logs
    fn name(&self) -> &'static str;
}

/// Create a settlement strategy based on the specified strategy type
pub fn create_strategy(strategy_type: StrategyType) -> Box<dyn SettlementStrategy> {
    match strategy_type {
        StrategyType::Greedy => Box::new(GreedyStrategy),
        StrategyType::Optimal => Box::new(OptimalStrategy::default()),
    }
}
