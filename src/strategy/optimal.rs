//! Minimum-transfer settlement strategy
//!
//! A set of `k` balances that sums to zero can always be settled with `k - 1`
//! transfers, so the fewest transfers for `n` balances is `n - g`, where `g`
//! is the largest number of disjoint zero-sum groups the balances can be
//! partitioned into. Finding `g` is a subset problem; it is solved here with a
//! dynamic program over bitmasks, exact in integer cents.

use crate::strategy::greedy::{settle_in_order, GreedyStrategy, Party};
use crate::strategy::SettlementStrategy;
use crate::types::money::{apportion_cents, to_cents};
use crate::types::{BalanceSheet, Standing, Transfer};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Largest number of unsettled participants the subset search accepts
///
/// The search is `O(2^n * n)` in time and `O(2^n)` in memory.
pub const MAX_OPTIMAL_PARTIES: usize = 20;

/// Settles with the fewest possible transfers
///
/// Falls back to [`GreedyStrategy`] when more than `max_parties` participants
/// are unsettled.
#[derive(Debug, Clone, Copy)]
pub struct OptimalStrategy {
    max_parties: usize,
}

impl Default for OptimalStrategy {
    fn default() -> Self {
        Self {
            max_parties: MAX_OPTIMAL_PARTIES,
        }
    }
}

impl OptimalStrategy {
    /// Create a strategy with a custom search limit
    ///
    /// The limit is capped at [`MAX_OPTIMAL_PARTIES`].
    pub fn with_max_parties(max_parties: usize) -> Self {
        Self {
            max_parties: max_parties.min(MAX_OPTIMAL_PARTIES),
        }
    }
}

impl SettlementStrategy for OptimalStrategy {
    fn settle(&self, balances: &BalanceSheet) -> Vec<Transfer> {
        let open: Vec<_> = balances
            .iter()
            .filter(|b| b.standing() != Standing::Settled)
            .collect();

        if open.len() > self.max_parties {
            warn!(
                parties = open.len(),
                limit = self.max_parties,
                "too many unsettled participants for exact search, using greedy settlement"
            );
            return GreedyStrategy.settle(balances);
        }

        let nets: Vec<Decimal> = open.iter().map(|b| b.net).collect();
        let rounded = apportion_cents(&nets);
        let mut cents = Vec::with_capacity(rounded.len());
        for (balance, amount) in open.iter().zip(&rounded) {
            let Some(amount) = to_cents(*amount) else {
                warn!(
                    participant = balance.participant,
                    "balance out of range, using greedy settlement"
                );
                return GreedyStrategy.settle(balances);
            };
            cents.push(amount);
        }

        let groups = zero_sum_groups(&cents);
        let mut transfers = Vec::new();
        for group in &groups {
            let mut creditors = Vec::new();
            let mut debtors = Vec::new();
            for &i in group {
                let party = Party::new(open[i].name.as_str(), rounded[i], open[i].net);
                if cents[i] > 0 {
                    creditors.push(party);
                } else {
                    debtors.push(party);
                }
            }
            transfers.extend(settle_in_order(creditors, debtors));
        }

        debug!(
            parties = cents.len(),
            groups = groups.len(),
            transfers = transfers.len(),
            "optimal settlement complete"
        );
        transfers
    }

    fn name(&self) -> &'static str {
        "optimal"
    }
}

/// Partition indices into the maximum number of zero-sum groups
///
/// Groups come back ordered by their smallest index, with indices ascending
/// inside each group. If the amounts do not sum to zero, the leftover
/// indices form one extra group with a non-zero sum.
pub(crate) fn zero_sum_groups(cents: &[i64]) -> Vec<Vec<usize>> {
    let n = cents.len();
    if n == 0 {
        return Vec::new();
    }
    let full = (1usize << n) - 1;

    // sums[mask] = total of the amounts selected by mask
    let mut sums = vec![0i128; full + 1];
    for mask in 1..=full {
        let low = mask.trailing_zeros() as usize;
        sums[mask] = sums[mask & (mask - 1)] + i128::from(cents[low]);
    }

    // best[mask] = most zero-sum groups a chain of removals down from mask
    // passes through; removed[mask] = element removed first on that chain
    let mut best = vec![0u8; full + 1];
    let mut removed = vec![0u8; full + 1];
    for mask in 1..=full {
        let mut best_count = 0u8;
        let mut best_bit = mask.trailing_zeros() as u8;
        let mut bits = mask;
        while bits != 0 {
            let bit = bits.trailing_zeros();
            bits &= bits - 1;
            let count = best[mask & !(1 << bit)];
            if count > best_count {
                best_count = count;
                best_bit = bit as u8;
            }
        }
        best[mask] = best_count + u8::from(sums[mask] == 0);
        removed[mask] = best_bit;
    }

    // Walk the chain; each zero-sum mask reached closes a group
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut mask = full;
    while mask != 0 {
        if sums[mask] == 0 && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
        let bit = removed[mask] as usize;
        current.push(bit);
        mask &= !(1 << bit);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    for group in &mut groups {
        group.sort_unstable();
    }
    groups.sort_by_key(|group| group[0]);
    groups
}
