//! Greedy settlement strategy
//!
//! Repeatedly settles the first outstanding creditor against the first
//! outstanding debtor. Not guaranteed to minimize the number of transfers,
//! but simple, stable, and fully determined by participant order.

use crate::strategy::SettlementStrategy;
use crate::types::money::{apportion_cents, SETTLEMENT_TOLERANCE};
use crate::types::{BalanceSheet, Standing, Transfer};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use tracing::debug;

/// A participant with an outstanding amount to pay or receive
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Party {
    pub name: String,

    /// Outstanding whole cents still to move
    pub cents: Decimal,

    /// Outstanding exact amount, used for the tolerance check
    pub exact: Decimal,
}

impl Party {
    /// `cents` is the party's balance rounded to cents, `exact` the unrounded one
    pub(crate) fn new(name: impl Into<String>, cents: Decimal, exact: Decimal) -> Self {
        Party {
            name: name.into(),
            cents: cents.abs(),
            exact: exact.abs(),
        }
    }

    fn take(&mut self, amount: Decimal) {
        self.cents -= amount;
        self.exact -= amount;
    }

    /// Nothing left to move, or what is left is within one cent
    ///
    /// A remaining cent is only forgiven when the exact amount really is that
    /// cent; a rounded-up cent on a fractional balance is still moved.
    fn is_done(&self) -> bool {
        self.cents <= Decimal::ZERO
            || (self.exact <= SETTLEMENT_TOLERANCE && self.cents <= self.exact)
    }
}

/// Split a sheet into creditors and debtors, keeping participant order
///
/// Participants within the settlement tolerance appear in neither list. The
/// others are rounded to cents together with [`apportion_cents`], so their
/// rounded balances still sum to the rounded total.
pub(crate) fn partition(balances: &BalanceSheet) -> (Vec<Party>, Vec<Party>) {
    let open: Vec<_> = balances
        .iter()
        .filter(|b| b.standing() != Standing::Settled)
        .collect();
    let nets: Vec<Decimal> = open.iter().map(|b| b.net).collect();

    let mut creditors = Vec::new();
    let mut debtors = Vec::new();
    for (balance, cents) in open.into_iter().zip(apportion_cents(&nets)) {
        let party = Party::new(balance.name.clone(), cents, balance.net);
        match balance.standing() {
            Standing::Creditor => creditors.push(party),
            _ => debtors.push(party),
        }
    }

    (creditors, debtors)
}

/// Pair creditors and debtors front to front until one side runs out
///
/// Each step moves `min(creditor, debtor)` cents from the debtor to the
/// creditor. A party leaves its queue once it has nothing left to move, or
/// once its exact remainder is a cent or less and covers what is left. Every
/// step removes at least one party, so `n` parties produce at most `n - 1`
/// transfers.
pub(crate) fn settle_in_order(creditors: Vec<Party>, debtors: Vec<Party>) -> Vec<Transfer> {
    let mut creditors: VecDeque<Party> = creditors.into();
    let mut debtors: VecDeque<Party> = debtors.into();
    let mut transfers = Vec::new();

    while let (Some(creditor), Some(debtor)) = (creditors.front_mut(), debtors.front_mut()) {
        let amount = creditor.cents.min(debtor.cents);
        if amount <= Decimal::ZERO {
            break;
        }
        transfers.push(Transfer::new(
            debtor.name.clone(),
            creditor.name.clone(),
            amount,
        ));

        creditor.take(amount);
        debtor.take(amount);
        let creditor_done = creditor.is_done();
        let debtor_done = debtor.is_done();

        if creditor_done {
            creditors.pop_front();
        }
        if debtor_done {
            debtors.pop_front();
        }
    }

    transfers
}

/// First-come pairing of creditors and debtors
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

impl SettlementStrategy for GreedyStrategy {
    fn settle(&self, balances: &BalanceSheet) -> Vec<Transfer> {
        let (creditors, debtors) = partition(balances);
        let transfers = settle_in_order(creditors, debtors);
        debug!(transfers = transfers.len(), "greedy settlement complete");
        transfers
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
