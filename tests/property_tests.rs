//! Property-based tests for settlement invariants
//!
//! Sessions are generated as a participant count plus a list of expenses
//! `(payer, sharing mask, amount)`. Two amount shapes are used:
//! - whole-unit shares, where every equal share is an integer so balances sum
//!   to exactly zero
//! - arbitrary cent amounts, where equal shares may not divide evenly

use fairshare::core::Ledger;
use fairshare::strategy::{GreedyStrategy, OptimalStrategy, SettlementStrategy};
use fairshare::types::money::round_to_cents;
use fairshare::types::{BalanceSheet, ExpenseDraft, ParticipantId, Transfer};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

type RawExpense = (usize, u32, i64);

fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn ids_in_mask(ids: &[ParticipantId], mask: u32) -> Vec<ParticipantId> {
    ids.iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, id)| *id)
        .collect()
}

/// Build a ledger; with `whole_shares` the raw amount is the per-head share
fn build_ledger(people: usize, expenses: &[RawExpense], whole_shares: bool) -> Ledger {
    let mut ledger = Ledger::new();
    let ids: Vec<ParticipantId> = (0..people)
        .map(|i| ledger.add_participant(&format!("P{}", i)).unwrap())
        .collect();

    let all = (1u32 << people) - 1;
    for (n, &(payer, mask, value)) in expenses.iter().enumerate() {
        let sharing = ids_in_mask(&ids, mask % all + 1);
        let amount = if whole_shares {
            Decimal::from(value * sharing.len() as i64)
        } else {
            Decimal::new(value, 2)
        };
        ledger
            .add_expense(ExpenseDraft::equal(
                format!("Expense {}", n),
                amount,
                ids[payer % people],
                sharing,
            ))
            .unwrap();
    }
    ledger
}

/// Net movement per name: received minus paid
fn flows(transfers: &[Transfer]) -> HashMap<&str, Decimal> {
    let mut flows = HashMap::new();
    for t in transfers {
        *flows.entry(t.from.as_str()).or_insert(Decimal::ZERO) -= t.amount;
        *flows.entry(t.to.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    flows
}

fn strategies() -> Vec<Box<dyn SettlementStrategy>> {
    vec![Box::new(GreedyStrategy), Box::new(OptimalStrategy::default())]
}

fn session(max_amount: i64) -> impl Strategy<Value = (usize, Vec<RawExpense>)> {
    (
        2usize..8,
        prop::collection::vec((0usize..8, 0u32..256, 1i64..max_amount), 1..12),
    )
}

fn net_of(balances: &BalanceSheet, name: &str) -> Decimal {
    balances
        .iter()
        .find(|b| b.name == name)
        .map(|b| b.net)
        .unwrap_or(Decimal::ZERO)
}

#[test]
fn hundred_among_six_settles_every_debtor_within_a_cent() {
    let mut ledger = Ledger::new();
    let payer = ledger.add_participant("Host").unwrap();
    let guests: Vec<ParticipantId> = (0..6)
        .map(|i| ledger.add_participant(&format!("Guest {}", i)).unwrap())
        .collect();
    ledger
        .add_expense(ExpenseDraft::equal("Party", Decimal::new(100, 0), payer, guests))
        .unwrap();
    let balances = ledger.balances();

    for strategy in strategies() {
        let transfers = strategy.settle(&balances);
        assert_eq!(transfers.len(), 6, "{}", strategy.name());

        let total: Decimal = transfers.iter().map(|t| t.amount).sum();
        assert_eq!(total, Decimal::new(100, 0));
        for t in &transfers {
            assert_eq!(t.to, "Host");
            let owed = -net_of(&balances, &t.from);
            assert!((t.amount - owed).abs() <= tolerance(), "{} paid {}", t.from, t.amount);
        }
    }
}

proptest! {
    /// Property: net balances sum to zero within one cent
    #[test]
    fn nets_sum_to_zero((people, expenses) in session(100_000)) {
        let ledger = build_ledger(people, &expenses, false);
        prop_assert!(ledger.balances().total_net().abs() <= tolerance());
    }

    /// Property: aggregation is a pure function of the ledger
    #[test]
    fn aggregation_is_idempotent((people, expenses) in session(100_000)) {
        let ledger = build_ledger(people, &expenses, false);
        prop_assert_eq!(ledger.balances(), ledger.balances());
    }

    /// Property: with exact balances, transfers bring everyone to zero
    #[test]
    fn transfers_cover_every_balance((people, expenses) in session(500)) {
        let ledger = build_ledger(people, &expenses, true);
        let balances = ledger.balances();

        for strategy in strategies() {
            let transfers = strategy.settle(&balances);
            let flows = flows(&transfers);
            for balance in &balances {
                let moved = flows.get(balance.name.as_str()).copied().unwrap_or(Decimal::ZERO);
                prop_assert!(
                    (balance.net - moved).abs() <= tolerance(),
                    "{} left with {} using {}",
                    balance.name,
                    balance.net - moved,
                    strategy.name()
                );
            }
        }
    }

    /// Property: with uneven equal shares, everyone still ends within one cent
    #[test]
    fn transfers_cover_every_balance_with_uneven_shares((people, expenses) in session(100_000)) {
        let ledger = build_ledger(people, &expenses, false);
        let balances = ledger.balances();

        for strategy in strategies() {
            let transfers = strategy.settle(&balances);
            let flows = flows(&transfers);
            for balance in &balances {
                let moved = flows.get(balance.name.as_str()).copied().unwrap_or(Decimal::ZERO);
                prop_assert!(
                    (balance.net - moved).abs() <= tolerance(),
                    "{} left with {} using {}",
                    balance.name,
                    balance.net - moved,
                    strategy.name()
                );
            }
        }
    }

    /// Property: the optimal strategy never needs more transfers than greedy
    #[test]
    fn optimal_never_worse_than_greedy((people, expenses) in session(500)) {
        let balances = build_ledger(people, &expenses, true).balances();

        let greedy = GreedyStrategy.settle(&balances);
        let optimal = OptimalStrategy::default().settle(&balances);

        prop_assert!(optimal.len() <= greedy.len());
        let unsettled = balances.iter().filter(|b| b.net.abs() > tolerance()).count();
        prop_assert!(greedy.len() <= unsettled.saturating_sub(1));
    }

    /// Property: amounts are positive cents and nobody over-pays or over-receives
    #[test]
    fn transfers_never_exceed_balances((people, expenses) in session(100_000)) {
        let balances = build_ledger(people, &expenses, false).balances();

        for strategy in strategies() {
            let transfers = strategy.settle(&balances);
            for t in &transfers {
                prop_assert!(t.amount > Decimal::ZERO);
                prop_assert_eq!(t.amount, round_to_cents(t.amount));
                prop_assert_ne!(&t.from, &t.to);
            }
            for (name, moved) in flows(&transfers) {
                let net = net_of(&balances, name);
                prop_assert!(moved.abs() <= net.abs() + tolerance());
                prop_assert!(moved.is_zero() || moved.is_sign_positive() == net.is_sign_positive());
            }
        }
    }

    /// Property: results do not change between runs
    #[test]
    fn settlement_is_deterministic((people, expenses) in session(100_000)) {
        let balances = build_ledger(people, &expenses, false).balances();
        for strategy in strategies() {
            prop_assert_eq!(strategy.settle(&balances), strategy.settle(&balances));
        }
    }
}
