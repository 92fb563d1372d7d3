//! Balance aggregation
//!
//! Computes each participant's paid, owed, and net totals from a snapshot of
//! participants and expenses. References to unknown participants are skipped
//! rather than reported.

use crate::types::{BalanceSheet, Expense, Participant, ParticipantId, SplitMode};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Compute balances for every participant
///
/// # Algorithm
///
/// 1. Every participant starts at `paid = owed = 0`
/// 2. Each expense's amount is added to its payer's `paid`
/// 3. Each expense's cost is added to the participants' `owed`:
///    - custom splits add each listed participant's explicit amount
///    - equal splits add `amount / |participants|` to each participant
/// 4. `net = paid - owed`
///
/// An expense that would overflow any total is skipped as a whole with a
/// warning; the ledger's amount cap keeps validated input well below that.
///
/// The result lists participants in the order supplied. Calling this twice on
/// the same input yields identical sheets.
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> BalanceSheet {
    let mut sheet = BalanceSheet::new(participants);

    for expense in expenses {
        let staged = match stage_postings(&sheet, expense) {
            Some(staged) => staged,
            None => {
                warn!(
                    expense = expense.id,
                    amount = %expense.amount,
                    "skipping expense whose totals would overflow"
                );
                continue;
            }
        };
        for (participant, (paid, owed)) in staged {
            if let Some(balance) = sheet.get_mut(participant) {
                balance.paid = paid;
                balance.owed = owed;
            }
        }
    }

    for balance in sheet.balances_mut() {
        balance.net = balance.paid - balance.owed;
    }

    debug!(
        participants = sheet.len(),
        expenses = expenses.len(),
        total_net = %sheet.total_net(),
        "computed balances"
    );

    sheet
}

type Staged = BTreeMap<ParticipantId, (Decimal, Decimal)>;

/// New `(paid, owed)` totals for everyone an expense touches
///
/// Returns `None` if any total would overflow, leaving the expense unapplied.
fn stage_postings(sheet: &BalanceSheet, expense: &Expense) -> Option<Staged> {
    let mut staged = Staged::new();

    if sheet.get(expense.payer).is_some() {
        let entry = staged_entry(&mut staged, sheet, expense.payer);
        entry.0 = entry.0.checked_add(expense.amount)?;
    }

    match &expense.split {
        SplitMode::Custom(splits) => {
            for participant in &expense.participants {
                let Some(&share) = splits.get(participant) else {
                    continue;
                };
                if sheet.get(*participant).is_some() {
                    let entry = staged_entry(&mut staged, sheet, *participant);
                    entry.1 = entry.1.checked_add(share)?;
                }
            }
        }
        SplitMode::Equal => {
            // Empty sets are rejected by the ledger
            if expense.participants.is_empty() {
                return Some(staged);
            }
            let share = expense.amount / Decimal::from(expense.participants.len());
            for participant in &expense.participants {
                if sheet.get(*participant).is_some() {
                    let entry = staged_entry(&mut staged, sheet, *participant);
                    entry.1 = entry.1.checked_add(share)?;
                }
            }
        }
    }

    Some(staged)
}

fn staged_entry<'a>(
    staged: &'a mut Staged,
    sheet: &BalanceSheet,
    participant: ParticipantId,
) -> &'a mut (Decimal, Decimal) {
    staged.entry(participant).or_insert_with(|| {
        sheet
            .get(participant)
            .map_or((Decimal::ZERO, Decimal::ZERO), |b| (b.paid, b.owed))
    })
}
