//! Balance types
//!
//! Balances are derived values: they are recomputed from the participant and
//! expense snapshot on every request and never stored.

use super::money::SETTLEMENT_TOLERANCE;
use super::participant::{Participant, ParticipantId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Where a participant stands after all expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// Is owed money (net above the settlement tolerance)
    Creditor,
    /// Owes money (net below the negative settlement tolerance)
    Debtor,
    /// Within one cent of zero
    Settled,
}

/// One participant's totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub participant: ParticipantId,
    pub name: String,

    /// Sum of the amounts of expenses this participant paid for
    pub paid: Decimal,

    /// Sum of this participant's shares across all expenses
    pub owed: Decimal,

    /// `paid - owed`; positive means the participant is owed money
    pub net: Decimal,
}

impl Balance {
    /// Zeroed balance for a participant
    pub fn new(participant: &Participant) -> Self {
        Balance {
            participant: participant.id,
            name: participant.name.clone(),
            paid: Decimal::ZERO,
            owed: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    pub fn standing(&self) -> Standing {
        if self.net > SETTLEMENT_TOLERANCE {
            Standing::Creditor
        } else if self.net < -SETTLEMENT_TOLERANCE {
            Standing::Debtor
        } else {
            Standing::Settled
        }
    }
}

/// Balances for every participant, in participant order
///
/// Iteration order is the order participants were supplied in, which keeps
/// settlement output deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    balances: Vec<Balance>,
    #[serde(skip)]
    index: HashMap<ParticipantId, usize>,
}

impl BalanceSheet {
    /// Create a sheet with a zeroed entry per participant
    ///
    /// A repeated participant id keeps its first entry.
    pub fn new(participants: &[Participant]) -> Self {
        let mut sheet = BalanceSheet::default();
        for participant in participants {
            if sheet.index.contains_key(&participant.id) {
                continue;
            }
            sheet.index.insert(participant.id, sheet.balances.len());
            sheet.balances.push(Balance::new(participant));
        }
        sheet
    }

    pub fn get(&self, participant: ParticipantId) -> Option<&Balance> {
        self.index.get(&participant).map(|&i| &self.balances[i])
    }

    pub(crate) fn get_mut(&mut self, participant: ParticipantId) -> Option<&mut Balance> {
        let i = *self.index.get(&participant)?;
        Some(&mut self.balances[i])
    }

    pub(crate) fn balances_mut(&mut self) -> impl Iterator<Item = &mut Balance> {
        self.balances.iter_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Balance> {
        self.balances.iter()
    }

    pub fn as_slice(&self) -> &[Balance] {
        &self.balances
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all nets; zero up to rounding when custom splits are consistent
    pub fn total_net(&self) -> Decimal {
        self.balances
            .iter()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.net))
    }

    /// Whether every participant is within the settlement tolerance
    pub fn is_settled(&self) -> bool {
        self.balances
            .iter()
            .all(|b| b.standing() == Standing::Settled)
    }
}

impl<'a> IntoIterator for &'a BalanceSheet {
    type Item = &'a Balance;
    type IntoIter = std::slice::Iter<'a, Balance>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
