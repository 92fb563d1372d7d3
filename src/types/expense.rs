//! Expense-related types
//!
//! This module defines the recorded expense, its split mode, and the draft
//! submitted by the form layer before the ledger validates it and assigns an id.

use super::participant::ParticipantId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Expense identifier
pub type ExpenseId = u32;

/// How an expense is divided among its participants
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SplitMode {
    /// The amount is divided evenly across the participant set
    #[default]
    Equal,

    /// Each participant owes an explicit amount
    ///
    /// Participants missing from the map owe nothing for this expense.
    /// The values should add up to the expense amount; this is tolerated
    /// rather than enforced.
    Custom(BTreeMap<ParticipantId, Decimal>),
}

impl SplitMode {
    /// Short lowercase label used in CSV input and reports
    pub fn label(&self) -> &'static str {
        match self {
            SplitMode::Equal => "equal",
            SplitMode::Custom(_) => "custom",
        }
    }
}

/// A recorded shared expense
///
/// Expenses are immutable once recorded; the ledger only ever adds or
/// removes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Session-unique identifier
    pub id: ExpenseId,

    /// What the money was spent on (trimmed, non-empty)
    pub description: String,

    /// Total amount paid, always positive
    pub amount: Decimal,

    /// Who paid
    pub payer: ParticipantId,

    /// Who shares the cost, in selection order and without duplicates
    ///
    /// The payer may or may not be part of this set.
    pub participants: Vec<ParticipantId>,

    /// How the amount is divided
    pub split: SplitMode,

    /// Day the expense was recorded
    pub date: NaiveDate,
}

impl Expense {
    /// Whether the participant is the payer or shares the cost
    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.payer == participant || self.participants.contains(&participant)
    }

    /// Sum of the custom split amounts, if this is a custom split
    pub fn custom_total(&self) -> Option<Decimal> {
        match &self.split {
            SplitMode::Equal => None,
            SplitMode::Custom(splits) => Some(
                splits
                    .values()
                    .fold(Decimal::ZERO, |total, share| total.saturating_add(*share)),
            ),
        }
    }
}

/// An expense as submitted by the form layer, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Decimal,
    pub payer: ParticipantId,
    pub participants: Vec<ParticipantId>,
    pub split: SplitMode,

    /// Falls back to the current local date when absent
    pub date: Option<NaiveDate>,
}

impl ExpenseDraft {
    /// Create an equal-split draft with no explicit date
    pub fn equal(
        description: impl Into<String>,
        amount: Decimal,
        payer: ParticipantId,
        participants: Vec<ParticipantId>,
    ) -> Self {
        ExpenseDraft {
            description: description.into(),
            amount,
            payer,
            participants,
            split: SplitMode::Equal,
            date: None,
        }
    }

    /// Create a custom-split draft; the participant set is the split's keys
    pub fn custom(
        description: impl Into<String>,
        amount: Decimal,
        payer: ParticipantId,
        splits: BTreeMap<ParticipantId, Decimal>,
    ) -> Self {
        ExpenseDraft {
            description: description.into(),
            amount,
            payer,
            participants: splits.keys().copied().collect(),
            split: SplitMode::Custom(splits),
            date: None,
        }
    }

    /// Set the expense date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner() -> Expense {
        Expense {
            id: 1,
            description: "Dinner".to_string(),
            amount: Decimal::new(300, 0),
            payer: 1,
            participants: vec![2, 3],
            split: SplitMode::Equal,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_involves_payer_and_participants() {
        let expense = dinner();
        assert!(expense.involves(1));
        assert!(expense.involves(3));
        assert!(!expense.involves(4));
    }

    #[test]
    fn test_custom_total() {
        let mut expense = dinner();
        assert_eq!(expense.custom_total(), None);

        expense.split = SplitMode::Custom(BTreeMap::from([
            (2, Decimal::new(12050, 2)),
            (3, Decimal::new(17950, 2)),
        ]));
        assert_eq!(expense.custom_total(), Some(Decimal::new(300, 0)));
    }

    #[test]
    fn test_custom_draft_uses_split_keys_as_participants() {
        let draft = ExpenseDraft::custom(
            "Taxi",
            Decimal::new(40, 0),
            1,
            BTreeMap::from([(3, Decimal::new(10, 0)), (1, Decimal::new(30, 0))]),
        );
        assert_eq!(draft.participants, vec![1, 3]);
        assert_eq!(draft.split.label(), "custom");
    }
}
