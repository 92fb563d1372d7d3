//! Session ledger
//!
//! This module provides the `Ledger`, the in-memory record of who is taking
//! part and what has been spent. It owns all validation of incoming
//! participants and expenses and keeps the snapshot referentially consistent:
//! removing a participant also removes every expense that mentions them.
//!
//! The ledger never stores balances. They are recomputed from the current
//! snapshot by [`Ledger::balances`] and [`Ledger::settle`].

use crate::core::aggregator::compute_balances;
use crate::strategy::SettlementStrategy;
use crate::types::money::{MAX_AMOUNT, SETTLEMENT_TOLERANCE};
use crate::types::{
    BalanceSheet, Expense, ExpenseDraft, ExpenseId, LedgerSummary, Participant, ParticipantId,
    SplitError, SplitMode, Transfer,
};
use chrono::Local;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Participants and expenses for one splitting session
#[derive(Debug, Clone)]
pub struct Ledger {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    next_participant_id: ParticipantId,
    next_expense_id: ExpenseId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Ledger {
            participants: Vec::new(),
            expenses: Vec::new(),
            next_participant_id: 1,
            next_expense_id: 1,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Add a participant by name and return the assigned id
    ///
    /// # Errors
    ///
    /// - `EmptyName` if the trimmed name is empty
    /// - `DuplicateParticipant` if the name matches an existing participant,
    ///   ignoring case
    pub fn add_participant(&mut self, name: &str) -> Result<ParticipantId, SplitError> {
        let id = self.next_participant_id;
        self.insert_participant(Participant::new(id, name))?;
        Ok(id)
    }

    /// Add a participant with a caller-chosen id
    ///
    /// Used when importing a session. Later calls to [`Ledger::add_participant`]
    /// continue numbering above the highest id seen.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::add_participant`], plus `DuplicateParticipantId`.
    pub fn insert_participant(&mut self, participant: Participant) -> Result<(), SplitError> {
        let name = participant.name.trim();
        if name.is_empty() {
            return Err(SplitError::EmptyName);
        }
        if self.participant(participant.id).is_some() {
            return Err(SplitError::DuplicateParticipantId { id: participant.id });
        }
        let lowered = name.to_lowercase();
        if self
            .participants
            .iter()
            .any(|p| p.name.to_lowercase() == lowered)
        {
            return Err(SplitError::duplicate_participant(name));
        }

        self.next_participant_id = self
            .next_participant_id
            .max(participant.id.saturating_add(1));
        self.participants
            .push(Participant::new(participant.id, name));
        Ok(())
    }

    /// Remove a participant and every expense that involves them
    ///
    /// Returns the number of expenses removed along with the participant.
    ///
    /// # Errors
    ///
    /// Returns `ParticipantNotFound` if no participant has this id.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<usize, SplitError> {
        let position = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| SplitError::participant_not_found(id))?;
        self.participants.remove(position);

        let before = self.expenses.len();
        self.expenses.retain(|expense| !expense.involves(id));
        let removed = before - self.expenses.len();

        debug!(participant = id, expenses_removed = removed, "removed participant");
        Ok(removed)
    }

    /// Validate and record an expense, returning the assigned id
    ///
    /// # Errors
    ///
    /// - `EmptyDescription` if the trimmed description is empty
    /// - `InvalidAmount` if the amount is not positive
    /// - `ParticipantNotFound` if the payer or a participant is unknown
    /// - `EmptyParticipants` if nobody shares the cost
    /// - `InvalidCustomSplit` if a custom split names someone outside the
    ///   participant set or is negative
    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<ExpenseId, SplitError> {
        let id = self.next_expense_id;
        self.insert_expense(id, draft)?;
        Ok(id)
    }

    /// Record an expense with a caller-chosen id
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::add_expense`], plus `DuplicateExpenseId`.
    pub fn insert_expense(&mut self, id: ExpenseId, draft: ExpenseDraft) -> Result<(), SplitError> {
        if self.expense(id).is_some() {
            return Err(SplitError::DuplicateExpenseId { id });
        }
        let expense = self.validate_expense(id, draft)?;

        debug!(
            expense = id,
            amount = %expense.amount,
            split = expense.split.label(),
            "recorded expense"
        );
        self.next_expense_id = self.next_expense_id.max(id.saturating_add(1));
        self.expenses.push(expense);
        Ok(())
    }

    /// Remove a single expense
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` if no expense has this id.
    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, SplitError> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SplitError::expense_not_found(id))?;
        Ok(self.expenses.remove(position))
    }

    /// Clear everything and restart numbering
    pub fn reset(&mut self) {
        *self = Ledger::new();
    }

    /// At least two people are needed before splitting makes sense
    pub fn can_add_expenses(&self) -> bool {
        self.participants.len() >= 2
    }

    /// At least one expense is needed before settling
    pub fn can_settle(&self) -> bool {
        !self.expenses.is_empty()
    }

    pub fn total_amount(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount))
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            total_amount: self.total_amount(),
            expense_count: self.expenses.len(),
            participant_count: self.participants.len(),
        }
    }

    /// Current balances for every participant
    pub fn balances(&self) -> BalanceSheet {
        compute_balances(&self.participants, &self.expenses)
    }

    /// Suggested transfers that settle the current balances
    pub fn settle(&self, strategy: &dyn SettlementStrategy) -> Vec<Transfer> {
        strategy.settle(&self.balances())
    }

    fn validate_expense(&self, id: ExpenseId, draft: ExpenseDraft) -> Result<Expense, SplitError> {
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(SplitError::EmptyDescription);
        }
        if draft.amount <= Decimal::ZERO {
            return Err(SplitError::invalid_amount(&description, draft.amount));
        }
        if draft.amount > MAX_AMOUNT {
            return Err(SplitError::amount_too_large(&description, draft.amount));
        }
        if self.participant(draft.payer).is_none() {
            return Err(SplitError::participant_not_found(draft.payer));
        }

        let mut participants = Vec::with_capacity(draft.participants.len());
        for participant in draft.participants {
            if self.participant(participant).is_none() {
                return Err(SplitError::participant_not_found(participant));
            }
            if !participants.contains(&participant) {
                participants.push(participant);
            }
        }
        if participants.is_empty() {
            return Err(SplitError::empty_participants(&description));
        }

        if let SplitMode::Custom(splits) = &draft.split {
            for (&participant, &share) in splits {
                if !participants.contains(&participant) {
                    return Err(SplitError::invalid_custom_split(
                        participant,
                        "not part of the expense",
                    ));
                }
                if share < Decimal::ZERO {
                    return Err(SplitError::invalid_custom_split(
                        participant,
                        "negative amount",
                    ));
                }
                if share > MAX_AMOUNT {
                    return Err(SplitError::invalid_custom_split(
                        participant,
                        "exceeds the maximum amount",
                    ));
                }
            }
        }

        let expense = Expense {
            id,
            description,
            amount: draft.amount,
            payer: draft.payer,
            participants,
            split: draft.split,
            date: draft.date.unwrap_or_else(|| Local::now().date_naive()),
        };
        if let Some(total) = expense.custom_total() {
            if (total - expense.amount).abs() > SETTLEMENT_TOLERANCE {
                warn!(
                    expense = id,
                    amount = %expense.amount,
                    split_total = %total,
                    "custom split does not add up to the expense amount"
                );
            }
        }
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::GreedyStrategy;
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn trio() -> (Ledger, ParticipantId, ParticipantId, ParticipantId) {
        let mut ledger = Ledger::new();
        let a = ledger.add_participant("A").unwrap();
        let b = ledger.add_participant("B").unwrap();
        let c = ledger.add_participant("C").unwrap();
        (ledger, a, b, c)
    }

    #[test]
    fn test_add_participant_assigns_sequential_ids() {
        let (ledger, a, b, c) = trio();
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(ledger.participants().len(), 3);
    }

    #[test]
    fn test_add_participant_trims_name() {
        let mut ledger = Ledger::new();
        let id = ledger.add_participant("  Priya  ").unwrap();
        assert_eq!(ledger.participant(id).unwrap().name, "Priya");
    }

    #[rstest]
    #[case::empty("", SplitError::EmptyName)]
    #[case::blank("   ", SplitError::EmptyName)]
    #[case::duplicate("A", SplitError::DuplicateParticipant { name: "A".to_string() })]
    #[case::duplicate_ignoring_case(" a ", SplitError::DuplicateParticipant { name: "a".to_string() })]
    fn test_add_participant_rejects(#[case] name: &str, #[case] expected: SplitError) {
        let (mut ledger, ..) = trio();
        assert_eq!(ledger.add_participant(name), Err(expected));
        assert_eq!(ledger.participants().len(), 3);
    }

    #[test]
    fn test_insert_participant_continues_numbering() {
        let mut ledger = Ledger::new();
        ledger.insert_participant(Participant::new(10, "Ravi")).unwrap();
        assert_eq!(
            ledger.insert_participant(Participant::new(10, "Sam")),
            Err(SplitError::DuplicateParticipantId { id: 10 })
        );
        assert_eq!(ledger.add_participant("Sam").unwrap(), 11);
    }

    #[test]
    fn test_add_expense_records_valid_draft() {
        let (mut ledger, a, b, c) = trio();
        let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let id = ledger
            .add_expense(
                ExpenseDraft::equal(" Dinner ", Decimal::new(300, 0), a, vec![a, b, c, b]).on(date),
            )
            .unwrap();

        let expense = ledger.expense(id).unwrap();
        assert_eq!(expense.description, "Dinner");
        assert_eq!(expense.participants, vec![a, b, c]);
        assert_eq!(expense.date, date);
        assert!(ledger.can_settle());
    }

    #[test]
    fn test_add_expense_defaults_date_to_today() {
        let (mut ledger, a, b, _) = trio();
        let id = ledger
            .add_expense(ExpenseDraft::equal("Snacks", Decimal::new(12, 0), a, vec![a, b]))
            .unwrap();
        assert_eq!(ledger.expense(id).unwrap().date, Local::now().date_naive());
    }

    #[rstest]
    #[case::empty_description(
        ExpenseDraft::equal("  ", Decimal::new(10, 0), 1, vec![1, 2]),
        SplitError::EmptyDescription
    )]
    #[case::zero_amount(
        ExpenseDraft::equal("Taxi", Decimal::ZERO, 1, vec![1, 2]),
        SplitError::InvalidAmount { description: "Taxi".to_string(), amount: Decimal::ZERO }
    )]
    #[case::negative_amount(
        ExpenseDraft::equal("Taxi", Decimal::new(-5, 0), 1, vec![1, 2]),
        SplitError::InvalidAmount { description: "Taxi".to_string(), amount: Decimal::new(-5, 0) }
    )]
    #[case::unknown_payer(
        ExpenseDraft::equal("Taxi", Decimal::new(10, 0), 9, vec![1, 2]),
        SplitError::ParticipantNotFound { id: 9 }
    )]
    #[case::unknown_participant(
        ExpenseDraft::equal("Taxi", Decimal::new(10, 0), 1, vec![1, 8]),
        SplitError::ParticipantNotFound { id: 8 }
    )]
    #[case::no_participants(
        ExpenseDraft::equal("Taxi", Decimal::new(10, 0), 1, vec![]),
        SplitError::EmptyParticipants { description: "Taxi".to_string() }
    )]
    fn test_add_expense_rejects(#[case] draft: ExpenseDraft, #[case] expected: SplitError) {
        let (mut ledger, ..) = trio();
        assert_eq!(ledger.add_expense(draft), Err(expected));
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn test_custom_split_must_stay_within_participants() {
        let (mut ledger, a, b, c) = trio();
        let mut draft = ExpenseDraft::custom(
            "Hotel",
            Decimal::new(90, 0),
            a,
            BTreeMap::from([(b, Decimal::new(45, 0)), (c, Decimal::new(45, 0))]),
        );
        draft.participants = vec![b];

        assert_eq!(
            ledger.add_expense(draft),
            Err(SplitError::InvalidCustomSplit {
                participant: c,
                reason: "not part of the expense".to_string()
            })
        );
    }

    #[test]
    fn test_custom_split_rejects_negative_share() {
        let (mut ledger, a, b, _) = trio();
        let draft = ExpenseDraft::custom(
            "Hotel",
            Decimal::new(90, 0),
            a,
            BTreeMap::from([(a, Decimal::new(100, 0)), (b, Decimal::new(-10, 0))]),
        );
        assert!(matches!(
            ledger.add_expense(draft),
            Err(SplitError::InvalidCustomSplit { .. })
        ));
    }

    #[test]
    fn test_custom_split_rejects_share_above_cap() {
        let (mut ledger, a, b, _) = trio();
        let draft = ExpenseDraft::custom(
            "Hotel",
            Decimal::new(90, 0),
            a,
            BTreeMap::from([(a, Decimal::new(90, 0)), (b, Decimal::MAX)]),
        );
        assert_eq!(
            ledger.add_expense(draft),
            Err(SplitError::InvalidCustomSplit {
                participant: b,
                reason: "exceeds the maximum amount".to_string()
            })
        );
    }

    #[test]
    fn test_huge_amounts_are_rejected_without_panicking() {
        let (mut ledger, a, b, c) = trio();
        for _ in 0..2 {
            let draft = ExpenseDraft::equal("Yacht", Decimal::MAX, a, vec![a, b, c]);
            assert_eq!(
                ledger.add_expense(draft),
                Err(SplitError::amount_too_large("Yacht", Decimal::MAX))
            );
        }
        ledger
            .add_expense(ExpenseDraft::equal("Yacht", MAX_AMOUNT, a, vec![a, b, c]))
            .unwrap();
        ledger
            .add_expense(ExpenseDraft::equal("Yacht", MAX_AMOUNT, a, vec![a, b, c]))
            .unwrap();

        assert_eq!(ledger.total_amount(), MAX_AMOUNT * Decimal::from(2));
        assert!(ledger.balances().total_net().abs() <= SETTLEMENT_TOLERANCE);
        assert_eq!(ledger.settle(&GreedyStrategy).len(), 2);
    }

    #[test]
    fn test_custom_split_mismatch_is_tolerated() {
        let (mut ledger, a, b, _) = trio();
        let draft = ExpenseDraft::custom(
            "Hotel",
            Decimal::new(90, 0),
            a,
            BTreeMap::from([(a, Decimal::new(40, 0)), (b, Decimal::new(40, 0))]),
        );
        assert!(ledger.add_expense(draft).is_ok());
    }

    #[test]
    fn test_insert_expense_rejects_duplicate_id() {
        let (mut ledger, a, b, _) = trio();
        let draft = ExpenseDraft::equal("Fuel", Decimal::new(20, 0), a, vec![a, b]);
        ledger.insert_expense(5, draft.clone()).unwrap();

        assert_eq!(
            ledger.insert_expense(5, draft.clone()),
            Err(SplitError::DuplicateExpenseId { id: 5 })
        );
        assert_eq!(ledger.add_expense(draft).unwrap(), 6);
    }

    #[test]
    fn test_remove_participant_cascades_to_expenses() {
        let (mut ledger, a, b, c) = trio();
        ledger
            .add_expense(ExpenseDraft::equal("Dinner", Decimal::new(300, 0), a, vec![a, b, c]))
            .unwrap();
        ledger
            .add_expense(ExpenseDraft::equal("Cab", Decimal::new(60, 0), b, vec![a, b]))
            .unwrap();
        ledger
            .add_expense(ExpenseDraft::equal("Tea", Decimal::new(20, 0), c, vec![b]))
            .unwrap();

        assert_eq!(ledger.remove_participant(a), Ok(2));
        assert_eq!(ledger.expenses().len(), 1);
        assert_eq!(ledger.expenses()[0].description, "Tea");

        // No dangling references reach the aggregator
        let sheet = ledger.balances();
        assert!(sheet.get(a).is_none());
        assert_eq!(sheet.get(b).unwrap().net, Decimal::new(-20, 0));
        assert_eq!(sheet.get(c).unwrap().net, Decimal::new(20, 0));
    }

    #[test]
    fn test_remove_unknown_participant() {
        let (mut ledger, ..) = trio();
        assert_eq!(
            ledger.remove_participant(99),
            Err(SplitError::ParticipantNotFound { id: 99 })
        );
    }

    #[test]
    fn test_remove_expense() {
        let (mut ledger, a, b, _) = trio();
        let id = ledger
            .add_expense(ExpenseDraft::equal("Fuel", Decimal::new(20, 0), a, vec![a, b]))
            .unwrap();

        assert_eq!(ledger.remove_expense(id).unwrap().description, "Fuel");
        assert_eq!(
            ledger.remove_expense(id),
            Err(SplitError::ExpenseNotFound { id })
        );
    }

    #[test]
    fn test_summary_and_readiness() {
        let mut ledger = Ledger::new();
        assert!(!ledger.can_add_expenses());
        let a = ledger.add_participant("A").unwrap();
        let b = ledger.add_participant("B").unwrap();
        assert!(ledger.can_add_expenses());
        assert!(!ledger.can_settle());

        ledger
            .add_expense(ExpenseDraft::equal("Lunch", Decimal::new(2550, 2), a, vec![a, b]))
            .unwrap();
        ledger
            .add_expense(ExpenseDraft::equal("Coffee", Decimal::new(450, 2), b, vec![a, b]))
            .unwrap();

        assert_eq!(
            ledger.summary(),
            LedgerSummary {
                total_amount: Decimal::new(30, 0),
                expense_count: 2,
                participant_count: 2,
            }
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut ledger, a, b, _) = trio();
        ledger
            .add_expense(ExpenseDraft::equal("Fuel", Decimal::new(20, 0), a, vec![a, b]))
            .unwrap();
        ledger.reset();

        assert!(ledger.participants().is_empty());
        assert!(ledger.expenses().is_empty());
        assert_eq!(ledger.add_participant("A").unwrap(), 1);
    }

    #[test]
    fn test_settle_dinner_example() {
        let (mut ledger, a, b, c) = trio();
        ledger
            .add_expense(ExpenseDraft::equal("Dinner", Decimal::new(300, 0), a, vec![a, b, c]))
            .unwrap();

        let transfers = ledger.settle(&GreedyStrategy);
        assert_eq!(
            transfers,
            vec![
                Transfer::new("B", "A", Decimal::new(100, 0)),
                Transfer::new("C", "A", Decimal::new(100, 0)),
            ]
        );
    }
}
