//! CSV format handling for participants, expenses, and report tables
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserialization
//! - Conversion from rows to domain types via [`FromRow`]
//! - Balance and settlement table serialization
//!
//! # Input formats
//!
//! Participants: `id,name`
//!
//! Expenses: `id,description,amount,payer,participants,split,custom_splits,date`
//! - `participants`: `;`-separated participant ids
//! - `split`: `equal` or `custom` (case-insensitive, defaults to `equal`)
//! - `custom_splits`: `;`-separated `id:amount` pairs
//! - `date`: `YYYY-MM-DD`, optional
//!
//! The trailing `split`, `custom_splits`, and `date` columns may be omitted.

use crate::types::money::format_amount;
use crate::types::{
    BalanceSheet, ExpenseDraft, ExpenseId, Participant, ParticipantId, SplitError, SplitMode,
    Transfer,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;
use tracing::warn;

/// A domain record that can be built from one deserialized CSV row
pub trait FromRow: Sized {
    /// Raw row shape as it appears in the file
    type Row: DeserializeOwned;

    fn from_row(row: Self::Row) -> Result<Self, SplitError>;
}

/// Participant row: `id,name`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParticipantRow {
    pub id: ParticipantId,
    pub name: String,
}

impl FromRow for Participant {
    type Row = ParticipantRow;

    /// Names are trimmed here; emptiness and uniqueness are checked by the ledger
    fn from_row(row: ParticipantRow) -> Result<Self, SplitError> {
        Ok(Participant::new(row.id, row.name))
    }
}

/// Expense row as written in the input file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub description: String,
    pub amount: String,
    pub payer: ParticipantId,
    pub participants: String,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub custom_splits: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// An imported expense: its id plus the draft the ledger will validate
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub draft: ExpenseDraft,
}

impl FromRow for ExpenseRecord {
    type Row = ExpenseRow;

    /// Convert an expense row
    ///
    /// Malformed custom split entries are skipped with a warning, so the
    /// participant they name owes nothing for this expense. Everything else
    /// that fails to parse rejects the row.
    fn from_row(row: ExpenseRow) -> Result<Self, SplitError> {
        let amount = Decimal::from_str(row.amount.trim()).map_err(|_| {
            SplitError::parse(
                None,
                format!("Invalid amount '{}' for expense {}", row.amount, row.id),
            )
        })?;

        let mut participants = parse_id_list(&row.participants).map_err(|id| {
            SplitError::parse(
                None,
                format!("Invalid participant id '{}' for expense {}", id, row.id),
            )
        })?;

        let split = match non_empty(row.split.as_deref()) {
            None => SplitMode::Equal,
            Some(mode) if mode.eq_ignore_ascii_case("equal") => SplitMode::Equal,
            Some(mode) if mode.eq_ignore_ascii_case("custom") => {
                let splits = parse_custom_splits(row.id, row.custom_splits.as_deref());
                if participants.is_empty() {
                    participants = splits.keys().copied().collect();
                }
                SplitMode::Custom(splits)
            }
            Some(mode) => return Err(SplitError::invalid_split_mode(mode)),
        };

        let date = match non_empty(row.date.as_deref()) {
            None => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                SplitError::parse(
                    None,
                    format!("Invalid date '{}' for expense {}", raw, row.id),
                )
            })?),
        };

        Ok(ExpenseRecord {
            id: row.id,
            draft: ExpenseDraft {
                description: row.description,
                amount,
                payer: row.payer,
                participants,
                split,
                date,
            },
        })
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse `1;2;3`, returning the first token that is not an id on failure
fn parse_id_list(field: &str) -> Result<Vec<ParticipantId>, String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().map_err(|_| token.to_string()))
        .collect()
}

/// Parse `1:120.50;2:79.50`, skipping entries that do not parse
fn parse_custom_splits(expense: ExpenseId, field: Option<&str>) -> BTreeMap<ParticipantId, Decimal> {
    let mut splits = BTreeMap::new();
    let Some(field) = non_empty(field) else {
        return splits;
    };

    for entry in field.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let parsed = entry.split_once(':').and_then(|(id, amount)| {
            let id = id.trim().parse::<ParticipantId>().ok()?;
            let amount = Decimal::from_str(amount.trim()).ok()?;
            Some((id, amount))
        });
        match parsed {
            Some((id, amount)) => {
                splits.insert(id, amount);
            }
            None => warn!(expense, entry, "skipping unparseable custom split"),
        }
    }
    splits
}

/// Write balances as CSV
///
/// Columns: participant, name, paid, owed, net. Rows follow participant order
/// and amounts are rounded to cents.
pub fn write_balances_csv(balances: &BalanceSheet, output: &mut dyn Write) -> Result<(), SplitError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["participant", "name", "paid", "owed", "net"])?;
    for balance in balances {
        writer.write_record(&[
            balance.participant.to_string(),
            balance.name.clone(),
            format_amount(balance.paid),
            format_amount(balance.owed),
            format_amount(balance.net),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Write settlement transfers as CSV
///
/// Columns: from, to, amount. Rows keep settlement order.
pub fn write_settlements_csv(transfers: &[Transfer], output: &mut dyn Write) -> Result<(), SplitError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["from", "to", "amount"])?;
    for transfer in transfers {
        writer.write_record(&[
            transfer.from.clone(),
            transfer.to.clone(),
            format_amount(transfer.amount),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
