//! Error types for the expense splitter
//!
//! This module defines every error that can surface while building a ledger,
//! reading CSV input, or writing reports. Computation itself never fails:
//! aggregation skips dangling references instead of erroring.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, unreadable input, failed output
//! - **CSV Parsing Errors**: Malformed rows, invalid field values
//! - **Ledger Errors**: Invalid participants or expenses, unknown references

use super::expense::ExpenseId;
use super::money::MAX_AMOUNT;
use super::participant::ParticipantId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the expense splitter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// File not found at the specified path
    ///
    /// Fatal: processing cannot start.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading input or writing a report
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error
    ///
    /// Recoverable: the offending row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Participant name is empty after trimming
    #[error("Participant name must not be empty")]
    EmptyName,

    /// A participant with the same name (case-insensitive) already exists
    #[error("Participant '{name}' already exists")]
    DuplicateParticipant {
        /// The rejected name
        name: String,
    },

    /// A participant with the same id already exists
    #[error("Participant id {id} is already in use")]
    DuplicateParticipantId {
        /// The rejected id
        id: ParticipantId,
    },

    /// Referenced participant does not exist
    #[error("Participant {id} not found")]
    ParticipantNotFound {
        /// The unknown participant id
        id: ParticipantId,
    },

    /// Referenced expense does not exist
    #[error("Expense {id} not found")]
    ExpenseNotFound {
        /// The unknown expense id
        id: ExpenseId,
    },

    /// An expense with the same id already exists
    #[error("Expense id {id} is already in use")]
    DuplicateExpenseId {
        /// The rejected id
        id: ExpenseId,
    },

    /// Expense description is empty after trimming
    #[error("Expense description must not be empty")]
    EmptyDescription,

    /// Expense amount is zero or negative
    #[error("Invalid amount {amount} for '{description}': must be positive")]
    InvalidAmount {
        /// Description of the rejected expense
        description: String,
        /// The rejected amount
        amount: Decimal,
    },

    /// Expense amount is above the supported maximum
    #[error("Amount {amount} for '{description}' exceeds the maximum of {max}")]
    AmountTooLarge {
        /// Description of the rejected expense
        description: String,
        /// The rejected amount
        amount: Decimal,
        /// Largest accepted amount
        max: Decimal,
    },

    /// Expense has nobody to split between
    #[error("Expense '{description}' has no participants")]
    EmptyParticipants {
        /// Description of the rejected expense
        description: String,
    },

    /// Custom split entry is unusable
    #[error("Invalid custom split for participant {participant}: {reason}")]
    InvalidCustomSplit {
        /// Participant the split entry belongs to
        participant: ParticipantId,
        /// Why the entry was rejected
        reason: String,
    },

    /// Split mode string is not `equal` or `custom`
    #[error("Invalid split mode '{mode}'")]
    InvalidSplitMode {
        /// The unrecognized split mode
        mode: String,
    },
}

impl From<std::io::Error> for SplitError {
    fn from(error: std::io::Error) -> Self {
        SplitError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SplitError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return SplitError::IoError {
                message: error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());

        SplitError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SplitError {
    fn from(error: serde_json::Error) -> Self {
        SplitError::IoError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SplitError {
    /// Create a ParseError
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        SplitError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create a DuplicateParticipant error
    pub fn duplicate_participant(name: &str) -> Self {
        SplitError::DuplicateParticipant {
            name: name.to_string(),
        }
    }

    /// Create a ParticipantNotFound error
    pub fn participant_not_found(id: ParticipantId) -> Self {
        SplitError::ParticipantNotFound { id }
    }

    /// Create an ExpenseNotFound error
    pub fn expense_not_found(id: ExpenseId) -> Self {
        SplitError::ExpenseNotFound { id }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(description: &str, amount: Decimal) -> Self {
        SplitError::InvalidAmount {
            description: description.to_string(),
            amount,
        }
    }

    /// Create an AmountTooLarge error against [`MAX_AMOUNT`]
    pub fn amount_too_large(description: &str, amount: Decimal) -> Self {
        SplitError::AmountTooLarge {
            description: description.to_string(),
            amount,
            max: MAX_AMOUNT,
        }
    }

    /// Create an EmptyParticipants error
    pub fn empty_participants(description: &str) -> Self {
        SplitError::EmptyParticipants {
            description: description.to_string(),
        }
    }

    /// Create an InvalidCustomSplit error
    pub fn invalid_custom_split(participant: ParticipantId, reason: &str) -> Self {
        SplitError::InvalidCustomSplit {
            participant,
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidSplitMode error
    pub fn invalid_split_mode(mode: &str) -> Self {
        SplitError::InvalidSplitMode {
            mode: mode.to_string(),
        }
    }

    /// Attach a CSV line number, turning row-level errors into `ParseError`
    pub fn at_line(self, line: Option<u64>) -> Self {
        match self {
            SplitError::ParseError {
                line: None,
                message,
            } => SplitError::ParseError { line, message },
            error @ SplitError::ParseError { .. } => error,
            other => SplitError::ParseError {
                line,
                message: other.to_string(),
            },
        }
    }

    /// Whether processing can continue past this error
    ///
    /// File-level failures are fatal; everything else concerns a single
    /// record or ledger operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SplitError::FileNotFound { .. } | SplitError::IoError { .. }
        )
    }
}
