//! Participant types
//!
//! A participant is a person among whom expenses are split. Identifiers are
//! assigned by the ledger and stay stable for the whole session.

use serde::{Deserialize, Serialize};

/// Participant identifier
pub type ParticipantId = u32;

/// A person taking part in the split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Session-unique identifier
    pub id: ParticipantId,

    /// Display name, trimmed and non-empty
    pub name: String,
}

impl Participant {
    /// Create a participant, trimming the display name
    pub fn new(id: ParticipantId, name: impl AsRef<str>) -> Self {
        Participant {
            id,
            name: name.as_ref().trim().to_string(),
        }
    }
}
