//! Negotiation lifecycle states.

use super::ParseNegotiationStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a negotiation session.
///
/// Sessions start [`Open`](Self::Open), may be countered any number of
/// times, and end in exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    /// Proposed, awaiting a response.
    Open,
    /// The respondent has stated a position.
    Countered,
    /// Resolved by agreement.
    Agreed,
    /// Handed to the arbitrator.
    Escalated,
}

impl NegotiationStatus {
    /// Returns the canonical lowercase spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Countered => "countered",
            Self::Agreed => "agreed",
            Self::Escalated => "escalated",
        }
    }

    /// Returns `true` for states that accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Agreed | Self::Escalated)
    }
}

impl fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NegotiationStatus {
    type Error = ParseNegotiationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "countered" => Ok(Self::Countered),
            "agreed" => Ok(Self::Agreed),
            "escalated" => Ok(Self::Escalated),
            _ => Err(ParseNegotiationStatusError(value.to_owned())),
        }
    }
}
