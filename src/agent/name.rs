//! Validated agent name type.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an agent name.
const MAX_NAME_LENGTH: usize = 64;

/// Reserved spelling of the broadcast recipient.
pub(super) const BROADCAST_SENTINEL: &str = "BROADCAST";

/// Validated, uppercase identifier of a participating agent (e.g. `MARS`,
/// `VENUS`).
///
/// # Examples
///
/// ```
/// use concord::agent::AgentName;
///
/// let name = AgentName::new(" venus ").expect("valid agent name");
/// assert_eq!(name.as_str(), "VENUS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// The input is trimmed and uppercased. Only ASCII letters, digits, `_`
    /// and `-` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentName`] when the value is empty
    /// after trimming, [`AgentDomainError::InvalidAgentName`] for disallowed
    /// characters or excessive length, and
    /// [`AgentDomainError::ReservedAgentName`] for the broadcast sentinel.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentName);
        }

        let is_valid = normalized.len() <= MAX_NAME_LENGTH
            && normalized
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !is_valid {
            return Err(AgentDomainError::InvalidAgentName(raw));
        }

        if normalized == BROADCAST_SENTINEL {
            return Err(AgentDomainError::ReservedAgentName(raw));
        }

        Ok(Self(normalized))
    }

    /// Wraps a literal already known to be a valid, normalised name.
    pub(crate) fn from_literal(value: &'static str) -> Self {
        debug_assert!(Self::new(value).is_ok(), "invalid literal agent name");
        Self(value.to_owned())
    }

    /// Returns the agent name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AgentName {
    type Error = AgentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentName> for String {
    fn from(name: AgentName) -> Self {
        name.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
