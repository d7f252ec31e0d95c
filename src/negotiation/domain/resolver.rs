//! Who closed a negotiation.

use crate::agent::{AgentDomainError, AgentName};
use serde::{Deserialize, Serialize};
use std::fmt;

const AUTO: &str = "auto";

/// Party credited with resolving a session.
///
/// Serialised as the agent name, or `"auto"` for automatic resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolver {
    /// A named agent, including the arbitrator on escalation.
    Agent(AgentName),
    /// Resolved by policy without a deciding agent.
    Auto,
}

impl Resolver {
    /// Returns the deciding agent, if any.
    #[must_use]
    pub const fn agent(&self) -> Option<&AgentName> {
        match self {
            Self::Agent(name) => Some(name),
            Self::Auto => None,
        }
    }
}

impl From<AgentName> for Resolver {
    fn from(name: AgentName) -> Self {
        Self::Agent(name)
    }
}

impl TryFrom<String> for Resolver {
    type Error = AgentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(AUTO) {
            return Ok(Self::Auto);
        }
        AgentName::new(value).map(Self::Agent)
    }
}

impl From<Resolver> for String {
    fn from(value: Resolver) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(name) => write!(f, "{name}"),
            Self::Auto => f.write_str(AUTO),
        }
    }
}
