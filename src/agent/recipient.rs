//! Message addressing.

use super::{AgentName, name::BROADCAST_SENTINEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addressee of a message: one agent, or every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// Delivered only to handlers subscribed under this agent.
    Agent(AgentName),
    /// Delivered to every current subscriber.
    Broadcast,
}

impl Recipient {
    /// Returns `true` for the broadcast sentinel.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        matches!(self, Self::Broadcast)
    }

    /// Returns `true` when a message with this recipient reaches `agent`,
    /// either directly or by broadcast.
    #[must_use]
    pub fn reaches(&self, agent: &AgentName) -> bool {
        match self {
            Self::Agent(name) => name == agent,
            Self::Broadcast => true,
        }
    }

    /// Returns the addressed agent, or `None` for a broadcast.
    #[must_use]
    pub const fn agent(&self) -> Option<&AgentName> {
        match self {
            Self::Agent(name) => Some(name),
            Self::Broadcast => None,
        }
    }
}

impl From<AgentName> for Recipient {
    fn from(name: AgentName) -> Self {
        Self::Agent(name)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(name) => fmt::Display::fmt(name, f),
            Self::Broadcast => f.write_str(BROADCAST_SENTINEL),
        }
    }
}
