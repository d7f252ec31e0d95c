//! Error types for agent identity validation.

use thiserror::Error;

/// Errors returned while constructing agent identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name contains characters outside `[A-Z0-9_-]`.
    #[error("invalid agent name '{0}', expected letters, digits, '_' or '-'")]
    InvalidAgentName(String),

    /// The agent name collides with the broadcast sentinel.
    #[error("'{0}' is reserved for broadcast addressing")]
    ReservedAgentName(String),

    /// The task identifier is empty after trimming.
    #[error("task id must not be empty")]
    EmptyTaskId,
}
