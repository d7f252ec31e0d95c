//! Error types for blackboard entry construction.

use thiserror::Error;

/// Errors returned while constructing blackboard entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlackboardDomainError {
    /// The key is empty after trimming.
    #[error("blackboard key must not be empty")]
    EmptyKey,
}
