//! Error types for negotiation domain transitions.

use super::{NegotiationId, NegotiationStatus};
use thiserror::Error;

/// Errors returned by session state transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NegotiationDomainError {
    /// The session already reached a terminal state.
    #[error("negotiation {id} is already {status}")]
    AlreadyTerminal {
        /// Session that rejected the transition.
        id: NegotiationId,
        /// Its terminal status.
        status: NegotiationStatus,
    },
}

/// Error returned while parsing negotiation states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown negotiation status: {0}")]
pub struct ParseNegotiationStatusError(pub String);
