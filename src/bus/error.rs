//! Error types for the message bus.
//!
//! Uses `thiserror` for typed variants that callers can inspect.

use super::domain::{MessageDraftError, MessageId};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by [`MessageStore`](super::ports::MessageStore)
/// implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageStoreError {
    /// A message with this ID already exists.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// The backing storage failed, typically a poisoned lock.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Reports a poisoned lock.
    pub(crate) fn poisoned(err: &impl std::fmt::Display) -> Self {
        Self::persistence(std::io::Error::other(format!("lock poisoned: {err}")))
    }
}

/// Errors returned by [`MessageBus`](super::services::MessageBus)
/// operations.
#[derive(Debug, Clone, Error)]
pub enum BusError {
    /// The draft was malformed; nothing was recorded or delivered.
    #[error("validation failed: {0}")]
    Validation(#[from] MessageDraftError),

    /// The message store failed.
    #[error(transparent)]
    Store(#[from] MessageStoreError),
}

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;
