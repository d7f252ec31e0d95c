//! Store port for recorded messages.

use crate::agent::{AgentName, TaskId};
use crate::bus::{
    domain::{AgentMessage, MessageId},
    error::MessageStoreError,
};
use chrono::{DateTime, Utc};

/// Result type for message store operations.
pub type MessageStoreResult<T> = Result<T, MessageStoreError>;

/// Append-mostly, task-scoped message log.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Message IDs are unique across the store
/// - Listing operations return messages in append order
/// - Messages are immutable after appending, except read receipts
/// - Concurrent access is handled safely
pub trait MessageStore: Send + Sync {
    /// Appends a message to the log.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::DuplicateMessage`] when the ID is
    /// already present.
    fn append(&self, message: AgentMessage) -> MessageStoreResult<()>;

    /// Retrieves a message by ID. Returns `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn find_by_id(&self, id: MessageId) -> MessageStoreResult<Option<AgentMessage>>;

    /// Checks whether a message exists.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn exists(&self, id: MessageId) -> MessageStoreResult<bool>;

    /// Lists messages reaching `agent` directly or by broadcast, optionally
    /// restricted to one task, ordered by send time.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn find_for_agent(
        &self,
        agent: &AgentName,
        task_id: Option<&TaskId>,
    ) -> MessageStoreResult<Vec<AgentMessage>>;

    /// Lists broadcast messages in append order.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn find_broadcasts(&self) -> MessageStoreResult<Vec<AgentMessage>>;

    /// Lists direct replies to `parent` in append order.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn find_replies(&self, parent: MessageId) -> MessageStoreResult<Vec<AgentMessage>>;

    /// Lists every message for a task in append order.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn find_by_task(&self, task_id: &TaskId) -> MessageStoreResult<Vec<AgentMessage>>;

    /// Lists every message in append order.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn all(&self) -> MessageStoreResult<Vec<AgentMessage>>;

    /// Records that `reader` read the message at `at`.
    ///
    /// Returns `false` when the message does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn mark_read(
        &self,
        id: MessageId,
        reader: &AgentName,
        at: DateTime<Utc>,
    ) -> MessageStoreResult<bool>;

    /// Deletes every message for a task, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn clear_task(&self, task_id: &TaskId) -> MessageStoreResult<usize>;

    /// Deletes every message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::Persistence`] when storage fails.
    fn clear(&self) -> MessageStoreResult<()>;
}
