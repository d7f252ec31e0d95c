//! Store port for blackboard entries.

use crate::agent::TaskId;
use crate::blackboard::domain::{BlackboardEntry, EntryId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for blackboard store operations.
pub type BlackboardStoreResult<T> = Result<T, BlackboardStoreError>;

/// Append-only entry log with a latest-per-key index.
///
/// The latest entry for `(task, key)` is the one with the greatest
/// `written_at`; equal timestamps resolve to the later append.
pub trait BlackboardStore: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::DuplicateEntry`] when the id already
    /// exists.
    fn append(&self, entry: BlackboardEntry) -> BlackboardStoreResult<()>;

    /// Retrieves an entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn find_by_id(&self, id: EntryId) -> BlackboardStoreResult<Option<BlackboardEntry>>;

    /// Returns the latest entry for a key.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn latest(
        &self,
        task_id: &TaskId,
        key: &str,
    ) -> BlackboardStoreResult<Option<BlackboardEntry>>;

    /// Returns the latest entry for every key of a task.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn latest_per_key(&self, task_id: &TaskId) -> BlackboardStoreResult<Vec<BlackboardEntry>>;

    /// Lists a task's entries in append order.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn find_by_task(&self, task_id: &TaskId) -> BlackboardStoreResult<Vec<BlackboardEntry>>;

    /// Lists every entry written under a key, in append order.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn history(&self, task_id: &TaskId, key: &str) -> BlackboardStoreResult<Vec<BlackboardEntry>>;

    /// Deletes a task's entries, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn clear_task(&self, task_id: &TaskId) -> BlackboardStoreResult<usize>;

    /// Deletes every entry.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardStoreError::Persistence`] when storage fails.
    fn clear(&self) -> BlackboardStoreResult<()>;
}

/// Errors returned by blackboard stores.
#[derive(Debug, Clone, Error)]
pub enum BlackboardStoreError {
    /// An entry with the same id already exists.
    #[error("duplicate blackboard entry: {0}")]
    DuplicateEntry(EntryId),

    /// The backing storage failed.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BlackboardStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
