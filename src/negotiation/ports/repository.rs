//! Repository port for negotiation sessions.

use crate::agent::TaskId;
use crate::negotiation::domain::{NegotiationId, NegotiationSession};
use std::sync::Arc;
use thiserror::Error;

/// Result type for negotiation repository operations.
pub type NegotiationRepositoryResult<T> = Result<T, NegotiationRepositoryError>;

/// Session storage keyed by id and scoped by task.
///
/// Implementations must apply [`NegotiationRepository::update`] atomically
/// with respect to other updates of the same session.
pub trait NegotiationRepository: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationRepositoryError::DuplicateSession`] when the id
    /// already exists.
    fn insert(&self, session: NegotiationSession) -> NegotiationRepositoryResult<()>;

    /// Retrieves a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationRepositoryError::Persistence`] when storage
    /// fails.
    fn find_by_id(
        &self,
        id: NegotiationId,
    ) -> NegotiationRepositoryResult<Option<NegotiationSession>>;

    /// Lists a task's sessions in the order they were opened.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationRepositoryError::Persistence`] when storage
    /// fails.
    fn find_by_task(
        &self,
        task_id: &TaskId,
    ) -> NegotiationRepositoryResult<Vec<NegotiationSession>>;

    /// Applies `apply` to the stored session in place, returning its
    /// result, or `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationRepositoryError::Persistence`] when storage
    /// fails.
    fn update<F, T>(&self, id: NegotiationId, apply: F) -> NegotiationRepositoryResult<Option<T>>
    where
        F: FnOnce(&mut NegotiationSession) -> T;

    /// Deletes a task's sessions, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationRepositoryError::Persistence`] when storage
    /// fails.
    fn clear_task(&self, task_id: &TaskId) -> NegotiationRepositoryResult<usize>;

    /// Deletes every session.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationRepositoryError::Persistence`] when storage
    /// fails.
    fn clear(&self) -> NegotiationRepositoryResult<()>;
}

/// Errors returned by negotiation repositories.
#[derive(Debug, Clone, Error)]
pub enum NegotiationRepositoryError {
    /// A session with the same id already exists.
    #[error("duplicate negotiation: {0}")]
    DuplicateSession(NegotiationId),

    /// The backing storage failed.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NegotiationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
