//! The shared blackboard service.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::{AgentName, TaskId};
use crate::blackboard::{
    domain::{BlackboardDomainError, BlackboardEntry, EntryId, EntryParams, WriteOptions},
    ports::{BlackboardStore, BlackboardStoreError},
};
use crate::config::CoordinationConfig;
use mockable::Clock;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for blackboard operations.
#[derive(Debug, Clone, Error)]
pub enum BlackboardError {
    /// The entry to supersede does not exist.
    #[error("blackboard entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The key is empty after trimming.
    #[error("blackboard key must not be empty")]
    EmptyKey,

    /// The entry store failed.
    #[error(transparent)]
    Store(#[from] BlackboardStoreError),
}

impl From<BlackboardDomainError> for BlackboardError {
    fn from(err: BlackboardDomainError) -> Self {
        match err {
            BlackboardDomainError::EmptyKey => Self::EmptyKey,
        }
    }
}

/// Result type for blackboard operations.
pub type BlackboardResult<T> = Result<T, BlackboardError>;

/// Task-scoped, confidence-ranked knowledge store shared by agents.
///
/// Writes never overwrite: a key's current value is its latest entry, and
/// [`SharedBlackboard::supersede`] links a replacement to the entry it
/// retires.
pub struct SharedBlackboard<B, C>
where
    B: BlackboardStore,
    C: Clock + Send + Sync,
{
    store: Arc<B>,
    clock: Arc<C>,
    pub(super) config: CoordinationConfig,
}

impl<B, C> SharedBlackboard<B, C>
where
    B: BlackboardStore,
    C: Clock + Send + Sync,
{
    /// Creates a blackboard over `store`.
    #[must_use]
    pub const fn new(store: Arc<B>, clock: Arc<C>, config: CoordinationConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Appends a new entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::EmptyKey`] for a blank key and
    /// [`BlackboardError::Store`] when the store fails.
    pub fn write(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        agent: AgentName,
        task_id: TaskId,
        options: WriteOptions,
    ) -> BlackboardResult<BlackboardEntry> {
        self.record(EntryParams {
            key: key.into(),
            value: value.into(),
            agent,
            task_id,
            options,
            supersedes: None,
        })
    }

    /// Writes a replacement for `old_id` under the old entry's task. The
    /// key may differ; the old entry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::EntryNotFound`] when `old_id` is unknown.
    pub fn supersede(
        &self,
        old_id: EntryId,
        new_key: impl Into<String>,
        new_value: impl Into<Value>,
        agent: AgentName,
    ) -> BlackboardResult<BlackboardEntry> {
        let old = self
            .store
            .find_by_id(old_id)?
            .ok_or(BlackboardError::EntryNotFound(old_id))?;
        self.record(EntryParams {
            key: new_key.into(),
            value: new_value.into(),
            agent,
            task_id: old.task_id().clone(),
            options: WriteOptions::default(),
            supersedes: Some(old_id),
        })
    }

    fn record(&self, params: EntryParams) -> BlackboardResult<BlackboardEntry> {
        let entry = BlackboardEntry::new(params, self.clock.utc())?;
        self.store.append(entry.clone())?;
        debug!(
            entry_id = %entry.id(),
            key = entry.key(),
            agent = %entry.agent(),
            task_id = %entry.task_id(),
            confidence = %entry.confidence(),
            supersedes = ?entry.supersedes(),
            "blackboard entry written"
        );
        Ok(entry)
    }

    /// Returns the latest entry for `key`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn read(&self, key: &str, task_id: &TaskId) -> BlackboardResult<Option<BlackboardEntry>> {
        Ok(self.store.latest(task_id, key.trim())?)
    }

    /// Returns an entry by id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn get(&self, id: EntryId) -> BlackboardResult<Option<BlackboardEntry>> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Lists every entry of the task, highest confidence first; equal
    /// scores keep write order. With `tags`, keeps entries carrying any of
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn read_all(
        &self,
        task_id: &TaskId,
        tags: Option<&[&str]>,
    ) -> BlackboardResult<Vec<BlackboardEntry>> {
        let mut entries = self.store.find_by_task(task_id)?;
        if let Some(wanted) = tags {
            entries.retain(|entry| entry.has_any_tag(wanted));
        }
        entries.sort_by(|a, b| b.confidence().cmp_score(a.confidence()));
        Ok(entries)
    }

    /// Latest entry per key for the task.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn snapshot(
        &self,
        task_id: &TaskId,
    ) -> BlackboardResult<BTreeMap<String, BlackboardEntry>> {
        Ok(self
            .store
            .latest_per_key(task_id)?
            .into_iter()
            .map(|entry| (entry.key().to_owned(), entry))
            .collect())
    }

    /// Every entry written under `key`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn history(&self, key: &str, task_id: &TaskId) -> BlackboardResult<Vec<BlackboardEntry>> {
        Ok(self.store.history(task_id, key.trim())?)
    }

    /// The entry followed by each entry it transitively supersedes, newest
    /// first. Empty when `id` is unknown; stops at a cleared ancestor.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn supersession_chain(&self, id: EntryId) -> BlackboardResult<Vec<BlackboardEntry>> {
        let mut chain = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            let Some(entry) = self.store.find_by_id(current)? else {
                break;
            };
            next = entry.supersedes();
            chain.push(entry);
        }
        Ok(chain)
    }

    /// Deletes every entry of the task, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn clear(&self, task_id: &TaskId) -> BlackboardResult<usize> {
        let removed = self.store.clear_task(task_id)?;
        debug!(task_id = %task_id, removed, "cleared blackboard task");
        Ok(removed)
    }

    /// Deletes every entry of every task.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardError::Store`] when the store fails.
    pub fn reset(&self) -> BlackboardResult<()> {
        Ok(self.store.clear()?)
    }
}
