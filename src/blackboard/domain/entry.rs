//! Blackboard entries.

use super::{BlackboardDomainError, Confidence, EntryId, WriteOptions};
use crate::agent::{AgentName, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Parameter object for creating an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryParams {
    /// Lookup key within the task.
    pub key: String,
    /// Arbitrary JSON payload.
    pub value: Value,
    /// Writing agent.
    pub agent: AgentName,
    /// Owning task.
    pub task_id: TaskId,
    /// Confidence and tags.
    pub options: WriteOptions,
    /// Entry this one replaces, if any.
    pub supersedes: Option<EntryId>,
}

/// A timestamped, confidence-scored fact written by an agent for a task.
///
/// Entries are immutable. Replacing one means writing a new entry that
/// names it in [`BlackboardEntry::supersedes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackboardEntry {
    id: EntryId,
    key: String,
    value: Value,
    agent: AgentName,
    task_id: TaskId,
    confidence: Confidence,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
    written_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supersedes: Option<EntryId>,
}

impl BlackboardEntry {
    /// Creates an entry written at `written_at`.
    ///
    /// # Errors
    ///
    /// Returns [`BlackboardDomainError::EmptyKey`] for a blank key.
    pub fn new(
        params: EntryParams,
        written_at: DateTime<Utc>,
    ) -> Result<Self, BlackboardDomainError> {
        let key = params.key.trim();
        if key.is_empty() {
            return Err(BlackboardDomainError::EmptyKey);
        }
        let (confidence, tags) = params.options.into_parts();

        Ok(Self {
            id: EntryId::new(),
            key: key.to_owned(),
            value: params.value,
            agent: params.agent,
            task_id: params.task_id,
            confidence,
            tags,
            written_at,
            supersedes: params.supersedes,
        })
    }

    /// Returns the entry id.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the payload.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the writing agent.
    #[must_use]
    pub const fn agent(&self) -> &AgentName {
        &self.agent
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the writer's confidence.
    #[must_use]
    pub const fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Returns the tags.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the write time.
    #[must_use]
    pub const fn written_at(&self) -> DateTime<Utc> {
        self.written_at
    }

    /// Returns the entry this one replaces, if any.
    #[must_use]
    pub const fn supersedes(&self) -> Option<EntryId> {
        self.supersedes
    }

    /// Returns `true` when any of `tags` is attached to this entry.
    #[must_use]
    pub fn has_any_tag<T: AsRef<str>>(&self, tags: &[T]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag.as_ref()))
    }

    /// Renders the payload for prompts: strings verbatim, anything else as
    /// compact JSON.
    #[must_use]
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
