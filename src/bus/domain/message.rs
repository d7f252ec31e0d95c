//! The recorded inter-agent message.

use super::{MessageDraft, MessageDraftError, MessageId, MessageType, Priority};
use crate::agent::{AgentName, Recipient, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message recorded by the bus.
///
/// Every field is fixed at send time except read tracking: `read_at` is set
/// once by the first reader and `read_by` collects every reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    id: MessageId,
    #[serde(rename = "type")]
    kind: MessageType,
    from: AgentName,
    to: Recipient,
    subject: String,
    body: String,
    task_id: TaskId,
    priority: Priority,
    requires_response: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_id: Option<MessageId>,
    sent_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    read_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    read_by: BTreeMap<AgentName, DateTime<Utc>>,
}

impl AgentMessage {
    /// Turns a validated draft into a message stamped with `sent_at`.
    ///
    /// # Errors
    ///
    /// Propagates [`MessageDraft::validate`] failures.
    pub fn from_draft(
        draft: MessageDraft,
        sent_at: DateTime<Utc>,
    ) -> Result<Self, MessageDraftError> {
        draft.validate()?;
        let MessageDraft {
            kind,
            from,
            to,
            task_id,
            subject,
            body,
            priority,
            requires_response,
            reply_to,
        } = draft;

        Ok(Self {
            id: MessageId::new(),
            kind,
            from,
            to,
            subject: subject.unwrap_or_default(),
            body: body.unwrap_or_default(),
            task_id,
            priority,
            requires_response,
            reply_to_id: reply_to,
            sent_at,
            read_at: None,
            read_by: BTreeMap::new(),
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the message type.
    #[must_use]
    pub const fn kind(&self) -> MessageType {
        self.kind
    }

    /// Returns the sending agent.
    #[must_use]
    pub const fn from(&self) -> &AgentName {
        &self.from
    }

    /// Returns the addressee.
    #[must_use]
    pub const fn to(&self) -> &Recipient {
        &self.to
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns `true` when the sender expects a reply.
    #[must_use]
    pub const fn requires_response(&self) -> bool {
        self.requires_response
    }

    /// Returns the message this one replies to.
    #[must_use]
    pub const fn reply_to_id(&self) -> Option<MessageId> {
        self.reply_to_id
    }

    /// Returns the send timestamp.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Returns when the message was first read.
    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Returns every reader and when they read the message.
    #[must_use]
    pub const fn read_by(&self) -> &BTreeMap<AgentName, DateTime<Utc>> {
        &self.read_by
    }

    /// Returns `true` for broadcast messages.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        self.to.is_broadcast()
    }

    /// Returns `true` when the message reaches `agent` directly or by
    /// broadcast.
    #[must_use]
    pub fn is_for(&self, agent: &AgentName) -> bool {
        self.to.reaches(agent)
    }

    /// Records a read receipt. `read_at` keeps the first reader's timestamp.
    pub(crate) fn mark_read(&mut self, reader: AgentName, at: DateTime<Utc>) {
        self.read_at.get_or_insert(at);
        self.read_by.entry(reader).or_insert(at);
    }
}
