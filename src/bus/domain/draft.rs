//! Unsent message drafts.

use super::{MessageDraftError, MessageId, MessageType, Priority};
use crate::agent::{AgentName, Recipient, TaskId};

/// A message as composed by an agent, before the bus assigns an id and a
/// send timestamp.
///
/// # Examples
///
/// ```
/// use concord::agent::{AgentName, Recipient, TaskId};
/// use concord::bus::domain::{MessageDraft, MessageType, Priority};
///
/// let draft = MessageDraft::new(
///     MessageType::Warning,
///     AgentName::new("MARS").expect("valid agent"),
///     Recipient::Broadcast,
///     TaskId::new("task-001").expect("valid task"),
/// )
/// .with_subject("schema drift")
/// .with_body("users table lost its index")
/// .with_priority(Priority::High);
///
/// assert!(draft.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub(crate) kind: MessageType,
    pub(crate) from: AgentName,
    pub(crate) to: Recipient,
    pub(crate) task_id: TaskId,
    pub(crate) subject: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) priority: Priority,
    pub(crate) requires_response: bool,
    pub(crate) reply_to: Option<MessageId>,
}

impl MessageDraft {
    /// Starts a draft with the addressing fields every message needs.
    #[must_use]
    pub fn new(
        kind: MessageType,
        from: AgentName,
        to: impl Into<Recipient>,
        task_id: TaskId,
    ) -> Self {
        Self {
            kind,
            from,
            to: to.into(),
            task_id,
            subject: None,
            body: None,
            priority: Priority::Normal,
            requires_response: false,
            reply_to: None,
        }
    }

    /// Sets the subject line.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Flags that the sender expects a reply.
    #[must_use]
    pub const fn requiring_response(mut self) -> Self {
        self.requires_response = true;
        self
    }

    /// Marks the draft as a reply to an earlier message.
    #[must_use]
    pub const fn in_reply_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    /// Returns the message type.
    #[must_use]
    pub const fn kind(&self) -> MessageType {
        self.kind
    }

    /// Returns the reply target, if any.
    #[must_use]
    pub const fn reply_to(&self) -> Option<MessageId> {
        self.reply_to
    }

    /// Checks the fields that can be verified without the message store.
    ///
    /// # Errors
    ///
    /// Returns [`MessageDraftError::MissingField`] when the subject or body
    /// was never set, and [`MessageDraftError::EmptySubject`] /
    /// [`MessageDraftError::EmptyBody`] when they are blank.
    pub fn validate(&self) -> Result<(), MessageDraftError> {
        let subject = self
            .subject
            .as_deref()
            .ok_or(MessageDraftError::MissingField("subject"))?;
        let body = self
            .body
            .as_deref()
            .ok_or(MessageDraftError::MissingField("body"))?;

        if subject.trim().is_empty() {
            return Err(MessageDraftError::EmptySubject);
        }
        if body.trim().is_empty() {
            return Err(MessageDraftError::EmptyBody);
        }
        Ok(())
    }
}
