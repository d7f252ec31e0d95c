//! Error types for message construction and parsing.

use super::MessageId;
use thiserror::Error;

/// Errors raised while validating a [`MessageDraft`](super::MessageDraft)
/// before it is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageDraftError {
    /// A required field was never set.
    #[error("message draft is missing required field '{0}'")]
    MissingField(&'static str),

    /// The subject is blank.
    #[error("message subject must not be empty")]
    EmptySubject,

    /// The body is blank.
    #[error("message body must not be empty")]
    EmptyBody,

    /// The draft replies to a message the store has never seen.
    #[error("reply target {0} does not exist")]
    UnknownReplyTarget(MessageId),
}

/// Error returned when parsing an unknown message type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message type: {0}")]
pub struct ParseMessageTypeError(pub String);

/// Error returned when parsing an unknown priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
