//! Message type vocabulary.

use super::ParseMessageTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an inter-agent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    /// An agent shares a finding with peers.
    FindingShare,
    /// Opening position of a negotiation.
    Propose,
    /// Counter-position in a negotiation.
    Counter,
    /// Agreement that closes a negotiation.
    Agree,
    /// Hand a disagreement to the arbitrator.
    Escalate,
    /// A question that expects an answer.
    Question,
    /// Answer to a question.
    Answer,
    /// Something new was discovered about the task.
    Discovery,
    /// A risk or problem other agents should know about.
    Warning,
    /// Progress report.
    StatusUpdate,
    /// Ask a peer to review work.
    ReviewRequest,
    /// Outcome of a review.
    ReviewResult,
    /// Declares that work depends on another agent's output.
    Dependency,
}

impl MessageType {
    /// Every message type, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::FindingShare,
        Self::Propose,
        Self::Counter,
        Self::Agree,
        Self::Escalate,
        Self::Question,
        Self::Answer,
        Self::Discovery,
        Self::Warning,
        Self::StatusUpdate,
        Self::ReviewRequest,
        Self::ReviewResult,
        Self::Dependency,
    ];

    /// Returns the canonical wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FindingShare => "finding-share",
            Self::Propose => "propose",
            Self::Counter => "counter",
            Self::Agree => "agree",
            Self::Escalate => "escalate",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Discovery => "discovery",
            Self::Warning => "warning",
            Self::StatusUpdate => "status-update",
            Self::ReviewRequest => "review-request",
            Self::ReviewResult => "review-result",
            Self::Dependency => "dependency",
        }
    }

    /// Returns the glyph used when rendering the message into prompt context.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::FindingShare => "🔎",
            Self::Propose => "💡",
            Self::Counter => "↩️",
            Self::Agree => "✅",
            Self::Escalate => "🚨",
            Self::Question => "❓",
            Self::Answer => "💬",
            Self::Discovery => "✨",
            Self::Warning => "⚠️",
            Self::StatusUpdate => "📊",
            Self::ReviewRequest => "👀",
            Self::ReviewResult => "📝",
            Self::Dependency => "🔗",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MessageType {
    type Error = ParseMessageTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseMessageTypeError(value.to_owned()))
    }
}
