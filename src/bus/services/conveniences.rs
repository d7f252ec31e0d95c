//! Typed wrappers around [`MessageBus::send`] for the common message shapes.

use super::MessageBus;
use crate::agent::{AgentName, Recipient, TaskId};
use crate::bus::{
    domain::{AgentMessage, MessageDraft, MessageType, Priority},
    error::BusResult,
    ports::MessageStore,
};
use mockable::Clock;

impl<S, C> MessageBus<S, C>
where
    S: MessageStore,
    C: Clock + Send + Sync,
{
    /// Sends a question that expects an answer.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn ask(
        &self,
        from: AgentName,
        to: AgentName,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        question: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(MessageType::Question, from, to, task_id)
            .with_subject(subject)
            .with_body(question)
            .requiring_response();
        self.send(draft).await
    }

    /// Answers `question`, addressed back to its sender and threaded under
    /// it.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn answer(
        &self,
        question: &AgentMessage,
        from: AgentName,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = reply_draft(question, MessageType::Answer, from).with_body(body);
        self.send(draft).await
    }

    /// Sends a message of any type to every subscriber.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn broadcast(
        &self,
        kind: MessageType,
        from: AgentName,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(kind, from, Recipient::Broadcast, task_id)
            .with_subject(subject)
            .with_body(body);
        self.send(draft).await
    }

    /// Shares a finding with one agent or with everyone.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn share_finding(
        &self,
        from: AgentName,
        to: impl Into<Recipient> + Send,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(MessageType::FindingShare, from, to, task_id)
            .with_subject(subject)
            .with_body(body);
        self.send(draft).await
    }

    /// Broadcasts a high-priority warning.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn warn(
        &self,
        from: AgentName,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(MessageType::Warning, from, Recipient::Broadcast, task_id)
            .with_subject(subject)
            .with_body(body)
            .with_priority(Priority::High);
        self.send(draft).await
    }

    /// Asks `reviewer` to review a piece of work.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn request_review(
        &self,
        from: AgentName,
        reviewer: AgentName,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(MessageType::ReviewRequest, from, reviewer, task_id)
            .with_subject(subject)
            .with_body(body)
            .requiring_response();
        self.send(draft).await
    }

    /// Replies to a review request with the reviewer's verdict.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn submit_review(
        &self,
        request: &AgentMessage,
        reviewer: AgentName,
        verdict: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = reply_draft(request, MessageType::ReviewResult, reviewer).with_body(verdict);
        self.send(draft).await
    }

    /// Broadcasts a low-priority progress note.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn status_update(
        &self,
        from: AgentName,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(
            MessageType::StatusUpdate,
            from,
            Recipient::Broadcast,
            task_id,
        )
        .with_subject(subject)
        .with_body(body)
        .with_priority(Priority::Low);
        self.send(draft).await
    }

    /// Tells `provider` that `from` is blocked on its output.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn declare_dependency(
        &self,
        from: AgentName,
        provider: AgentName,
        task_id: TaskId,
        subject: impl Into<String> + Send,
        body: impl Into<String> + Send,
    ) -> BusResult<AgentMessage> {
        let draft = MessageDraft::new(MessageType::Dependency, from, provider, task_id)
            .with_subject(subject)
            .with_body(body)
            .requiring_response();
        self.send(draft).await
    }
}

fn reply_draft(parent: &AgentMessage, kind: MessageType, from: AgentName) -> MessageDraft {
    MessageDraft::new(kind, from, parent.from().clone(), parent.task_id().clone())
        .with_subject(format!("Re: {}", parent.subject()))
        .with_priority(parent.priority())
        .in_reply_to(parent.id())
}
