//! Negotiation session aggregate.

use super::{NegotiationDomainError, NegotiationId, NegotiationStatus, Resolver};
use crate::agent::{AgentName, TaskId};
use crate::bus::domain::MessageId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for opening a negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenNegotiationParams {
    /// Task the disagreement belongs to.
    pub task_id: TaskId,
    /// Agent proposing a position.
    pub initiator: AgentName,
    /// Agent asked to respond.
    pub respondent: AgentName,
    /// Subject of the disagreement.
    pub topic: String,
    /// The initiator's proposal.
    pub initiator_position: String,
}

impl OpenNegotiationParams {
    /// Bundles the fields required to open a session.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        initiator: AgentName,
        respondent: AgentName,
        topic: impl Into<String>,
        initiator_position: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            initiator,
            respondent,
            topic: topic.into(),
            initiator_position: initiator_position.into(),
        }
    }
}

/// A bounded consensus exchange between two agents.
///
/// Every transition records the id of the bus message that announced it,
/// so `message_ids` grows by exactly one per protocol action. Sessions in
/// [`NegotiationStatus::Agreed`] or [`NegotiationStatus::Escalated`]
/// reject further transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationSession {
    id: NegotiationId,
    task_id: TaskId,
    initiator: AgentName,
    respondent: AgentName,
    topic: String,
    initiator_position: String,
    respondent_position: Option<String>,
    status: NegotiationStatus,
    resolution: Option<String>,
    resolved_by: Option<Resolver>,
    escalation_reason: Option<String>,
    message_ids: Vec<MessageId>,
    opened_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NegotiationSession {
    /// Opens a session announced by the `proposal` message.
    #[must_use]
    pub fn open(params: OpenNegotiationParams, proposal: MessageId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: NegotiationId::new(),
            task_id: params.task_id,
            initiator: params.initiator,
            respondent: params.respondent,
            topic: params.topic,
            initiator_position: params.initiator_position,
            respondent_position: None,
            status: NegotiationStatus::Open,
            resolution: None,
            resolved_by: None,
            escalation_reason: None,
            message_ids: vec![proposal],
            opened_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> NegotiationId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the proposing agent.
    #[must_use]
    pub const fn initiator(&self) -> &AgentName {
        &self.initiator
    }

    /// Returns the responding agent.
    #[must_use]
    pub const fn respondent(&self) -> &AgentName {
        &self.respondent
    }

    /// Returns the negotiated topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the initiator's position.
    #[must_use]
    pub fn initiator_position(&self) -> &str {
        &self.initiator_position
    }

    /// Returns the respondent's latest position, if any.
    #[must_use]
    pub fn respondent_position(&self) -> Option<&str> {
        self.respondent_position.as_deref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> NegotiationStatus {
        self.status
    }

    /// Returns the agreed resolution, if any.
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    /// Returns who resolved or received the session, if anyone.
    #[must_use]
    pub const fn resolved_by(&self) -> Option<&Resolver> {
        self.resolved_by.as_ref()
    }

    /// Returns the reason given for escalation, if escalated.
    #[must_use]
    pub fn escalation_reason(&self) -> Option<&str> {
        self.escalation_reason.as_deref()
    }

    /// Returns the announcing message ids, one per transition.
    #[must_use]
    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }

    /// Returns the opening proposal's message id.
    #[must_use]
    pub fn proposal_id(&self) -> Option<MessageId> {
        self.message_ids.first().copied()
    }

    /// Returns when the session was opened.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Returns when the session last changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the party opposite `agent`; third parties face the
    /// respondent.
    #[must_use]
    pub fn counterpart_of(&self, agent: &AgentName) -> &AgentName {
        if agent == &self.respondent {
            &self.initiator
        } else {
            &self.respondent
        }
    }

    /// Fails when the session no longer accepts transitions.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationDomainError::AlreadyTerminal`] for agreed or
    /// escalated sessions.
    pub const fn ensure_active(&self) -> Result<(), NegotiationDomainError> {
        if self.status.is_terminal() {
            return Err(NegotiationDomainError::AlreadyTerminal {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Records the respondent's position. Later counters replace earlier
    /// ones.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationDomainError::AlreadyTerminal`] when the session
    /// is closed.
    pub fn record_counter(
        &mut self,
        position: String,
        message: MessageId,
        clock: &impl Clock,
    ) -> Result<(), NegotiationDomainError> {
        self.ensure_active()?;
        self.respondent_position = Some(position);
        self.status = NegotiationStatus::Countered;
        self.advance(message, clock);
        Ok(())
    }

    /// Records an agreed resolution.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationDomainError::AlreadyTerminal`] when the session
    /// is closed.
    pub fn record_agreement(
        &mut self,
        resolution: String,
        resolver: Resolver,
        message: MessageId,
        clock: &impl Clock,
    ) -> Result<(), NegotiationDomainError> {
        self.ensure_active()?;
        self.resolution = Some(resolution);
        self.resolved_by = Some(resolver);
        self.status = NegotiationStatus::Agreed;
        self.advance(message, clock);
        Ok(())
    }

    /// Records a hand-off to `arbitrator`.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationDomainError::AlreadyTerminal`] when the session
    /// is closed.
    pub fn record_escalation(
        &mut self,
        reason: String,
        arbitrator: AgentName,
        message: MessageId,
        clock: &impl Clock,
    ) -> Result<(), NegotiationDomainError> {
        self.ensure_active()?;
        self.escalation_reason = Some(reason);
        self.resolved_by = Some(Resolver::Agent(arbitrator));
        self.status = NegotiationStatus::Escalated;
        self.advance(message, clock);
        Ok(())
    }

    fn advance(&mut self, message: MessageId, clock: &impl Clock) {
        self.message_ids.push(message);
        self.updated_at = clock.utc();
    }
}
