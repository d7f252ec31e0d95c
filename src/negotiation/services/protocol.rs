//! The negotiation state machine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::agent::{AgentName, TaskId};
use crate::bus::{
    domain::{MessageDraft, MessageId, MessageType, Priority},
    error::BusError,
    ports::MessageStore,
    services::MessageBus,
};
use crate::negotiation::{
    domain::{
        NegotiationDomainError, NegotiationId, NegotiationSession, NegotiationStatus,
        OpenNegotiationParams, Resolver,
    },
    ports::{NegotiationRepository, NegotiationRepositoryError},
};
use mockable::Clock;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Service-level errors for negotiation operations.
#[derive(Debug, Clone, Error)]
pub enum NegotiationError {
    /// No session exists with this id.
    #[error("negotiation not found: {0}")]
    SessionNotFound(NegotiationId),

    /// The session is agreed or escalated; nothing was sent.
    #[error("negotiation {id} is already {status}")]
    AlreadyTerminal {
        /// Session that rejected the call.
        id: NegotiationId,
        /// Its terminal status.
        status: NegotiationStatus,
    },

    /// Sending the protocol message failed.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The session repository failed.
    #[error(transparent)]
    Repository(#[from] NegotiationRepositoryError),
}

impl From<NegotiationDomainError> for NegotiationError {
    fn from(err: NegotiationDomainError) -> Self {
        match err {
            NegotiationDomainError::AlreadyTerminal { id, status } => {
                Self::AlreadyTerminal { id, status }
            }
        }
    }
}

/// Result type for negotiation operations.
pub type NegotiationResult<T> = Result<T, NegotiationError>;

type SessionLocks = HashMap<NegotiationId, Arc<AsyncMutex<()>>>;

/// Consensus state machine layered on [`MessageBus::send`].
///
/// Each action sends one message and records its id on the session.
/// Counter, agreement and escalation messages reply to the opening
/// proposal, so the whole exchange is a single bus thread.
///
/// Moves on one session are serialised: the active check, the send and
/// the recorded transition happen under a per-session lock, so a move
/// that loses a race sends nothing. A handler must not await another
/// move on the session it is being notified about; that move waits for
/// the handler timeout.
pub struct NegotiationProtocol<S, R, C>
where
    S: MessageStore,
    R: NegotiationRepository,
    C: Clock + Send + Sync,
{
    bus: Arc<MessageBus<S, C>>,
    repository: Arc<R>,
    clock: Arc<C>,
    session_locks: Mutex<SessionLocks>,
}

impl<S, R, C> NegotiationProtocol<S, R, C>
where
    S: MessageStore,
    R: NegotiationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a protocol that announces transitions on `bus`.
    #[must_use]
    pub fn new(bus: Arc<MessageBus<S, C>>, repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            bus,
            repository,
            clock,
            session_locks: Mutex::default(),
        }
    }

    /// Opens a session and sends the proposal from initiator to respondent.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::Bus`] when the proposal cannot be sent
    /// (for example a blank topic) and [`NegotiationError::Repository`]
    /// when the session cannot be stored.
    pub async fn open_negotiation(
        &self,
        task_id: TaskId,
        initiator: AgentName,
        respondent: AgentName,
        topic: impl Into<String> + Send,
        initiator_position: impl Into<String> + Send,
    ) -> NegotiationResult<NegotiationSession> {
        let params = OpenNegotiationParams::new(
            task_id,
            initiator,
            respondent,
            topic,
            initiator_position,
        );
        let proposal = MessageDraft::new(
            MessageType::Propose,
            params.initiator.clone(),
            params.respondent.clone(),
            params.task_id.clone(),
        )
        .with_subject(format!("Proposal: {}", params.topic))
        .with_body(params.initiator_position.clone())
        .requiring_response();
        let message = self.bus.send(proposal).await?;

        let session = NegotiationSession::open(params, message.id(), &*self.clock);
        self.repository.insert(session.clone())?;
        debug!(
            negotiation_id = %session.id(),
            task_id = %session.task_id(),
            initiator = %session.initiator(),
            respondent = %session.respondent(),
            "negotiation opened"
        );
        Ok(session)
    }

    /// Records the respondent's position and sends it back to the
    /// initiator. May be repeated; the latest position wins.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::SessionNotFound`] for an unknown id and
    /// [`NegotiationError::AlreadyTerminal`] for a closed session.
    pub async fn respond_to_negotiation(
        &self,
        id: NegotiationId,
        position: impl Into<String> + Send,
    ) -> NegotiationResult<NegotiationSession> {
        let (_turn, session) = self.begin_move(id).await?;
        let position = position.into();
        let counter = self
            .reply_draft(
                &session,
                MessageType::Counter,
                session.respondent().clone(),
                session.initiator().clone(),
            )
            .with_subject(format!("Counter: {}", session.topic()))
            .with_body(position.clone())
            .requiring_response();
        let message = self.bus.send(counter).await?;

        let updated = self.apply(id, |session, clock| {
            session.record_counter(position, message.id(), clock)
        })?;
        debug!(negotiation_id = %id, status = %updated.status(), "negotiation countered");
        Ok(updated)
    }

    /// Closes the session by agreement.
    ///
    /// The agreement is sent by the resolving agent, or by the initiator
    /// for [`Resolver::Auto`], to the other party.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::SessionNotFound`] for an unknown id and
    /// [`NegotiationError::AlreadyTerminal`] for a closed session.
    pub async fn resolve(
        &self,
        id: NegotiationId,
        resolution: impl Into<String> + Send,
        resolved_by: Resolver,
    ) -> NegotiationResult<NegotiationSession> {
        let (_turn, session) = self.begin_move(id).await?;
        let resolution = resolution.into();
        let sender = resolved_by
            .agent()
            .unwrap_or_else(|| session.initiator())
            .clone();
        let recipient = session.counterpart_of(&sender).clone();
        let agreement = self
            .reply_draft(&session, MessageType::Agree, sender, recipient)
            .with_subject(format!("Agreed: {}", session.topic()))
            .with_body(resolution.clone());
        let message = self.bus.send(agreement).await?;

        let updated = self.apply(id, |session, clock| {
            session.record_agreement(resolution, resolved_by, message.id(), clock)
        })?;
        debug!(
            negotiation_id = %id,
            resolved_by = ?updated.resolved_by(),
            "negotiation agreed"
        );
        Ok(updated)
    }

    /// Hands the session to the configured arbitrator.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::SessionNotFound`] for an unknown id and
    /// [`NegotiationError::AlreadyTerminal`] for a closed session.
    pub async fn escalate(
        &self,
        id: NegotiationId,
        reason: impl Into<String> + Send,
    ) -> NegotiationResult<NegotiationSession> {
        let (_turn, session) = self.begin_move(id).await?;
        let reason = reason.into();
        let arbitrator = self.bus.config().arbitrator.clone();
        let escalation = self
            .reply_draft(
                &session,
                MessageType::Escalate,
                session.initiator().clone(),
                arbitrator.clone(),
            )
            .with_subject(format!("Escalation: {}", session.topic()))
            .with_body(reason.clone())
            .with_priority(Priority::High)
            .requiring_response();
        let message = self.bus.send(escalation).await?;

        let updated = self.apply(id, |session, clock| {
            session.record_escalation(reason, arbitrator, message.id(), clock)
        })?;
        info!(
            negotiation_id = %id,
            task_id = %updated.task_id(),
            arbitrator = %self.bus.config().arbitrator,
            "negotiation escalated"
        );
        Ok(updated)
    }

    /// Returns a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::SessionNotFound`] for an unknown id.
    pub fn session(&self, id: NegotiationId) -> NegotiationResult<NegotiationSession> {
        self.repository
            .find_by_id(id)?
            .ok_or(NegotiationError::SessionNotFound(id))
    }

    /// Lists a task's sessions that are still open or countered.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::Repository`] when storage fails.
    pub fn get_open_negotiations(
        &self,
        task_id: &TaskId,
    ) -> NegotiationResult<Vec<NegotiationSession>> {
        let mut sessions = self.repository.find_by_task(task_id)?;
        sessions.retain(|session| !session.status().is_terminal());
        Ok(sessions)
    }

    /// Lists all of a task's sessions in the order they were opened.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::Repository`] when storage fails.
    pub fn sessions_for_task(
        &self,
        task_id: &TaskId,
    ) -> NegotiationResult<Vec<NegotiationSession>> {
        Ok(self.repository.find_by_task(task_id)?)
    }

    /// Deletes a task's sessions, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::Repository`] when storage fails.
    pub fn clear_task(&self, task_id: &TaskId) -> NegotiationResult<usize> {
        let doomed = self.repository.find_by_task(task_id)?;
        let removed = self.repository.clear_task(task_id)?;
        let mut locks = self.locks();
        for session in &doomed {
            locks.remove(&session.id());
        }
        drop(locks);
        debug!(task_id = %task_id, removed, "cleared task negotiations");
        Ok(removed)
    }

    /// Deletes every session.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::Repository`] when storage fails.
    pub fn reset(&self) -> NegotiationResult<()> {
        self.repository.clear()?;
        self.locks().clear();
        Ok(())
    }

    /// Applies the configured negotiation policy: `true` when `confidence`
    /// is below the threshold and a peer has relevant expertise.
    #[must_use]
    pub fn should_trigger_negotiation(&self, confidence: f64, peer_has_expertise: bool) -> bool {
        confidence < self.bus.config().negotiation_confidence_threshold && peer_has_expertise
    }

    /// Waits for the session's turn, then checks it is still active.
    async fn begin_move(
        &self,
        id: NegotiationId,
    ) -> NegotiationResult<(OwnedMutexGuard<()>, NegotiationSession)> {
        self.session(id)?;
        let lock = Arc::clone(self.locks().entry(id).or_default());
        let turn = lock.lock_owned().await;
        let checked = self.session(id).and_then(|session| {
            session.ensure_active()?;
            Ok(session)
        });
        if checked.is_err() {
            self.locks().remove(&id);
        }
        checked.map(|session| (turn, session))
    }

    fn locks(&self) -> MutexGuard<'_, SessionLocks> {
        self.session_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn reply_draft(
        &self,
        session: &NegotiationSession,
        kind: MessageType,
        from: AgentName,
        to: AgentName,
    ) -> MessageDraft {
        let draft = MessageDraft::new(kind, from, to, session.task_id().clone());
        match self.thread_root(session) {
            Some(root) => draft.in_reply_to(root),
            None => draft,
        }
    }

    /// The proposal, unless its task's messages were cleared.
    fn thread_root(&self, session: &NegotiationSession) -> Option<MessageId> {
        session
            .proposal_id()
            .filter(|root| matches!(self.bus.get_message(*root), Ok(Some(_))))
    }

    fn apply<F>(&self, id: NegotiationId, transition: F) -> NegotiationResult<NegotiationSession>
    where
        F: FnOnce(&mut NegotiationSession, &C) -> Result<(), NegotiationDomainError>,
    {
        let clock = &*self.clock;
        let outcome = self.repository.update(id, |session| {
            transition(session, clock).map(|()| session.clone())
        })?;
        let updated = match outcome {
            Some(result) => result?,
            None => return Err(NegotiationError::SessionNotFound(id)),
        };
        if updated.status().is_terminal() {
            self.locks().remove(&id);
        }
        Ok(updated)
    }
}
