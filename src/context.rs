//! Per-build coordination root.
//!
//! A [`CoordinationContext`] owns one bus, one negotiation protocol and one
//! blackboard. The orchestrator builds a context per build, hands it to
//! every agent, and clears or resets it explicitly; nothing is global.

use std::sync::Arc;

use crate::agent::{AgentName, TaskId};
use crate::blackboard::{
    adapters::memory::InMemoryBlackboardStore,
    services::{BlackboardError, SharedBlackboard},
};
use crate::bus::{
    adapters::memory::InMemoryMessageStore,
    error::BusError,
    services::{MessageBus, build_communication_context},
};
use crate::config::CoordinationConfig;
use crate::negotiation::{
    adapters::memory::InMemoryNegotiationRepository,
    services::{NegotiationError, NegotiationProtocol},
};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::info;

/// Bus type held by a context.
pub type ContextBus<C> = MessageBus<InMemoryMessageStore, C>;

/// Negotiation protocol type held by a context.
pub type ContextNegotiations<C> =
    NegotiationProtocol<InMemoryMessageStore, InMemoryNegotiationRepository, C>;

/// Blackboard type held by a context.
pub type ContextBlackboard<C> = SharedBlackboard<InMemoryBlackboardStore, C>;

/// Errors raised by context-wide operations.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    /// The bus failed.
    #[error(transparent)]
    Bus(#[from] BusError),
    /// The negotiation protocol failed.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
    /// The blackboard failed.
    #[error(transparent)]
    Blackboard(#[from] BlackboardError),
}

/// How much [`CoordinationContext::clear_task`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskClearReport {
    /// Messages deleted from the bus.
    pub messages: usize,
    /// Negotiation sessions deleted.
    pub negotiations: usize,
    /// Blackboard entries deleted.
    pub entries: usize,
}

/// The coordination services for one build.
///
/// # Examples
///
/// ```
/// use concord::config::CoordinationConfig;
/// use concord::context::CoordinationContext;
///
/// let context = CoordinationContext::in_memory(CoordinationConfig::default());
/// assert_eq!(context.bus().subscriber_count(), 0);
/// ```
pub struct CoordinationContext<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    config: CoordinationConfig,
    bus: Arc<ContextBus<C>>,
    negotiations: ContextNegotiations<C>,
    blackboard: ContextBlackboard<C>,
}

impl CoordinationContext<DefaultClock> {
    /// Creates a context on the system clock.
    #[must_use]
    pub fn in_memory(config: CoordinationConfig) -> Self {
        Self::new(config, Arc::new(DefaultClock))
    }
}

impl<C> CoordinationContext<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a context whose services share `clock` and `config`.
    #[must_use]
    pub fn new(config: CoordinationConfig, clock: Arc<C>) -> Self {
        let bus = Arc::new(MessageBus::new(
            Arc::new(InMemoryMessageStore::new()),
            Arc::clone(&clock),
            config.clone(),
        ));
        let negotiations = NegotiationProtocol::new(
            Arc::clone(&bus),
            Arc::new(InMemoryNegotiationRepository::new()),
            Arc::clone(&clock),
        );
        let blackboard = SharedBlackboard::new(
            Arc::new(InMemoryBlackboardStore::new()),
            clock,
            config.clone(),
        );
        Self {
            config,
            bus,
            negotiations,
            blackboard,
        }
    }

    /// Returns the shared configuration.
    #[must_use]
    pub const fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    /// Returns the message bus.
    #[must_use]
    pub const fn bus(&self) -> &Arc<ContextBus<C>> {
        &self.bus
    }

    /// Returns the negotiation protocol.
    #[must_use]
    pub const fn negotiations(&self) -> &ContextNegotiations<C> {
        &self.negotiations
    }

    /// Returns the blackboard.
    #[must_use]
    pub const fn blackboard(&self) -> &ContextBlackboard<C> {
        &self.blackboard
    }

    /// Assembles the context section of a prompt for `agent`: its
    /// communication block followed by the task's blackboard block, each
    /// omitted when empty.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when either store fails.
    pub fn prompt_context(
        &self,
        agent: &AgentName,
        task_id: &TaskId,
        max_tokens: usize,
    ) -> Result<String, ContextError> {
        let bus: &ContextBus<C> = &self.bus;
        let communication = build_communication_context(bus, agent)?;
        let shared = self.blackboard.format_for_prompt(task_id, max_tokens)?;
        Ok([communication, shared]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Deletes a task's messages, negotiations and blackboard entries.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when any store fails.
    pub fn clear_task(&self, task_id: &TaskId) -> Result<TaskClearReport, ContextError> {
        Ok(TaskClearReport {
            messages: self.bus.clear_task(task_id)?,
            negotiations: self.negotiations.clear_task(task_id)?,
            entries: self.blackboard.clear(task_id)?,
        })
    }

    /// Drops every message, subscription, session and entry.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when any store fails.
    pub fn reset(&self) -> Result<(), ContextError> {
        self.bus.reset()?;
        self.negotiations.reset()?;
        self.blackboard.reset()?;
        info!("coordination context reset");
        Ok(())
    }
}
