//! Shared world state for negotiation BDD scenarios.

use concord::{
    config::CoordinationConfig,
    context::CoordinationContext,
    negotiation::{
        domain::{NegotiationId, NegotiationSession},
        services::NegotiationError,
    },
};
use rstest::fixture;

/// Scenario world for negotiation behaviour tests.
pub struct NegotiationWorld {
    pub context: CoordinationContext,
    pub session_id: Option<NegotiationId>,
    pub last_result: Option<Result<NegotiationSession, NegotiationError>>,
}

impl NegotiationWorld {
    /// Creates a world with no negotiation in progress.
    #[must_use]
    pub fn new() -> Self {
        Self {
            context: CoordinationContext::in_memory(CoordinationConfig::default()),
            session_id: None,
            last_result: None,
        }
    }

    /// Returns the session under test.
    ///
    /// # Errors
    ///
    /// Fails when no negotiation was opened or the session cannot be loaded.
    pub fn session(&self) -> Result<NegotiationSession, eyre::Report> {
        let id = self
            .session_id
            .ok_or_else(|| eyre::eyre!("no negotiation opened in scenario world"))?;
        self.context
            .negotiations()
            .session(id)
            .map_err(|err| eyre::eyre!("load session {id}: {err}"))
    }

    /// Returns the id of the session under test.
    ///
    /// # Errors
    ///
    /// Fails when no negotiation was opened.
    pub fn session_id(&self) -> Result<NegotiationId, eyre::Report> {
        self.session_id
            .ok_or_else(|| eyre::eyre!("no negotiation opened in scenario world"))
    }
}

impl Default for NegotiationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> NegotiationWorld {
    NegotiationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
