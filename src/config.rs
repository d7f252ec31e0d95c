//! Runtime configuration for the coordination substrate.
//!
//! A single [`CoordinationConfig`] is shared by the bus, the negotiation
//! protocol and the blackboard of one [`CoordinationContext`].
//!
//! [`CoordinationContext`]: crate::context::CoordinationContext

use crate::agent::{AgentDomainError, AgentName};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Agent that receives escalated negotiations unless configured otherwise.
pub const DEFAULT_ARBITRATOR: &str = "JUPITER";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured agent name is invalid.
    #[error(transparent)]
    Agent(#[from] AgentDomainError),
}

/// Configuration for message delivery, negotiation and prompt budgeting.
///
/// # Examples
///
/// ```
/// use concord::config::CoordinationConfig;
///
/// let config = CoordinationConfig::default();
/// assert_eq!(config.default_token_budget, 2000);
/// assert_eq!(config.arbitrator.as_str(), "JUPITER");
///
/// let strict = CoordinationConfig::strict();
/// assert!(strict.handler_timeout() < config.handler_timeout());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Upper bound on a single subscriber handler, in milliseconds.
    pub handler_timeout_ms: u64,
    /// Agent that receives escalated negotiations.
    pub arbitrator: AgentName,
    /// Confidence below which negotiation is worth its cost.
    pub negotiation_confidence_threshold: f64,
    /// Token budget used when callers do not supply one.
    pub default_token_budget: usize,
    /// Characters per token in the budget heuristic.
    pub chars_per_token: usize,
    /// Maximum messages rendered into communication context; `None` renders
    /// every relevant message.
    pub max_context_messages: Option<usize>,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            handler_timeout_ms: 30_000,
            arbitrator: default_arbitrator(),
            negotiation_confidence_threshold: 0.65,
            default_token_budget: 2000,
            chars_per_token: 4,
            max_context_messages: None,
        }
    }
}

fn default_arbitrator() -> AgentName {
    AgentName::from_literal(DEFAULT_ARBITRATOR)
}

impl CoordinationConfig {
    /// Creates a configuration with tight bounds for resource-constrained
    /// builds and tests.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            handler_timeout_ms: 2_000,
            default_token_budget: 1000,
            max_context_messages: Some(20),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or invalid field
    /// values, including invalid agent names.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the per-handler timeout.
    #[must_use]
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the escalation arbitrator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Agent`] when the name is invalid.
    pub fn with_arbitrator(mut self, arbitrator: impl Into<String>) -> Result<Self, ConfigError> {
        self.arbitrator = AgentName::new(arbitrator)?;
        Ok(self)
    }

    /// Sets the maximum number of messages rendered into prompt context.
    #[must_use]
    pub const fn with_max_context_messages(mut self, limit: usize) -> Self {
        self.max_context_messages = Some(limit);
        self
    }

    /// Returns the per-handler timeout.
    #[must_use]
    pub const fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms)
    }

    /// Converts a token budget into a character budget.
    #[must_use]
    pub const fn char_budget(&self, max_tokens: usize) -> usize {
        max_tokens.saturating_mul(self.chars_per_token)
    }
}
