//! Domain types for negotiation sessions.

mod error;
mod ids;
mod resolver;
mod session;
mod status;

pub use error::{NegotiationDomainError, ParseNegotiationStatusError};
pub use ids::NegotiationId;
pub use resolver::Resolver;
pub use session::{NegotiationSession, OpenNegotiationParams};
pub use status::NegotiationStatus;

/// Confidence below which an agent should consult a more qualified peer.
pub const NEGOTIATION_CONFIDENCE_THRESHOLD: f64 = 0.65;

/// Returns `true` when negotiation is worth its coordination cost: the
/// acting agent is uncertain and a peer with relevant expertise exists.
///
/// Uses [`NEGOTIATION_CONFIDENCE_THRESHOLD`]; see
/// [`NegotiationProtocol::should_trigger_negotiation`] for the configured
/// threshold.
///
/// # Examples
///
/// ```
/// use concord::negotiation::domain::should_trigger_negotiation;
///
/// assert!(should_trigger_negotiation(0.4, true));
/// assert!(!should_trigger_negotiation(0.4, false));
/// assert!(!should_trigger_negotiation(0.65, true));
/// ```
///
/// [`NegotiationProtocol::should_trigger_negotiation`]:
///     crate::negotiation::services::NegotiationProtocol::should_trigger_negotiation
#[must_use]
pub fn should_trigger_negotiation(confidence: f64, peer_has_expertise: bool) -> bool {
    confidence < NEGOTIATION_CONFIDENCE_THRESHOLD && peer_has_expertise
}
