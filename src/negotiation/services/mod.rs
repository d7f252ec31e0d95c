//! Negotiation orchestration over the message bus.

mod protocol;

pub use protocol::{NegotiationError, NegotiationProtocol, NegotiationResult};
