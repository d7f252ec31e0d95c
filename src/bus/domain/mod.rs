//! Domain types for the message bus.
//!
//! Messages are immutable once recorded, apart from read tracking. All types
//! are serialisable via serde.

mod draft;
mod error;
mod ids;
mod kind;
mod message;
mod priority;
mod stats;

pub use draft::MessageDraft;
pub use error::{MessageDraftError, ParseMessageTypeError, ParsePriorityError};
pub use ids::MessageId;
pub use kind::MessageType;
pub use message::AgentMessage;
pub use priority::Priority;
pub use stats::BusStats;
