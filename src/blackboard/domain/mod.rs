//! Domain types for the shared blackboard.

mod confidence;
mod entry;
mod error;
mod ids;
mod options;

pub use confidence::{Confidence, ConfidenceTier};
pub use entry::{BlackboardEntry, EntryParams};
pub use error::BlackboardDomainError;
pub use ids::EntryId;
pub use options::WriteOptions;
