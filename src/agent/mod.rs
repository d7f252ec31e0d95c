//! Shared identity types for coordinating agents.
//!
//! Every subsystem in the crate addresses participants by [`AgentName`] and
//! scopes its state by [`TaskId`]. Messages are addressed to a
//! [`Recipient`], which is either a single agent or the broadcast sentinel.

mod error;
mod name;
mod recipient;
mod task_id;

pub use error::AgentDomainError;
pub use name::AgentName;
pub use recipient::Recipient;
pub use task_id::TaskId;
