//! Blackboard application services.

mod blackboard;
mod format;

pub use blackboard::{BlackboardError, BlackboardResult, SharedBlackboard};
pub use format::{PROMPT_HEADER, TRUNCATION_MARKER};
