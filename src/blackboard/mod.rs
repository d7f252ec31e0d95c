//! Confidence-ranked knowledge shared between agents working on a task.
//!
//! Entries are appended, never edited. Reads return the latest entry per
//! key, supersession keeps replaced entries as an audit trail, and the
//! prompt formatter renders a task's entries within a token budget.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The blackboard service and formatter in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
