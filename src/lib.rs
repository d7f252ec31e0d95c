//! Concord: in-process coordination for multi-agent builds.
//!
//! Specialised agents working on one build exchange findings, settle
//! disagreements and share ranked knowledge through three services:
//!
//! - [`bus`]: addressed and broadcast pub/sub with reply threads, inbox and
//!   unread queries, and isolated concurrent delivery to handlers
//! - [`negotiation`]: a consensus state machine announced over the bus
//! - [`blackboard`]: a task-scoped, confidence-ranked store with
//!   append-only supersession and a token-budgeted prompt formatter
//!
//! # Architecture
//!
//! Each service follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and transitions with no infrastructure
//! - **Ports**: Trait interfaces for storage and message handlers
//! - **Adapters**: In-memory implementations of the ports
//! - **Services**: Orchestration over the ports
//!
//! A [`context::CoordinationContext`] wires one instance of each service for
//! a build; [`config::CoordinationConfig`] carries the shared settings.
//! State is volatile and lives only as long as its context.

pub mod agent;
pub mod blackboard;
pub mod bus;
pub mod config;
pub mod context;
pub mod negotiation;

#[cfg(test)]
mod test_support;
