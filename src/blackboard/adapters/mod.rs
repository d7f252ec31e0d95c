//! Adapter implementations for blackboard ports.

pub mod memory;
