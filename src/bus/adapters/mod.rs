//! Storage adapters for the message bus.
//!
//! - [`memory::InMemoryMessageStore`]: thread-safe, process-local log with
//!   id, recipient, task and reply indexes

pub mod memory;
