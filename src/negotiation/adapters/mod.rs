//! Adapter implementations for negotiation ports.

pub mod memory;
