//! Addressed and broadcast pub/sub between agents.
//!
//! Agents subscribe handlers by name, send drafts to one agent or to every
//! subscriber, and query their inbox, unread messages and reply threads.
//! Delivery fans out to all matching handlers concurrently and joins on
//! them; a failing, panicking or slow handler is isolated from the sender
//! and from its peers. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Dispatch and prompt rendering in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
