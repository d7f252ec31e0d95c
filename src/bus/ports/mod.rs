//! Port trait definitions for the message bus.
//!
//! The bus depends on a [`MessageStore`] for recording and querying
//! messages, and delivers to subscribers through [`MessageHandler`].

pub mod handler;
pub mod store;

pub use handler::{FnHandler, HandlerError, HandlerResult, MessageHandler, handler_fn};
pub use store::{MessageStore, MessageStoreResult};
