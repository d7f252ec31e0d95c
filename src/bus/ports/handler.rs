//! Subscriber handler port.

use crate::bus::domain::AgentMessage;
use async_trait::async_trait;
use std::future::Future;

/// Opaque failure reported by a subscriber.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by subscriber handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Receives messages delivered by the bus.
///
/// Handlers run concurrently with each other. A handler that fails, panics
/// or exceeds the configured timeout is logged and isolated; the sender and
/// the other subscribers are unaffected.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handles one delivered message.
    ///
    /// # Errors
    ///
    /// Any error is recorded as a failed delivery.
    async fn handle(&self, message: &AgentMessage) -> HandlerResult;
}

/// Adapts an async closure into a [`MessageHandler`].
pub struct FnHandler<F>(F);

/// Wraps `f` as a handler. The closure receives an owned copy of each
/// delivered message.
///
/// # Examples
///
/// ```
/// use concord::bus::ports::{handler_fn, HandlerResult};
///
/// let handler = handler_fn(|message| async move {
///     let _ = message.subject().len();
///     HandlerResult::Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(AgentMessage) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(AgentMessage) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn handle(&self, message: &AgentMessage) -> HandlerResult {
        (self.0)(message.clone()).await
    }
}
