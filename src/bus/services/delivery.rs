//! Fan-out delivery and its per-handler outcomes.

use super::SubscriptionId;
use crate::agent::AgentName;
use crate::bus::{domain::AgentMessage, ports::MessageHandler};
use futures::FutureExt;
use futures::future::join_all;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

/// How a single subscriber handled a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The handler completed successfully.
    Delivered,
    /// The handler returned an error.
    Failed(String),
    /// The handler did not finish within the configured timeout.
    TimedOut,
    /// The handler panicked.
    Panicked(String),
    /// The subscription was cancelled before the handler was called.
    Skipped,
}

impl DeliveryStatus {
    /// Returns `true` when the handler ran to successful completion.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Returns `true` for failures, timeouts and panics.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::TimedOut | Self::Panicked(_))
    }
}

/// Outcome of one subscriber for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Subscription that was targeted.
    pub subscription_id: SubscriptionId,
    /// Agent the subscription was registered under.
    pub agent: AgentName,
    /// What happened.
    pub status: DeliveryStatus,
}

/// A recorded message together with the outcome of every targeted handler.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The recorded message.
    pub message: AgentMessage,
    /// One entry per targeted subscription, in subscription order.
    pub outcomes: Vec<HandlerOutcome>,
}

impl Delivery {
    /// Number of handlers that completed successfully.
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_delivered())
            .count()
    }

    /// Outcomes that failed, timed out or panicked.
    pub fn failures(&self) -> impl Iterator<Item = &HandlerOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_failure())
    }
}

/// A registered handler as captured for one fan-out.
#[derive(Clone)]
pub(super) struct Subscriber {
    pub(super) id: SubscriptionId,
    pub(super) agent: AgentName,
    pub(super) handler: Arc<dyn MessageHandler>,
    pub(super) active: Arc<AtomicBool>,
}

impl Subscriber {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Invokes every subscriber concurrently and waits for all of them.
///
/// Failures never escape: each is logged and reported in its outcome.
pub(super) async fn fan_out(
    message: &AgentMessage,
    subscribers: Vec<Subscriber>,
    timeout: Duration,
) -> Vec<HandlerOutcome> {
    let calls = subscribers.into_iter().map(|subscriber| async move {
        let status = invoke(&subscriber, message, timeout).await;
        if status.is_failure() {
            warn!(
                agent = %subscriber.agent,
                subscription_id = %subscriber.id,
                message_id = %message.id(),
                from = %message.from(),
                status = ?status,
                "subscriber handler failed"
            );
        }
        HandlerOutcome {
            subscription_id: subscriber.id,
            agent: subscriber.agent,
            status,
        }
    });
    join_all(calls).await
}

async fn invoke(
    subscriber: &Subscriber,
    message: &AgentMessage,
    timeout: Duration,
) -> DeliveryStatus {
    if !subscriber.is_active() {
        return DeliveryStatus::Skipped;
    }

    let call = AssertUnwindSafe(subscriber.handler.handle(message)).catch_unwind();
    match tokio::time::timeout(timeout, call).await {
        Err(_) => DeliveryStatus::TimedOut,
        Ok(Err(payload)) => DeliveryStatus::Panicked(panic_reason(payload.as_ref())),
        Ok(Ok(Err(err))) => DeliveryStatus::Failed(err.to_string()),
        Ok(Ok(Ok(()))) => DeliveryStatus::Delivered,
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|reason| (*reason).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_owned())
}
