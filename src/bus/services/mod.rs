//! Application services for the message bus.
//!
//! [`MessageBus`] owns subscriptions and fan-out delivery over a
//! [`MessageStore`](crate::bus::ports::MessageStore);
//! [`build_communication_context`] renders an agent's relevant traffic for
//! prompt injection.

mod bus;
mod conveniences;
mod delivery;
mod prompt;

pub use bus::{MessageBus, Subscription, SubscriptionId};
pub use delivery::{Delivery, DeliveryStatus, HandlerOutcome};
pub use prompt::build_communication_context;
