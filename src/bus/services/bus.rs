//! Pub/sub dispatch over a message store.

use super::delivery::{Delivery, Subscriber, fan_out};
use crate::agent::{AgentName, Recipient, TaskId};
use crate::bus::{
    domain::{AgentMessage, BusStats, MessageDraft, MessageDraftError, MessageId, Priority},
    error::BusResult,
    ports::{MessageHandler, MessageStore},
};
use crate::config::CoordinationConfig;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::cmp::Reverse;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use tracing::debug;

/// Identifies one registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw sequence number.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Default)]
struct SubscriberRegistry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl SubscriberRegistry {
    fn targeted_by(&self, recipient: &Recipient) -> Vec<Subscriber> {
        self.subscribers
            .iter()
            .filter(|subscriber| recipient.reaches(&subscriber.agent))
            .cloned()
            .collect()
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }
}

type SharedRegistry = Arc<RwLock<SubscriberRegistry>>;

/// Handle returned by [`MessageBus::subscribe`].
///
/// Dropping the handle leaves the handler registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    agent: AgentName,
    active: Arc<AtomicBool>,
    registry: Weak<RwLock<SubscriberRegistry>>,
}

impl Subscription {
    /// Returns the subscription identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the agent the handler was registered for.
    #[must_use]
    pub const fn agent(&self) -> &AgentName {
        &self.agent
    }

    /// Returns `true` until the subscription is cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Removes exactly this handler. Deliveries already in flight that have
    /// not yet reached it are skipped.
    ///
    /// Returns `false` when the subscription was already cancelled.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::AcqRel) {
            return false;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id);
        }
        debug!(agent = %self.agent, subscription_id = %self.id, "unsubscribed");
        true
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// In-process message bus.
///
/// `send` records the message and then invokes every matching handler
/// concurrently, resolving once all of them have settled. Handler failures
/// are logged and reported through [`MessageBus::send_with_report`]; they
/// never fail the send.
pub struct MessageBus<S, C>
where
    S: MessageStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: CoordinationConfig,
    registry: SharedRegistry,
    last_sent: Mutex<Option<DateTime<Utc>>>,
}

impl<S, C> MessageBus<S, C>
where
    S: MessageStore,
    C: Clock + Send + Sync,
{
    /// Creates a bus over `store`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: CoordinationConfig) -> Self {
        Self {
            store,
            clock,
            config,
            registry: Arc::default(),
            last_sent: Mutex::new(None),
        }
    }

    /// Returns the configuration the bus was built with.
    #[must_use]
    pub const fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    /// Registers `handler` for messages addressed to `agent` and for
    /// broadcasts. Several handlers may be registered for one agent.
    pub fn subscribe(&self, agent: AgentName, handler: Arc<dyn MessageHandler>) -> Subscription {
        let active = Arc::new(AtomicBool::new(true));
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.subscribers.push(Subscriber {
            id,
            agent: agent.clone(),
            handler,
            active: Arc::clone(&active),
        });
        drop(registry);

        debug!(agent = %agent, subscription_id = %id, "subscribed");
        Subscription {
            id,
            agent,
            active,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Number of registered handlers across all agents.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .len()
    }

    /// Records and delivers a message, returning it once every matching
    /// handler has settled.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Validation`](crate::bus::error::BusError::Validation)
    /// for a malformed draft or an unknown reply target, before any
    /// delivery; [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// recording fails.
    pub async fn send(&self, draft: MessageDraft) -> BusResult<AgentMessage> {
        Ok(self.send_with_report(draft).await?.message)
    }

    /// Like [`MessageBus::send`], also returning each handler's outcome.
    ///
    /// # Errors
    ///
    /// See [`MessageBus::send`].
    pub async fn send_with_report(&self, draft: MessageDraft) -> BusResult<Delivery> {
        draft.validate()?;
        if let Some(parent) = draft.reply_to()
            && !self.store.exists(parent)?
        {
            return Err(MessageDraftError::UnknownReplyTarget(parent).into());
        }

        let message = self.record(draft)?;
        let subscribers = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .targeted_by(message.to());
        debug!(
            message_id = %message.id(),
            kind = %message.kind(),
            from = %message.from(),
            to = %message.to(),
            task_id = %message.task_id(),
            handlers = subscribers.len(),
            "message sent"
        );

        let outcomes = fan_out(&message, subscribers, self.config.handler_timeout()).await;
        Ok(Delivery { message, outcomes })
    }

    /// Stamps and appends under one lock so store order follows `sent_at`.
    fn record(&self, draft: MessageDraft) -> BusResult<AgentMessage> {
        let mut last_sent = self
            .last_sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.utc();
        let sent_at = match *last_sent {
            Some(previous) if now <= previous => previous
                .checked_add_signed(TimeDelta::microseconds(1))
                .unwrap_or(previous),
            _ => now,
        };

        let message = AgentMessage::from_draft(draft, sent_at)?;
        self.store.append(message.clone())?;
        *last_sent = Some(sent_at);
        Ok(message)
    }

    /// Retrieves a message by id.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_message(&self, id: MessageId) -> BusResult<Option<AgentMessage>> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Returns the root message followed by its direct replies in send
    /// order, or an empty list when `root_id` is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_thread(&self, root_id: MessageId) -> BusResult<Vec<AgentMessage>> {
        let Some(root) = self.store.find_by_id(root_id)? else {
            return Ok(Vec::new());
        };
        let mut replies = self.store.find_replies(root_id)?;
        replies.sort_by_key(AgentMessage::sent_at);

        let mut thread = Vec::with_capacity(replies.len() + 1);
        thread.push(root);
        thread.extend(replies);
        Ok(thread)
    }

    /// Lists messages reaching `agent`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_inbox(
        &self,
        agent: &AgentName,
        task_id: Option<&TaskId>,
    ) -> BusResult<Vec<AgentMessage>> {
        let mut inbox = self.store.find_for_agent(agent, task_id)?;
        inbox.sort_by_key(|message| Reverse(message.sent_at()));
        Ok(inbox)
    }

    /// Lists inbox messages nobody has read yet, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_unread(
        &self,
        agent: &AgentName,
        task_id: Option<&TaskId>,
    ) -> BusResult<Vec<AgentMessage>> {
        let mut inbox = self.get_inbox(agent, task_id)?;
        inbox.retain(|message| message.read_at().is_none());
        Ok(inbox)
    }

    /// Marks a message as read by `reader`.
    ///
    /// The message-level read time is set by the first reader only; every
    /// reader is recorded in [`AgentMessage::read_by`]. Returns `false` for
    /// an unknown id.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn mark_read(&self, id: MessageId, reader: &AgentName) -> BusResult<bool> {
        Ok(self.store.mark_read(id, reader, self.clock.utc())?)
    }

    /// Messages reaching `agent` at or above `min_priority`, highest
    /// priority first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_for(
        &self,
        agent: &AgentName,
        min_priority: Option<Priority>,
    ) -> BusResult<Vec<AgentMessage>> {
        Ok(by_priority(self.store.find_for_agent(agent, None)?, min_priority))
    }

    /// Broadcast messages at or above `min_priority`, ranked like
    /// [`MessageBus::get_for`].
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_broadcasts(&self, min_priority: Option<Priority>) -> BusResult<Vec<AgentMessage>> {
        Ok(by_priority(self.store.find_broadcasts()?, min_priority))
    }

    /// Every message at or above `min_priority`, ranked like
    /// [`MessageBus::get_for`].
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_all(&self, min_priority: Option<Priority>) -> BusResult<Vec<AgentMessage>> {
        Ok(by_priority(self.store.all()?, min_priority))
    }

    /// Aggregate counts over every recorded message.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn get_stats(&self) -> BusResult<BusStats> {
        Ok(self.store.all()?.iter().collect())
    }

    /// Deletes every message for `task_id`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn clear_task(&self, task_id: &TaskId) -> BusResult<usize> {
        let removed = self.store.clear_task(task_id)?;
        debug!(task_id = %task_id, removed, "cleared task messages");
        Ok(removed)
    }

    /// Deletes every message and cancels every subscription.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Store`](crate::bus::error::BusError::Store) when
    /// the store fails.
    pub fn reset(&self) -> BusResult<()> {
        self.store.clear()?;
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for subscriber in registry.subscribers.drain(..) {
            subscriber.active.store(false, Ordering::Release);
        }
        drop(registry);
        *self
            .last_sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

fn by_priority(
    mut messages: Vec<AgentMessage>,
    min_priority: Option<Priority>,
) -> Vec<AgentMessage> {
    if let Some(min) = min_priority {
        messages.retain(|message| message.priority() >= min);
    }
    messages.sort_by_key(|message| (Reverse(message.priority()), Reverse(message.sent_at())));
    messages
}
