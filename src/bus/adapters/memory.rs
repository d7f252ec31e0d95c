//! In-memory implementation of the `MessageStore` port.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::agent::{AgentName, TaskId};
use crate::bus::{
    domain::{AgentMessage, MessageId},
    error::MessageStoreError,
    ports::store::{MessageStore, MessageStoreResult},
};

/// In-memory implementation of [`MessageStore`].
///
/// Thread-safe via internal [`RwLock`]. Contents are lost when the process
/// exits.
///
/// # Example
///
/// ```
/// use concord::bus::adapters::memory::InMemoryMessageStore;
///
/// let store = InMemoryMessageStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageStore {
    state: Arc<RwLock<MessageLog>>,
}

#[derive(Debug, Default)]
struct MessageLog {
    messages: HashMap<MessageId, AgentMessage>,
    order: Vec<MessageId>,
    recipient_index: HashMap<AgentName, Vec<MessageId>>,
    broadcast_index: Vec<MessageId>,
    task_index: HashMap<TaskId, Vec<MessageId>>,
    reply_index: HashMap<MessageId, Vec<MessageId>>,
}

impl MessageLog {
    fn collect(&self, ids: &[MessageId]) -> Vec<AgentMessage> {
        ids.iter()
            .filter_map(|id| self.messages.get(id).cloned())
            .collect()
    }
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored messages.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|guard| guard.messages.len())
            .unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes every id in `doomed` from an id list.
fn prune(ids: &mut Vec<MessageId>, doomed: &[MessageId]) {
    ids.retain(|id| !doomed.contains(id));
}

impl MessageStore for InMemoryMessageStore {
    fn append(&self, message: AgentMessage) -> MessageStoreResult<()> {
        let mut log = self
            .state
            .write()
            .map_err(|e| MessageStoreError::poisoned(&e))?;

        let id = message.id();
        if log.messages.contains_key(&id) {
            return Err(MessageStoreError::DuplicateMessage(id));
        }

        match message.to().agent() {
            Some(agent) => {
                log.recipient_index
                    .entry(agent.clone())
                    .or_default()
                    .push(id);
            }
            None => log.broadcast_index.push(id),
        }
        log.task_index
            .entry(message.task_id().clone())
            .or_default()
            .push(id);
        if let Some(parent) = message.reply_to_id() {
            log.reply_index.entry(parent).or_default().push(id);
        }
        log.order.push(id);
        log.messages.insert(id, message);
        Ok(())
    }

    fn find_by_id(&self, id: MessageId) -> MessageStoreResult<Option<AgentMessage>> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log.messages.get(&id).cloned())
    }

    fn exists(&self, id: MessageId) -> MessageStoreResult<bool> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log.messages.contains_key(&id))
    }

    fn find_for_agent(
        &self,
        agent: &AgentName,
        task_id: Option<&TaskId>,
    ) -> MessageStoreResult<Vec<AgentMessage>> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        let mut found = log
            .recipient_index
            .get(agent)
            .map(|ids| log.collect(ids))
            .unwrap_or_default();
        found.extend(log.collect(&log.broadcast_index));
        found.retain(|message| task_id.is_none_or(|task| message.task_id() == task));
        found.sort_by_key(AgentMessage::sent_at);
        Ok(found)
    }

    fn find_broadcasts(&self) -> MessageStoreResult<Vec<AgentMessage>> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log.collect(&log.broadcast_index))
    }

    fn find_replies(&self, parent: MessageId) -> MessageStoreResult<Vec<AgentMessage>> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log
            .reply_index
            .get(&parent)
            .map(|ids| log.collect(ids))
            .unwrap_or_default())
    }

    fn find_by_task(&self, task_id: &TaskId) -> MessageStoreResult<Vec<AgentMessage>> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log
            .task_index
            .get(task_id)
            .map(|ids| log.collect(ids))
            .unwrap_or_default())
    }

    fn all(&self) -> MessageStoreResult<Vec<AgentMessage>> {
        let log = self
            .state
            .read()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log.collect(&log.order))
    }

    fn mark_read(
        &self,
        id: MessageId,
        reader: &AgentName,
        at: DateTime<Utc>,
    ) -> MessageStoreResult<bool> {
        let mut log = self
            .state
            .write()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        Ok(log.messages.get_mut(&id).is_some_and(|message| {
            message.mark_read(reader.clone(), at);
            true
        }))
    }

    fn clear_task(&self, task_id: &TaskId) -> MessageStoreResult<usize> {
        let mut log = self
            .state
            .write()
            .map_err(|e| MessageStoreError::poisoned(&e))?;

        let Some(doomed) = log.task_index.remove(task_id) else {
            return Ok(0);
        };

        for id in &doomed {
            log.messages.remove(id);
            log.reply_index.remove(id);
        }
        prune(&mut log.order, &doomed);
        prune(&mut log.broadcast_index, &doomed);
        log.recipient_index.retain(|_, ids| {
            prune(ids, &doomed);
            !ids.is_empty()
        });
        log.reply_index.retain(|_, ids| {
            prune(ids, &doomed);
            !ids.is_empty()
        });
        Ok(doomed.len())
    }

    fn clear(&self) -> MessageStoreResult<()> {
        let mut log = self
            .state
            .write()
            .map_err(|e| MessageStoreError::poisoned(&e))?;
        *log = MessageLog::default();
        Ok(())
    }
}
