//! In-memory blackboard store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::agent::TaskId;
use crate::blackboard::{
    domain::{BlackboardEntry, EntryId},
    ports::{BlackboardStore, BlackboardStoreError, BlackboardStoreResult},
};

/// Thread-safe in-memory blackboard store.
///
/// Keeps the full append log plus, per task, a `key -> latest id` index so
/// reads and snapshots never scan the log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlackboardStore {
    state: Arc<RwLock<EntryLog>>,
}

#[derive(Debug, Default)]
struct EntryLog {
    entries: HashMap<EntryId, BlackboardEntry>,
    shelves: HashMap<TaskId, Shelf>,
}

/// One task's entries.
#[derive(Debug, Default)]
struct Shelf {
    order: Vec<EntryId>,
    by_key: HashMap<String, Vec<EntryId>>,
    latest: BTreeMap<String, EntryId>,
}

impl EntryLog {
    fn collect<'a>(&self, ids: impl IntoIterator<Item = &'a EntryId>) -> Vec<BlackboardEntry> {
        ids.into_iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect()
    }

    /// Whether `candidate` should replace the current latest entry.
    fn supersedes_latest(&self, current: Option<&EntryId>, candidate: &BlackboardEntry) -> bool {
        current
            .and_then(|id| self.entries.get(id))
            .is_none_or(|latest| candidate.written_at() >= latest.written_at())
    }
}

impl InMemoryBlackboardStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|log| log.entries.len()).unwrap_or(0)
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> BlackboardStoreResult<RwLockReadGuard<'_, EntryLog>> {
        self.state.read().map_err(|err| {
            BlackboardStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BlackboardStoreResult<RwLockWriteGuard<'_, EntryLog>> {
        self.state.write().map_err(|err| {
            BlackboardStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl BlackboardStore for InMemoryBlackboardStore {
    fn append(&self, entry: BlackboardEntry) -> BlackboardStoreResult<()> {
        let mut log = self.write()?;
        let id = entry.id();
        if log.entries.contains_key(&id) {
            return Err(BlackboardStoreError::DuplicateEntry(id));
        }

        let key = entry.key().to_owned();
        let replaces_latest = log.supersedes_latest(
            log.shelves
                .get(entry.task_id())
                .and_then(|shelf| shelf.latest.get(&key)),
            &entry,
        );
        let shelf = log.shelves.entry(entry.task_id().clone()).or_default();
        shelf.order.push(id);
        shelf.by_key.entry(key.clone()).or_default().push(id);
        if replaces_latest {
            shelf.latest.insert(key, id);
        }
        log.entries.insert(id, entry);
        Ok(())
    }

    fn find_by_id(&self, id: EntryId) -> BlackboardStoreResult<Option<BlackboardEntry>> {
        Ok(self.read()?.entries.get(&id).cloned())
    }

    fn latest(
        &self,
        task_id: &TaskId,
        key: &str,
    ) -> BlackboardStoreResult<Option<BlackboardEntry>> {
        let log = self.read()?;
        Ok(log
            .shelves
            .get(task_id)
            .and_then(|shelf| shelf.latest.get(key))
            .and_then(|id| log.entries.get(id))
            .cloned())
    }

    fn latest_per_key(&self, task_id: &TaskId) -> BlackboardStoreResult<Vec<BlackboardEntry>> {
        let log = self.read()?;
        Ok(log
            .shelves
            .get(task_id)
            .map(|shelf| log.collect(shelf.latest.values()))
            .unwrap_or_default())
    }

    fn find_by_task(&self, task_id: &TaskId) -> BlackboardStoreResult<Vec<BlackboardEntry>> {
        let log = self.read()?;
        Ok(log
            .shelves
            .get(task_id)
            .map(|shelf| log.collect(&shelf.order))
            .unwrap_or_default())
    }

    fn history(&self, task_id: &TaskId, key: &str) -> BlackboardStoreResult<Vec<BlackboardEntry>> {
        let log = self.read()?;
        Ok(log
            .shelves
            .get(task_id)
            .and_then(|shelf| shelf.by_key.get(key))
            .map(|ids| log.collect(ids))
            .unwrap_or_default())
    }

    fn clear_task(&self, task_id: &TaskId) -> BlackboardStoreResult<usize> {
        let mut log = self.write()?;
        let Some(shelf) = log.shelves.remove(task_id) else {
            return Ok(0);
        };
        for id in &shelf.order {
            log.entries.remove(id);
        }
        Ok(shelf.order.len())
    }

    fn clear(&self) -> BlackboardStoreResult<()> {
        *self.write()? = EntryLog::default();
        Ok(())
    }
}
