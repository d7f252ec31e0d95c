//! In-memory negotiation repository.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::agent::TaskId;
use crate::negotiation::{
    domain::{NegotiationId, NegotiationSession},
    ports::{NegotiationRepository, NegotiationRepositoryError, NegotiationRepositoryResult},
};

/// Thread-safe in-memory negotiation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNegotiationRepository {
    state: Arc<RwLock<SessionTable>>,
}

#[derive(Debug, Default)]
struct SessionTable {
    sessions: HashMap<NegotiationId, NegotiationSession>,
    task_index: HashMap<TaskId, Vec<NegotiationId>>,
}

impl InMemoryNegotiationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> NegotiationRepositoryResult<RwLockReadGuard<'_, SessionTable>> {
        self.state.read().map_err(|err| {
            NegotiationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> NegotiationRepositoryResult<RwLockWriteGuard<'_, SessionTable>> {
        self.state.write().map_err(|err| {
            NegotiationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl NegotiationRepository for InMemoryNegotiationRepository {
    fn insert(&self, session: NegotiationSession) -> NegotiationRepositoryResult<()> {
        let mut table = self.write()?;
        let id = session.id();
        if table.sessions.contains_key(&id) {
            return Err(NegotiationRepositoryError::DuplicateSession(id));
        }
        table
            .task_index
            .entry(session.task_id().clone())
            .or_default()
            .push(id);
        table.sessions.insert(id, session);
        Ok(())
    }

    fn find_by_id(
        &self,
        id: NegotiationId,
    ) -> NegotiationRepositoryResult<Option<NegotiationSession>> {
        Ok(self.read()?.sessions.get(&id).cloned())
    }

    fn find_by_task(
        &self,
        task_id: &TaskId,
    ) -> NegotiationRepositoryResult<Vec<NegotiationSession>> {
        let table = self.read()?;
        Ok(table
            .task_index
            .get(task_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| table.sessions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn update<F, T>(&self, id: NegotiationId, apply: F) -> NegotiationRepositoryResult<Option<T>>
    where
        F: FnOnce(&mut NegotiationSession) -> T,
    {
        let mut table = self.write()?;
        Ok(table.sessions.get_mut(&id).map(apply))
    }

    fn clear_task(&self, task_id: &TaskId) -> NegotiationRepositoryResult<usize> {
        let mut table = self.write()?;
        let ids = table.task_index.remove(task_id).unwrap_or_default();
        for id in &ids {
            table.sessions.remove(id);
        }
        Ok(ids.len())
    }

    fn clear(&self) -> NegotiationRepositoryResult<()> {
        *self.write()? = SessionTable::default();
        Ok(())
    }
}
