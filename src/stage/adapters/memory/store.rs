//! In-memory current-stage projection and ledger behind a single lock.
//!
//! Holding both tables under one `RwLock` makes every transition atomic.
//! Changes are stamped under the write lock, so both the ledger sequence and
//! its timestamps follow commit order.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::stage::{
    domain::{
        CommittedTransition, HistoryEntry, Initialization, NewHistoryEntry, StageChange,
        StageRecord, sort_newest_first,
    },
    ports::{
        CommitClock, HistoryRepository, StageRepository, StageRepositoryError,
        StageRepositoryResult,
    },
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory stage store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStageStore {
    state: Arc<RwLock<InMemoryStageState>>,
}

#[derive(Debug, Default)]
struct InMemoryStageState {
    current: HashMap<TaskId, StageRecord>,
    history: Vec<HistoryEntry>,
    next_sequence: u64,
}

impl InMemoryStageState {
    fn append(&mut self, entry: &NewHistoryEntry) -> HistoryEntry {
        self.next_sequence += 1;
        let committed = entry.clone().commit(self.next_sequence);
        self.history.push(committed.clone());
        committed
    }
}

impl InMemoryStageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StageRepositoryResult<RwLockReadGuard<'_, InMemoryStageState>> {
        self.state.read().map_err(|err| {
            StageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> StageRepositoryResult<RwLockWriteGuard<'_, InMemoryStageState>> {
        self.state.write().map_err(|err| {
            StageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl StageRepository for InMemoryStageStore {
    async fn initialize(
        &self,
        task_id: TaskId,
        clock: CommitClock,
    ) -> StageRepositoryResult<Initialization> {
        let mut state = self.write()?;
        if let Some(existing) = state.current.get(&task_id) {
            return Ok(Initialization::AlreadyInitialized(existing.clone()));
        }
        let record = StageChange::initial(task_id).stamp(None, clock());
        state.current.insert(task_id, record.clone());
        let entry = state.append(&record.history_entry());
        Ok(Initialization::Created { record, entry })
    }

    async fn apply_transition(
        &self,
        change: &StageChange,
        clock: CommitClock,
    ) -> StageRepositoryResult<CommittedTransition> {
        let mut state = self.write()?;
        let record = change
            .clone()
            .stamp(state.current.get(&change.task_id()), clock());
        state.current.insert(record.task_id(), record.clone());
        let entry = state.append(&record.history_entry());
        Ok(CommittedTransition::new(record, entry))
    }

    async fn find_current(&self, task_id: TaskId) -> StageRepositoryResult<Option<StageRecord>> {
        let state = self.read()?;
        Ok(state.current.get(&task_id).cloned())
    }

    async fn find_current_many(
        &self,
        task_ids: &[TaskId],
    ) -> StageRepositoryResult<HashMap<TaskId, StageRecord>> {
        let state = self.read()?;
        Ok(task_ids
            .iter()
            .filter_map(|id| state.current.get(id).map(|record| (*id, record.clone())))
            .collect())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStageStore {
    async fn append(&self, entry: &NewHistoryEntry) -> StageRepositoryResult<HistoryEntry> {
        let mut state = self.write()?;
        Ok(state.append(entry))
    }

    async fn list(&self, task_ids: Option<&[TaskId]>) -> StageRepositoryResult<Vec<HistoryEntry>> {
        let state = self.read()?;
        let mut entries: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|entry| task_ids.is_none_or(|ids| ids.contains(&entry.task_id())))
            .cloned()
            .collect();
        sort_newest_first(&mut entries);
        Ok(entries)
    }
}
