//! Repository port for the current-stage projection.

use crate::stage::domain::{CommittedTransition, Initialization, StageChange, StageRecord};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for stage and history repository operations.
pub type StageRepositoryResult<T> = Result<T, StageRepositoryError>;

/// Source of commit timestamps.
///
/// Stores call it once they hold the task's write lock, never before.
pub type CommitClock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Current-stage persistence contract.
///
/// Every write also appends the matching ledger entry; implementations must
/// apply both effects or neither.
#[async_trait]
pub trait StageRepository: Send + Sync {
    /// Stores the `assigned` record and its ledger entry unless the task
    /// already has a record.
    ///
    /// An existing record is returned untouched as
    /// [`Initialization::AlreadyInitialized`] and no entry is appended.
    async fn initialize(
        &self,
        task_id: TaskId,
        clock: CommitClock,
    ) -> StageRepositoryResult<Initialization>;

    /// Replaces (or inserts) the task's record and appends the matching
    /// ledger entry.
    ///
    /// The change is stamped with [`StageChange::stamp`] after the task's
    /// write lock is taken. Concurrent transitions of one task are
    /// last-write-wins on the record; every call still appends its own
    /// entry, and the ledger's recency order equals commit order.
    async fn apply_transition(
        &self,
        change: &StageChange,
        clock: CommitClock,
    ) -> StageRepositoryResult<CommittedTransition>;

    /// Finds the record of one task.
    ///
    /// Returns `None` when the task has no record.
    async fn find_current(&self, task_id: TaskId) -> StageRepositoryResult<Option<StageRecord>>;

    /// Finds the records of several tasks; tasks without a record are
    /// absent from the map.
    async fn find_current_many(
        &self,
        task_ids: &[TaskId],
    ) -> StageRepositoryResult<HashMap<TaskId, StageRecord>>;
}

/// Errors returned by stage and history repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StageRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
