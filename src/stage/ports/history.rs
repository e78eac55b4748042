//! Repository port for the append-only transition ledger.

use super::StageRepositoryResult;
use crate::stage::domain::{HistoryEntry, NewHistoryEntry};
use crate::task::domain::TaskId;
use async_trait::async_trait;

/// Ledger persistence contract. Entries are never updated or deleted.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends an entry and returns it with its insertion sequence.
    async fn append(&self, entry: &NewHistoryEntry) -> StageRepositoryResult<HistoryEntry>;

    /// Lists entries, optionally restricted to the given tasks, newest first
    /// (timestamp descending, later insertion first on ties).
    async fn list(&self, task_ids: Option<&[TaskId]>) -> StageRepositoryResult<Vec<HistoryEntry>>;
}
