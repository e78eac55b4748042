//! Service exposing the transition ledger for audit and reporting.

use crate::error::ErrorKind;
use crate::member::domain::MemberId;
use crate::stage::{
    domain::{HistoryEntry, NewHistoryEntry, Stage, latest_per_task},
    ports::{HistoryRepository, StageRepositoryError},
};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for ledger operations.
#[derive(Debug, Error)]
pub enum HistoryLedgerError {
    /// Ledger store operation failed.
    #[error(transparent)]
    Repository(#[from] StageRepositoryError),
}

impl HistoryLedgerError {
    /// Returns the caller-facing error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Repository(_) => ErrorKind::Store,
        }
    }
}

/// Append-only ledger service.
///
/// The ledger is never the source of truth for the current stage; it
/// records what happened.
#[derive(Clone)]
pub struct HistoryLedgerService<H>
where
    H: HistoryRepository,
{
    history: Arc<H>,
}

impl<H> HistoryLedgerService<H>
where
    H: HistoryRepository,
{
    /// Creates a new ledger service.
    #[must_use]
    pub const fn new(history: Arc<H>) -> Self {
        Self { history }
    }

    /// Appends an entry without any business-rule checks.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryLedgerError::Repository`] when the store fails.
    pub async fn append(
        &self,
        task_id: TaskId,
        stage: Stage,
        actor: Option<MemberId>,
        recorded_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, HistoryLedgerError> {
        let entry = NewHistoryEntry::new(task_id, stage, actor, recorded_at);
        Ok(self.history.append(&entry).await?)
    }

    /// Lists entries newest first, optionally restricted to some tasks.
    ///
    /// An empty result is a successful outcome.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryLedgerError::Repository`] when the store fails.
    pub async fn list_history(
        &self,
        task_ids: Option<&[TaskId]>,
    ) -> Result<Vec<HistoryEntry>, HistoryLedgerError> {
        Ok(self.history.list(task_ids).await?)
    }

    /// Rebuilds each task's latest stage from the ledger alone.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryLedgerError::Repository`] when the store fails.
    pub async fn latest_stages(
        &self,
        task_ids: Option<&[TaskId]>,
    ) -> Result<HashMap<TaskId, HistoryEntry>, HistoryLedgerError> {
        let entries = self.history.list(task_ids).await?;
        Ok(latest_per_task(entries))
    }
}
