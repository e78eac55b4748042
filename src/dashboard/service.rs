//! Read-only dashboard service.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::query::{AuditQuery, AuditRow, BoardQuery, BoardRow, shape_audit, shape_board};
use crate::error::ErrorKind;
use crate::member::{
    domain::MemberId,
    ports::{MemberDirectory, MemberDirectoryError},
};
use crate::stage::ports::{HistoryRepository, StageRepository, StageRepositoryError};
use crate::task::{
    domain::{Task, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};

/// Errors raised while building dashboard views.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Stage or ledger lookup failed.
    #[error(transparent)]
    Stages(#[from] StageRepositoryError),
    /// Member lookup failed.
    #[error(transparent)]
    Members(#[from] MemberDirectoryError),
}

impl DashboardError {
    /// Returns the caller-facing error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Tasks(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Tasks(_) | Self::Stages(_) | Self::Members(_) => ErrorKind::Store,
        }
    }
}

/// Dashboard query service.
#[derive(Clone)]
pub struct DashboardService<T, S, H, M>
where
    T: TaskRepository,
    S: StageRepository,
    H: HistoryRepository,
    M: MemberDirectory,
{
    tasks: Arc<T>,
    stages: Arc<S>,
    history: Arc<H>,
    members: Arc<M>,
}

impl<T, S, H, M> DashboardService<T, S, H, M>
where
    T: TaskRepository,
    S: StageRepository,
    H: HistoryRepository,
    M: MemberDirectory,
{
    /// Creates a dashboard service over the given stores.
    #[must_use]
    pub const fn new(tasks: Arc<T>, stages: Arc<S>, history: Arc<H>, members: Arc<M>) -> Self {
        Self {
            tasks,
            stages,
            history,
            members,
        }
    }

    /// Returns board rows matching `query`.
    ///
    /// Tasks without a stage record appear with an unknown stage.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when any underlying lookup fails.
    pub async fn board(&self, query: &BoardQuery) -> Result<Vec<BoardRow>, DashboardError> {
        let tasks = self.matching_tasks(query).await?;
        let ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
        let records = self.stages.find_current_many(&ids).await?;
        let rows = shape_board(tasks, records, query);
        debug!(rows = rows.len(), "board view built");
        Ok(rows)
    }

    /// Returns annotated ledger rows matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when any underlying lookup fails.
    pub async fn audit_log(&self, query: &AuditQuery) -> Result<Vec<AuditRow>, DashboardError> {
        let entries = self.history.list(query.task_ids()).await?;
        let titles: HashMap<TaskId, TaskTitle> = self
            .tasks
            .list_all(None)
            .await?
            .into_iter()
            .map(|task| (task.id(), task.title().clone()))
            .collect();
        let names: HashMap<MemberId, String> = self
            .members
            .list_members()
            .await?
            .into_iter()
            .map(|member| (member.id().clone(), member.name().to_owned()))
            .collect();
        let rows = shape_audit(entries, &titles, &names, query);
        debug!(rows = rows.len(), "audit view built");
        Ok(rows)
    }

    async fn matching_tasks(&self, query: &BoardQuery) -> Result<Vec<Task>, DashboardError> {
        let Some(assignee) = query.assignee() else {
            return Ok(self.tasks.list_all(query.class_tag()).await?);
        };
        let mut tasks = self.tasks.list_by_assignee(assignee).await?;
        if let Some(class_tag) = query.class_tag() {
            tasks.retain(|task| task.class_tag() == class_tag);
        }
        Ok(tasks)
    }
}
