//! Repository port for task persistence and assignee activity.

use crate::member::domain::MemberId;
use crate::task::domain::{ClassTag, ResourceAccess, Task, TaskCompletion, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks assigned to `member`, newest-created first.
    async fn list_by_assignee(&self, member: &MemberId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns all tasks, optionally restricted to one class, newest-created
    /// first.
    async fn list_all(&self, class_tag: Option<&ClassTag>) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists a completed task together with its completion record.
    ///
    /// The lifecycle status update and the completion row are written in a
    /// single store operation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn record_completion(
        &self,
        task: &Task,
        completion: &TaskCompletion,
    ) -> TaskRepositoryResult<()>;

    /// Returns the completion records of a task, oldest first.
    async fn list_completions(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskCompletion>>;

    /// Appends a private-resource access record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn record_resource_access(&self, access: &ResourceAccess) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
