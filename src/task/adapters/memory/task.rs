//! In-memory repository for task store tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::member::domain::MemberId;
use crate::task::{
    domain::{ClassTag, ResourceAccess, Task, TaskCompletion, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    insertion_order: Vec<TaskId>,
    completions: Vec<TaskCompletion>,
    resource_accesses: Vec<ResourceAccess>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded private-resource access, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn resource_accesses(&self) -> TaskRepositoryResult<Vec<ResourceAccess>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.resource_accesses.clone())
    }
}

/// Collects matching tasks newest-created first; equal timestamps keep the
/// later insertion first.
fn newest_first(state: &InMemoryTaskState, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut tasks: Vec<Task> = state
        .insertion_order
        .iter()
        .rev()
        .filter_map(|id| state.tasks.get(id))
        .filter(|task| predicate(task))
        .cloned()
        .collect();
    tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state.insertion_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_by_assignee(&self, member: &MemberId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(newest_first(&state, |task| task.is_assigned_to(member)))
    }

    async fn list_all(&self, class_tag: Option<&ClassTag>) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(newest_first(&state, |task| {
            class_tag.is_none_or(|tag| task.class_tag() == tag)
        }))
    }

    async fn record_completion(
        &self,
        task: &Task,
        completion: &TaskCompletion,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        state.completions.push(completion.clone());
        Ok(())
    }

    async fn list_completions(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskCompletion>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .completions
            .iter()
            .filter(|completion| completion.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn record_resource_access(&self, access: &ResourceAccess) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&access.task_id()) {
            return Err(TaskRepositoryError::NotFound(access.task_id()));
        }
        state.resource_accesses.push(access.clone());
        Ok(())
    }
}
