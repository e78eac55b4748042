//! Service owning the current stage of every task.

use crate::error::ErrorKind;
use crate::member::domain::MemberId;
use crate::stage::{
    domain::{ParseStageError, Stage, StageChange, StageRecord},
    ports::{CommitClock, StageRepository, StageRepositoryError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for moving a task to a stage chosen by a caller.
///
/// The stage is kept as raw text so vocabulary validation happens inside the
/// service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionStageRequest {
    task_id: TaskId,
    stage: String,
    actor: MemberId,
}

impl TransitionStageRequest {
    /// Creates a transition request.
    #[must_use]
    pub fn new(task_id: TaskId, stage: impl Into<String>, actor: MemberId) -> Self {
        Self {
            task_id,
            stage: stage.into(),
            actor,
        }
    }
}

/// Service-level errors for stage tracking.
#[derive(Debug, Error)]
pub enum StageTrackerError {
    /// The requested stage is outside the vocabulary.
    #[error(transparent)]
    InvalidStage(#[from] ParseStageError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Task lookup failed.
    #[error(transparent)]
    TaskLookup(#[from] TaskRepositoryError),
    /// Stage store operation failed.
    #[error(transparent)]
    Repository(#[from] StageRepositoryError),
}

impl StageTrackerError {
    /// Returns the caller-facing error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStage(_) => ErrorKind::InvalidStage,
            Self::TaskNotFound(_) | Self::TaskLookup(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::TaskLookup(_) | Self::Repository(_) => ErrorKind::Store,
        }
    }
}

/// Result type for stage tracker operations.
pub type StageTrackerResult<T> = Result<T, StageTrackerError>;

/// Stage tracking orchestration service.
#[derive(Clone)]
pub struct StageTrackerService<T, S, C>
where
    T: TaskRepository,
    S: StageRepository,
    C: Clock + Send + Sync + 'static,
{
    tasks: Arc<T>,
    stages: Arc<S>,
    clock: Arc<C>,
}

impl<T, S, C> StageTrackerService<T, S, C>
where
    T: TaskRepository,
    S: StageRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new stage tracker.
    #[must_use]
    pub const fn new(tasks: Arc<T>, stages: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            stages,
            clock,
        }
    }

    /// Puts a task at `assigned` with a system-initiated ledger entry.
    ///
    /// Safe to call again: a task that already has a record keeps it and no
    /// ledger entry is appended, which makes this the repair path for tasks
    /// whose initialisation failed.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::TaskNotFound`] for unknown tasks and
    /// [`StageTrackerError::Repository`] when the store fails.
    pub async fn initialize(&self, task_id: TaskId) -> StageTrackerResult<StageRecord> {
        self.ensure_task_exists(task_id).await?;
        let outcome = self.stages.initialize(task_id, self.commit_clock()).await?;
        debug!(%task_id, ?outcome, "stage record initialised");
        Ok(outcome.into_record())
    }

    /// Moves a task to the requested stage.
    ///
    /// Any stage of the vocabulary is accepted regardless of the current
    /// one. The record update and the ledger entry are written together.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::InvalidStage`] when the stage is outside
    /// the vocabulary (nothing is written),
    /// [`StageTrackerError::TaskNotFound`] for unknown tasks, and
    /// [`StageTrackerError::Repository`] when the store fails.
    pub async fn transition(
        &self,
        request: TransitionStageRequest,
    ) -> StageTrackerResult<StageRecord> {
        let TransitionStageRequest {
            task_id,
            stage,
            actor,
        } = request;
        let target = Stage::try_from(stage.as_str())?;
        self.transition_to(task_id, target, actor).await
    }

    /// Moves a task to an already-validated stage.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::TaskNotFound`] for unknown tasks and
    /// [`StageTrackerError::Repository`] when the store fails.
    pub async fn transition_to(
        &self,
        task_id: TaskId,
        stage: Stage,
        actor: MemberId,
    ) -> StageTrackerResult<StageRecord> {
        self.ensure_task_exists(task_id).await?;
        let change = StageChange::transition(task_id, stage, actor);
        let committed = self
            .stages
            .apply_transition(&change, self.commit_clock())
            .await?;
        debug!(
            %task_id,
            stage = %stage,
            sequence = committed.entry().sequence(),
            "stage transition applied"
        );
        Ok(committed.into_record())
    }

    /// Returns the current record of a task, or `None` when it has none.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::Repository`] when the lookup fails.
    pub async fn current_stage(&self, task_id: TaskId) -> StageTrackerResult<Option<StageRecord>> {
        Ok(self.stages.find_current(task_id).await?)
    }

    /// Returns the current records of several tasks in one lookup.
    ///
    /// Tasks without a record are simply absent from the map.
    ///
    /// # Errors
    ///
    /// Returns [`StageTrackerError::Repository`] when the lookup fails.
    pub async fn current_stages(
        &self,
        task_ids: &[TaskId],
    ) -> StageTrackerResult<HashMap<TaskId, StageRecord>> {
        Ok(self.stages.find_current_many(task_ids).await?)
    }

    fn commit_clock(&self) -> CommitClock {
        let clock = Arc::clone(&self.clock);
        Arc::new(move || clock.utc())
    }

    async fn ensure_task_exists(&self, task_id: TaskId) -> StageTrackerResult<()> {
        if self.tasks.find_by_id(task_id).await?.is_none() {
            return Err(StageTrackerError::TaskNotFound(task_id));
        }
        Ok(())
    }
}
