//! Service layer for task assignment, listing and assignee actions.

use crate::error::ErrorKind;
use crate::member::{
    domain::MemberId,
    ports::{MemberDirectory, MemberDirectoryError},
};
use crate::stage::{
    domain::{Stage, StageRecord},
    ports::StageRepository,
    services::{StageTrackerError, StageTrackerService},
};
use crate::task::{
    domain::{
        ClassTag, NewTask, ResourceLink, Task, TaskCompletion, TaskDomainError, TaskId, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    assigned_to: String,
    class_tag: String,
    resource_link: Option<String>,
    private_resource_link: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        assigned_to: impl Into<String>,
        class_tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            assigned_to: assigned_to.into(),
            class_tag: class_tag.into(),
            resource_link: None,
            private_resource_link: None,
        }
    }

    /// Sets the public resource link. Blank links are ignored.
    #[must_use]
    pub fn with_resource_link(mut self, link: impl Into<String>) -> Self {
        self.resource_link = Some(link.into());
        self
    }

    /// Sets the assignee-only resource link. Blank links are ignored.
    #[must_use]
    pub fn with_private_resource_link(mut self, link: impl Into<String>) -> Self {
        self.private_resource_link = Some(link.into());
        self
    }
}

/// Service-level errors for task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The assignee identifier is blank.
    #[error("assignee is required")]
    MissingAssignee,

    /// The assignee does not resolve to a known member.
    #[error("unknown assignee: {0}")]
    UnknownAssignee(MemberId),

    /// The acting member may not perform the operation on this task.
    #[error("member {actor} is not allowed to act on task {task_id}")]
    Unauthorized {
        /// Task the member tried to act on.
        task_id: TaskId,
        /// Member that attempted the action.
        actor: MemberId,
    },

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task has no private resource link.
    #[error("task {0} has no private resource")]
    NoPrivateResource(TaskId),

    /// The task was stored but its stage record could not be initialised.
    ///
    /// The task exists without a stage; re-running stage initialisation
    /// repairs it.
    #[error("task {} was created but its stage could not be initialised: {source}", .task.id())]
    StageInitialization {
        /// The task as stored.
        task: Box<Task>,
        /// Why initialisation failed.
        source: StageTrackerError,
    },

    /// The task was marked completed but the `recorded` transition failed.
    #[error("task {} was marked completed but its stage could not be updated: {source}", .task.id())]
    StageTransition {
        /// The task as stored.
        task: Box<Task>,
        /// Why the transition failed.
        source: StageTrackerError,
    },

    /// Member directory lookup failed.
    #[error(transparent)]
    Directory(#[from] MemberDirectoryError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskStoreError {
    /// Returns the caller-facing error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(TaskDomainError::NotAssignee { .. }) | Self::Unauthorized { .. } => {
                ErrorKind::Authorization
            }
            Self::Validation(_) | Self::MissingAssignee | Self::UnknownAssignee(_) => {
                ErrorKind::Validation
            }
            Self::TaskNotFound(_)
            | Self::NoPrivateResource(_)
            | Self::Repository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::StageInitialization { .. } | Self::StageTransition { .. } => {
                ErrorKind::PartialFailure
            }
            Self::Directory(_) | Self::Repository(_) => ErrorKind::Store,
        }
    }

    /// Returns the stored task when the operation partially succeeded.
    #[must_use]
    pub fn partial_task(&self) -> Option<&Task> {
        match self {
            Self::StageInitialization { task, .. } | Self::StageTransition { task, .. } => {
                Some(task.as_ref())
            }
            _ => None,
        }
    }
}

/// Result type for task store service operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task store orchestration service.
#[derive(Clone)]
pub struct TaskStoreService<T, M, S, C>
where
    T: TaskRepository,
    M: MemberDirectory,
    S: StageRepository,
    C: Clock + Send + Sync + 'static,
{
    tasks: Arc<T>,
    members: Arc<M>,
    stages: StageTrackerService<T, S, C>,
    clock: Arc<C>,
}

impl<T, M, S, C> TaskStoreService<T, M, S, C>
where
    T: TaskRepository,
    M: MemberDirectory,
    S: StageRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task store service.
    #[must_use]
    pub fn new(tasks: Arc<T>, members: Arc<M>, stages: Arc<S>, clock: Arc<C>) -> Self {
        let tracker = StageTrackerService::new(Arc::clone(&tasks), stages, Arc::clone(&clock));
        Self {
            tasks,
            members,
            stages: tracker,
            clock,
        }
    }

    /// Assigns a new task and puts it at the `assigned` stage.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a required field is blank or the
    /// assignee is unknown, [`TaskStoreError::Repository`] when the task
    /// cannot be stored, and [`TaskStoreError::StageInitialization`] when
    /// the task was stored but its stage record was not.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskStoreResult<Task> {
        let CreateTaskRequest {
            title,
            assigned_to,
            class_tag,
            resource_link,
            private_resource_link,
        } = request;

        let fields = NewTask {
            title: TaskTitle::new(title)?,
            resource_link: ResourceLink::optional(resource_link),
            private_resource_link: ResourceLink::optional(private_resource_link),
            assigned_to: MemberId::new(assigned_to).map_err(|_| TaskStoreError::MissingAssignee)?,
            class_tag: ClassTag::new(class_tag)?,
        };
        if self.members.find_by_id(&fields.assigned_to).await?.is_none() {
            return Err(TaskStoreError::UnknownAssignee(fields.assigned_to));
        }

        let task = Task::new(fields, &*self.clock);
        self.tasks.store(&task).await?;
        info!(
            task_id = %task.id(),
            assigned_to = %task.assigned_to(),
            class = %task.class_tag(),
            "task assigned"
        );

        if let Err(source) = self.stages.initialize(task.id()).await {
            warn!(task_id = %task.id(), error = %source, "stage initialisation failed");
            return Err(TaskStoreError::StageInitialization {
                task: Box::new(task),
                source,
            });
        }
        Ok(task)
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::TaskNotFound`] for unknown tasks and
    /// [`TaskStoreError::Repository`] when the lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskStoreResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskStoreError::TaskNotFound(task_id))
    }

    /// Lists the tasks assigned to a member, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] when the listing fails.
    pub async fn list_for_assignee(&self, member: &MemberId) -> TaskStoreResult<Vec<Task>> {
        Ok(self.tasks.list_by_assignee(member).await?)
    }

    /// Lists all tasks, optionally restricted to one class, newest first.
    ///
    /// A blank class filter is treated as no filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] when the listing fails.
    pub async fn list_all(&self, class_tag: Option<&str>) -> TaskStoreResult<Vec<Task>> {
        let filter = class_tag.and_then(|tag| ClassTag::new(tag).ok());
        Ok(self.tasks.list_all(filter.as_ref()).await?)
    }

    /// Marks a task completed on behalf of its assignee and moves it to the
    /// `recorded` stage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] when `actor` is not the
    /// assignee (nothing is written), [`TaskStoreError::TaskNotFound`] for
    /// unknown tasks, and [`TaskStoreError::StageTransition`] when the task
    /// was marked completed but the stage update failed.
    pub async fn mark_completed(
        &self,
        task_id: TaskId,
        actor: &MemberId,
    ) -> TaskStoreResult<(Task, StageRecord)> {
        let mut task = self.get_task(task_id).await?;
        let completion = task
            .mark_completed(actor, &*self.clock)
            .map_err(|_| TaskStoreError::Unauthorized {
                task_id,
                actor: actor.clone(),
            })?;
        self.tasks.record_completion(&task, &completion).await?;
        info!(%task_id, member = %actor, "task marked completed");

        match self
            .stages
            .transition_to(task_id, Stage::Recorded, actor.clone())
            .await
        {
            Ok(record) => Ok((task, record)),
            Err(source) => {
                warn!(%task_id, error = %source, "recorded transition failed");
                Err(TaskStoreError::StageTransition {
                    task: Box::new(task),
                    source,
                })
            }
        }
    }

    /// Returns every completion recorded for a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::TaskNotFound`] for unknown tasks and
    /// [`TaskStoreError::Repository`] when the lookup fails.
    pub async fn list_completions(&self, task_id: TaskId) -> TaskStoreResult<Vec<TaskCompletion>> {
        self.get_task(task_id).await?;
        Ok(self.tasks.list_completions(task_id).await?)
    }

    /// Returns the private resource link of a task to its assignee and logs
    /// the access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] when `actor` is not the
    /// assignee, [`TaskStoreError::NoPrivateResource`] when the task has no
    /// private link, and [`TaskStoreError::Repository`] when the access
    /// cannot be logged (the link is then withheld).
    pub async fn open_private_resource(
        &self,
        task_id: TaskId,
        actor: &MemberId,
    ) -> TaskStoreResult<ResourceLink> {
        let task = self.get_task(task_id).await?;
        let (link, access) = task
            .access_private_resource(actor, &*self.clock)
            .map_err(|_| TaskStoreError::Unauthorized {
                task_id,
                actor: actor.clone(),
            })?
            .ok_or(TaskStoreError::NoPrivateResource(task_id))?;
        self.tasks.record_resource_access(&access).await?;
        info!(%task_id, member = %actor, "private resource opened");
        Ok(link)
    }

    /// Returns the stage tracker sharing this service's stores.
    #[must_use]
    pub const fn stage_tracker(&self) -> &StageTrackerService<T, S, C> {
        &self.stages
    }
}
