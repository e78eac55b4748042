//! Task aggregate root and lifecycle status.

use super::{
    ClassTag, ParseLifecycleStatusError, ResourceAccess, ResourceLink, TaskCompletion,
    TaskDomainError, TaskId, TaskTitle,
};
use crate::member::domain::MemberId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Whether the assignee has performed their part of the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// The assignee has not yet reported the task as done.
    Pending,
    /// The assignee has reported the task as done.
    Completed,
}

impl LifecycleStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for LifecycleStatus {
    type Error = ParseLifecycleStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseLifecycleStatusError(value.to_owned())),
        }
    }
}

/// Validated fields for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task label.
    pub title: TaskTitle,
    /// Public resource link, if any.
    pub resource_link: Option<ResourceLink>,
    /// Resource link restricted to the assignee, if any.
    pub private_resource_link: Option<ResourceLink>,
    /// Member the task is assigned to.
    pub assigned_to: MemberId,
    /// Class the task belongs to.
    pub class_tag: ClassTag,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    resource_link: Option<ResourceLink>,
    private_resource_link: Option<ResourceLink>,
    assigned_to: MemberId,
    class_tag: ClassTag,
    lifecycle_status: LifecycleStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted public resource link.
    pub resource_link: Option<ResourceLink>,
    /// Persisted private resource link.
    pub private_resource_link: Option<ResourceLink>,
    /// Persisted assignee.
    pub assigned_to: MemberId,
    /// Persisted class tag.
    pub class_tag: ClassTag,
    /// Persisted lifecycle status.
    pub lifecycle_status: LifecycleStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task with a fresh identifier.
    #[must_use]
    pub fn new(fields: NewTask, clock: &impl Clock) -> Self {
        let NewTask {
            title,
            resource_link,
            private_resource_link,
            assigned_to,
            class_tag,
        } = fields;

        Self {
            id: TaskId::new(),
            title,
            resource_link,
            private_resource_link,
            assigned_to,
            class_tag,
            lifecycle_status: LifecycleStatus::Pending,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            resource_link: data.resource_link,
            private_resource_link: data.private_resource_link,
            assigned_to: data.assigned_to,
            class_tag: data.class_tag,
            lifecycle_status: data.lifecycle_status,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the public resource link, if any.
    #[must_use]
    pub const fn resource_link(&self) -> Option<&ResourceLink> {
        self.resource_link.as_ref()
    }

    /// Returns the private resource link, if any.
    #[must_use]
    pub const fn private_resource_link(&self) -> Option<&ResourceLink> {
        self.private_resource_link.as_ref()
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> &MemberId {
        &self.assigned_to
    }

    /// Returns the class tag.
    #[must_use]
    pub const fn class_tag(&self) -> &ClassTag {
        &self.class_tag
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn lifecycle_status(&self) -> LifecycleStatus {
        self.lifecycle_status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `member` is the assignee.
    #[must_use]
    pub fn is_assigned_to(&self, member: &MemberId) -> bool {
        &self.assigned_to == member
    }

    /// Marks the task completed on behalf of its assignee.
    ///
    /// Completing an already-completed task is accepted and produces another
    /// completion record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when `actor` is not the
    /// assignee; the task is left unchanged.
    pub fn mark_completed(
        &mut self,
        actor: &MemberId,
        clock: &impl Clock,
    ) -> Result<TaskCompletion, TaskDomainError> {
        self.ensure_assignee(actor)?;
        self.lifecycle_status = LifecycleStatus::Completed;
        Ok(TaskCompletion::new(self.id, actor.clone(), clock.utc()))
    }

    /// Grants the assignee access to the private resource link.
    ///
    /// Returns `Ok(None)` when the task has no private link.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] when `actor` is not the
    /// assignee.
    pub fn access_private_resource(
        &self,
        actor: &MemberId,
        clock: &impl Clock,
    ) -> Result<Option<(ResourceLink, ResourceAccess)>, TaskDomainError> {
        self.ensure_assignee(actor)?;
        Ok(self.private_resource_link.clone().map(|link| {
            let access = ResourceAccess::new(self.id, actor.clone(), clock.utc());
            (link, access)
        }))
    }

    fn ensure_assignee(&self, actor: &MemberId) -> Result<(), TaskDomainError> {
        if self.is_assigned_to(actor) {
            return Ok(());
        }
        Err(TaskDomainError::NotAssignee {
            task_id: self.id,
            actor: actor.clone(),
        })
    }
}
