//! Records of assignee activity on a task.

use super::TaskId;
use crate::member::domain::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One "marked completed" action by an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    task_id: TaskId,
    member_id: MemberId,
    completed_at: DateTime<Utc>,
}

impl TaskCompletion {
    /// Creates a completion record.
    #[must_use]
    pub const fn new(task_id: TaskId, member_id: MemberId, completed_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            member_id,
            completed_at,
        }
    }

    /// Returns the completed task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the member who completed the task.
    #[must_use]
    pub const fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Returns when the task was marked completed.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

/// One access of a task's private resource link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAccess {
    task_id: TaskId,
    member_id: MemberId,
    accessed_at: DateTime<Utc>,
}

impl ResourceAccess {
    /// Creates an access record.
    #[must_use]
    pub const fn new(task_id: TaskId, member_id: MemberId, accessed_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            member_id,
            accessed_at,
        }
    }

    /// Returns the task whose resource was opened.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the member who opened the resource.
    #[must_use]
    pub const fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Returns when the resource was opened.
    #[must_use]
    pub const fn accessed_at(&self) -> DateTime<Utc> {
        self.accessed_at
    }
}
