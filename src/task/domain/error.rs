//! Error types for task domain validation and parsing.

use super::TaskId;
use crate::member::domain::MemberId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The class tag is empty after trimming.
    #[error("task class must not be empty")]
    EmptyClassTag,

    /// A resource link is empty after trimming.
    #[error("resource link must not be empty")]
    EmptyResourceLink,

    /// The acting member is not the task assignee.
    #[error("member {actor} is not the assignee of task {task_id}")]
    NotAssignee {
        /// Task the member tried to act on.
        task_id: TaskId,
        /// Member that attempted the action.
        actor: MemberId,
    },
}

/// Error returned while parsing lifecycle statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown lifecycle status: {0}")]
pub struct ParseLifecycleStatusError(pub String);
