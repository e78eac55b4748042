//! Domain model for the task store.
//!
//! A task is the unit of work an administrator assigns to a member. Its
//! lifecycle status only records whether the assignee has done their part;
//! where the artefact sits in the production pipeline is owned by the
//! [`stage`](crate::stage) context.

mod activity;
mod error;
mod ids;
mod task;

pub use activity::{ResourceAccess, TaskCompletion};
pub use error::{ParseLifecycleStatusError, TaskDomainError};
pub use ids::{ClassTag, ResourceLink, TaskId, TaskTitle};
pub use task::{LifecycleStatus, NewTask, PersistedTaskData, Task};
