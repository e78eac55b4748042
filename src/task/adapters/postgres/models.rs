//! Diesel row models for task persistence.

use super::schema::{resource_accesses, task_completions, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Human-readable label.
    pub title: String,
    /// Optional public resource link.
    pub resource_link: Option<String>,
    /// Optional assignee-only resource link.
    pub private_resource_link: Option<String>,
    /// Assigned member identifier.
    pub assigned_to: String,
    /// Class tag.
    pub class_tag: String,
    /// Lifecycle status.
    pub lifecycle_status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for completion records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_completions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompletionRow {
    /// Completed task.
    pub task_id: uuid::Uuid,
    /// Member who completed the task.
    pub member_id: String,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

/// Insert model for completion records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_completions)]
pub struct NewCompletionRow {
    /// Completed task.
    pub task_id: uuid::Uuid,
    /// Member who completed the task.
    pub member_id: String,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

/// Insert model for private-resource access records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = resource_accesses)]
pub struct NewResourceAccessRow {
    /// Task whose resource was opened.
    pub task_id: uuid::Uuid,
    /// Member who opened the resource.
    pub member_id: String,
    /// Access timestamp.
    pub accessed_at: DateTime<Utc>,
}
