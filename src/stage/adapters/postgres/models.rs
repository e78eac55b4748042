//! Diesel row models for stage tracking and the history ledger.

use super::schema::{stage_history, stage_tracking};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row of the current-stage table; used for reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = stage_tracking)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StageTrackingRow {
    /// Tracked task.
    pub task_id: uuid::Uuid,
    /// Current stage literal.
    pub current_stage: String,
    /// Time of the latest transition.
    pub updated_at: DateTime<Utc>,
    /// Actor of the latest transition.
    pub updated_by: Option<String>,
}

/// Query result row for ledger entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stage_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Insertion sequence.
    pub id: i64,
    /// Task that moved.
    pub task_id: uuid::Uuid,
    /// Stage entered.
    pub stage: String,
    /// Transition timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Acting member.
    pub recorded_by: Option<String>,
}

/// Insert model for ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stage_history)]
pub struct NewHistoryRow {
    /// Task that moved.
    pub task_id: uuid::Uuid,
    /// Stage entered.
    pub stage: String,
    /// Transition timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Acting member.
    pub recorded_by: Option<String>,
}
