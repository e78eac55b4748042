//! Current-stage projection, one record per task.

use super::{HistoryEntry, NewHistoryEntry, Stage};
use crate::member::domain::MemberId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The current pipeline stage of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    task_id: TaskId,
    current_stage: Stage,
    updated_at: DateTime<Utc>,
    updated_by: Option<MemberId>,
}

impl StageRecord {
    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        task_id: TaskId,
        current_stage: Stage,
        updated_at: DateTime<Utc>,
        updated_by: Option<MemberId>,
    ) -> Self {
        Self {
            task_id,
            current_stage,
            updated_at,
            updated_by,
        }
    }

    /// Returns the ledger entry describing the change to this record.
    #[must_use]
    pub fn history_entry(&self) -> NewHistoryEntry {
        NewHistoryEntry::new(
            self.task_id,
            self.current_stage,
            self.updated_by.clone(),
            self.updated_at,
        )
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn current_stage(&self) -> Stage {
        self.current_stage
    }

    /// Returns the time of the latest transition.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns who performed the latest transition; `None` when the system
    /// initialised the record.
    #[must_use]
    pub const fn updated_by(&self) -> Option<&MemberId> {
        self.updated_by.as_ref()
    }
}

/// A stage change waiting for the store to stamp its commit time.
///
/// Stores stamp the change while they hold the task's write lock, so the
/// record's `updated_at` and the ledger's `recorded_at` follow commit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChange {
    task_id: TaskId,
    stage: Stage,
    actor: Option<MemberId>,
}

impl StageChange {
    /// The system-initiated change that puts a task at `assigned`.
    #[must_use]
    pub const fn initial(task_id: TaskId) -> Self {
        Self {
            task_id,
            stage: Stage::Assigned,
            actor: None,
        }
    }

    /// A change to `stage` performed by `actor`.
    #[must_use]
    pub const fn transition(task_id: TaskId, stage: Stage, actor: MemberId) -> Self {
        Self {
            task_id,
            stage,
            actor: Some(actor),
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the target stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Builds the committed record.
    ///
    /// The commit time never precedes the `previous` record's, so a clock
    /// that steps backwards cannot reorder the ledger.
    #[must_use]
    pub fn stamp(self, previous: Option<&StageRecord>, now: DateTime<Utc>) -> StageRecord {
        let at = previous.map_or(now, |record| now.max(record.updated_at));
        StageRecord {
            task_id: self.task_id,
            current_stage: self.stage,
            updated_at: at,
            updated_by: self.actor,
        }
    }
}

/// A transition as committed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTransition {
    record: StageRecord,
    entry: HistoryEntry,
}

impl CommittedTransition {
    /// Pairs a stored record with its ledger entry.
    #[must_use]
    pub const fn new(record: StageRecord, entry: HistoryEntry) -> Self {
        Self { record, entry }
    }

    /// Returns the stored record.
    #[must_use]
    pub const fn record(&self) -> &StageRecord {
        &self.record
    }

    /// Returns the appended ledger entry.
    #[must_use]
    pub const fn entry(&self) -> &HistoryEntry {
        &self.entry
    }

    /// Consumes the transition, returning the stored record.
    #[must_use]
    pub fn into_record(self) -> StageRecord {
        self.record
    }
}

/// Outcome of initialising a task's stage record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initialization {
    /// A new record was written together with its `assigned` ledger entry.
    Created {
        /// The stored record.
        record: StageRecord,
        /// The appended ledger entry.
        entry: HistoryEntry,
    },
    /// The task already had a record; nothing was written.
    AlreadyInitialized(StageRecord),
}

impl Initialization {
    /// Returns the task's current record in either case.
    #[must_use]
    pub fn into_record(self) -> StageRecord {
        match self {
            Self::Created { record, .. } | Self::AlreadyInitialized(record) => record,
        }
    }
}
