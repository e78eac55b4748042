//! Append-only transition ledger entries and the "latest entry wins" rule.

use super::Stage;
use crate::member::domain::MemberId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A ledger entry that has not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    task_id: TaskId,
    stage: Stage,
    actor: Option<MemberId>,
    recorded_at: DateTime<Utc>,
}

impl NewHistoryEntry {
    /// Creates a pending ledger entry.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        stage: Stage,
        actor: Option<MemberId>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            stage,
            actor,
            recorded_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the stage entered.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the acting member, if any.
    #[must_use]
    pub const fn actor(&self) -> Option<&MemberId> {
        self.actor.as_ref()
    }

    /// Returns the transition timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Attaches the store-assigned insertion sequence.
    #[must_use]
    pub fn commit(self, sequence: u64) -> HistoryEntry {
        HistoryEntry {
            task_id: self.task_id,
            stage: self.stage,
            actor: self.actor,
            recorded_at: self.recorded_at,
            sequence,
        }
    }
}

/// A committed, immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    task_id: TaskId,
    stage: Stage,
    actor: Option<MemberId>,
    recorded_at: DateTime<Utc>,
    sequence: u64,
}

impl HistoryEntry {
    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the stage entered.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the acting member; `None` for system-initiated entries.
    #[must_use]
    pub const fn actor(&self) -> Option<&MemberId> {
        self.actor.as_ref()
    }

    /// Returns the transition timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Returns the store-assigned insertion sequence.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Orders entries by recency: later timestamp first, then later
    /// insertion first.
    #[must_use]
    pub fn recency_cmp(&self, other: &Self) -> Ordering {
        other
            .recorded_at
            .cmp(&self.recorded_at)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Sorts entries newest first using [`HistoryEntry::recency_cmp`].
pub fn sort_newest_first(entries: &mut [HistoryEntry]) {
    entries.sort_by(HistoryEntry::recency_cmp);
}

/// Rebuilds the current stage of each task from ledger entries alone.
///
/// The current entry is the one with the greatest timestamp; equal
/// timestamps resolve to the later insertion.
#[must_use]
pub fn latest_per_task(
    entries: impl IntoIterator<Item = HistoryEntry>,
) -> HashMap<TaskId, HistoryEntry> {
    let mut latest: HashMap<TaskId, HistoryEntry> = HashMap::new();
    for entry in entries {
        match latest.get(&entry.task_id) {
            Some(current) if current.recency_cmp(&entry) != Ordering::Greater => {}
            _ => {
                latest.insert(entry.task_id, entry);
            }
        }
    }
    latest
}
