//! Query parameters and row shaping for dashboard views.

use std::collections::HashMap;

use crate::member::domain::MemberId;
use crate::stage::domain::{HistoryEntry, ParseStageError, Stage, StageRecord};
use crate::task::domain::{ClassTag, Task, TaskId, TaskTitle};

/// Stage restriction for the board view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageFilter {
    /// Every task, including tasks whose stage is unknown.
    #[default]
    All,
    /// Only tasks currently at the given stage.
    Only(Stage),
}

impl StageFilter {
    /// Returns `true` when a row with `stage` passes the filter.
    ///
    /// A missing stage only passes [`StageFilter::All`].
    #[must_use]
    pub fn matches(self, stage: Option<Stage>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => stage == Some(wanted),
        }
    }
}

impl TryFrom<&str> for StageFilter {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Stage::try_from(value).map(Self::Only)
    }
}

/// Filters for the board view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardQuery {
    assignee: Option<MemberId>,
    class_tag: Option<ClassTag>,
    stage: StageFilter,
    exclude_published: bool,
}

impl BoardQuery {
    /// Creates a query matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the board to one assignee.
    #[must_use]
    pub fn for_assignee(mut self, member: MemberId) -> Self {
        self.assignee = Some(member);
        self
    }

    /// Restricts the board to one class.
    #[must_use]
    pub fn in_class(mut self, class_tag: ClassTag) -> Self {
        self.class_tag = Some(class_tag);
        self
    }

    /// Restricts the board by current stage.
    #[must_use]
    pub const fn at_stage(mut self, stage: StageFilter) -> Self {
        self.stage = stage;
        self
    }

    /// Drops tasks whose current stage is `published`.
    #[must_use]
    pub const fn excluding_published(mut self) -> Self {
        self.exclude_published = true;
        self
    }

    /// Returns the assignee restriction.
    #[must_use]
    pub const fn assignee(&self) -> Option<&MemberId> {
        self.assignee.as_ref()
    }

    /// Returns the class restriction.
    #[must_use]
    pub const fn class_tag(&self) -> Option<&ClassTag> {
        self.class_tag.as_ref()
    }
}

/// One task on the board with its current stage, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    task: Task,
    stage: Option<StageRecord>,
}

impl BoardRow {
    /// Returns the task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the current stage record, or `None` when the stage is unknown.
    #[must_use]
    pub const fn stage_record(&self) -> Option<&StageRecord> {
        self.stage.as_ref()
    }

    /// Returns the current stage, or `None` when unknown.
    #[must_use]
    pub fn current_stage(&self) -> Option<Stage> {
        self.stage.as_ref().map(StageRecord::current_stage)
    }

    /// Returns `true` when the task is at the `published` stage.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.current_stage().is_some_and(Stage::is_published)
    }
}

/// Pairs tasks with their stage records and applies the stage filters.
///
/// `tasks` must already be newest first and restricted by assignee and
/// class. Published rows are moved to the end without disturbing the
/// relative order of the others.
#[must_use]
pub fn shape_board(
    tasks: Vec<Task>,
    mut records: HashMap<TaskId, StageRecord>,
    query: &BoardQuery,
) -> Vec<BoardRow> {
    let mut rows: Vec<BoardRow> = tasks
        .into_iter()
        .map(|task| {
            let stage = records.remove(&task.id());
            BoardRow { task, stage }
        })
        .filter(|row| query.stage.matches(row.current_stage()))
        .filter(|row| !(query.exclude_published && row.is_published()))
        .collect();
    rows.sort_by_key(BoardRow::is_published);
    rows
}

/// Filters for the audit view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    task_ids: Option<Vec<TaskId>>,
    exclude_published: bool,
}

impl AuditQuery {
    /// Creates a query over the whole ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the log to the given tasks.
    #[must_use]
    pub fn for_tasks(mut self, task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.task_ids = Some(task_ids.into_iter().collect());
        self
    }

    /// Drops entries that record a move to `published`.
    #[must_use]
    pub const fn excluding_published(mut self) -> Self {
        self.exclude_published = true;
        self
    }

    /// Returns the task restriction.
    #[must_use]
    pub fn task_ids(&self) -> Option<&[TaskId]> {
        self.task_ids.as_deref()
    }
}

/// One ledger entry annotated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    entry: HistoryEntry,
    task_title: Option<TaskTitle>,
    actor_name: Option<String>,
}

impl AuditRow {
    /// Returns the ledger entry.
    #[must_use]
    pub const fn entry(&self) -> &HistoryEntry {
        &self.entry
    }

    /// Returns the task title, or `None` when the task is unknown.
    #[must_use]
    pub const fn task_title(&self) -> Option<&TaskTitle> {
        self.task_title.as_ref()
    }

    /// Returns the actor's display name.
    ///
    /// `None` for system entries and for actors missing from the directory.
    #[must_use]
    pub fn actor_name(&self) -> Option<&str> {
        self.actor_name.as_deref()
    }
}

/// Annotates newest-first ledger entries with titles and member names.
#[must_use]
pub fn shape_audit(
    entries: Vec<HistoryEntry>,
    titles: &HashMap<TaskId, TaskTitle>,
    names: &HashMap<MemberId, String>,
    query: &AuditQuery,
) -> Vec<AuditRow> {
    entries
        .into_iter()
        .filter(|entry| !(query.exclude_published && entry.stage().is_published()))
        .map(|entry| {
            let task_title = titles.get(&entry.task_id()).cloned();
            let actor_name = entry.actor().and_then(|actor| names.get(actor)).cloned();
            AuditRow {
                entry,
                task_title,
                actor_name,
            }
        })
        .collect()
}
