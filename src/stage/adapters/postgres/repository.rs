//! `PostgreSQL` repository implementation for stage tracking and the ledger.
//!
//! A transition locks the task's current-stage row, reads the commit clock,
//! upserts the row and inserts the ledger row, all inside one transaction.
//! Concurrent transitions of one task therefore commit in lock order, and
//! both the `BIGSERIAL` sequence and the timestamps reflect commit order.
//! The upsert keeps `updated_at` monotonic for the case where two
//! transitions race to create a missing row.

use super::{
    models::{HistoryRow, NewHistoryRow, StageTrackingRow},
    schema::{stage_history, stage_tracking},
};
use crate::member::domain::MemberId;
use crate::postgres::{PersistenceFailure, PgPool, run_blocking};
use crate::stage::{
    domain::{
        CommittedTransition, HistoryEntry, Initialization, NewHistoryEntry, Stage, StageChange,
        StageRecord,
    },
    ports::{
        CommitClock, HistoryRepository, StageRepository, StageRepositoryError,
        StageRepositoryResult,
    },
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_types::Timestamptz;
use diesel::upsert::excluded;
use std::collections::HashMap;

/// `PostgreSQL`-backed stage store implementing both stage ports.
#[derive(Debug, Clone)]
pub struct PostgresStageRepository {
    pool: PgPool,
}

impl PostgresStageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for StageRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for StageRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl StageRepository for PostgresStageRepository {
    async fn initialize(
        &self,
        task_id: TaskId,
        clock: CommitClock,
    ) -> StageRepositoryResult<Initialization> {
        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, StageRepositoryError, _>(|tx_conn| {
                let stamped = StageChange::initial(task_id).stamp(None, clock());
                let inserted = diesel::insert_into(stage_tracking::table)
                    .values(&to_tracking_row(&stamped))
                    .on_conflict(stage_tracking::task_id)
                    .do_nothing()
                    .returning(StageTrackingRow::as_returning())
                    .get_result::<StageTrackingRow>(tx_conn)
                    .optional()?;
                let Some(row) = inserted else {
                    let existing = stage_tracking::table
                        .find(task_id.into_inner())
                        .select(StageTrackingRow::as_select())
                        .first::<StageTrackingRow>(tx_conn)?;
                    return Ok(Initialization::AlreadyInitialized(row_to_record(existing)?));
                };
                let record = row_to_record(row)?;
                let entry = insert_history(tx_conn, &to_history_row(&record.history_entry()))?;
                Ok(Initialization::Created { record, entry })
            })
        })
        .await
    }

    async fn apply_transition(
        &self,
        change: &StageChange,
        clock: CommitClock,
    ) -> StageRepositoryResult<CommittedTransition> {
        let change = change.clone();

        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, StageRepositoryError, _>(|tx_conn| {
                let previous = stage_tracking::table
                    .find(change.task_id().into_inner())
                    .select(StageTrackingRow::as_select())
                    .for_update()
                    .first::<StageTrackingRow>(tx_conn)
                    .optional()?
                    .map(row_to_record)
                    .transpose()?;
                let record = change.stamp(previous.as_ref(), clock());
                let stored = diesel::insert_into(stage_tracking::table)
                    .values(&to_tracking_row(&record))
                    .on_conflict(stage_tracking::task_id)
                    .do_update()
                    .set((
                        stage_tracking::current_stage.eq(excluded(stage_tracking::current_stage)),
                        stage_tracking::updated_at.eq(sql::<Timestamptz>(
                            "GREATEST(excluded.updated_at, stage_tracking.updated_at)",
                        )),
                        stage_tracking::updated_by.eq(excluded(stage_tracking::updated_by)),
                    ))
                    .returning(StageTrackingRow::as_returning())
                    .get_result::<StageTrackingRow>(tx_conn)?;
                let record = row_to_record(stored)?;
                let entry = insert_history(tx_conn, &to_history_row(&record.history_entry()))?;
                Ok(CommittedTransition::new(record, entry))
            })
        })
        .await
    }

    async fn find_current(&self, task_id: TaskId) -> StageRepositoryResult<Option<StageRecord>> {
        run_blocking(&self.pool, move |connection| {
            let row = stage_tracking::table
                .find(task_id.into_inner())
                .select(StageTrackingRow::as_select())
                .first::<StageTrackingRow>(connection)
                .optional()?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn find_current_many(
        &self,
        task_ids: &[TaskId],
    ) -> StageRepositoryResult<HashMap<TaskId, StageRecord>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let uuids: Vec<uuid::Uuid> = task_ids.iter().map(|id| id.into_inner()).collect();

        run_blocking(&self.pool, move |connection| {
            let rows = stage_tracking::table
                .filter(stage_tracking::task_id.eq_any(uuids))
                .select(StageTrackingRow::as_select())
                .load::<StageTrackingRow>(connection)?;
            rows.into_iter()
                .map(|row| row_to_record(row).map(|record| (record.task_id(), record)))
                .collect()
        })
        .await
    }
}

#[async_trait]
impl HistoryRepository for PostgresStageRepository {
    async fn append(&self, entry: &NewHistoryEntry) -> StageRepositoryResult<HistoryEntry> {
        let history_row = to_history_row(entry);
        run_blocking(&self.pool, move |connection| {
            insert_history(connection, &history_row)
        })
        .await
    }

    async fn list(&self, task_ids: Option<&[TaskId]>) -> StageRepositoryResult<Vec<HistoryEntry>> {
        let filter: Option<Vec<uuid::Uuid>> =
            task_ids.map(|ids| ids.iter().map(|id| id.into_inner()).collect());

        run_blocking(&self.pool, move |connection| {
            let mut query = stage_history::table
                .order((stage_history::recorded_at.desc(), stage_history::id.desc()))
                .select(HistoryRow::as_select())
                .into_boxed();
            if let Some(uuids) = filter {
                query = query.filter(stage_history::task_id.eq_any(uuids));
            }
            let rows = query.load::<HistoryRow>(connection)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

fn insert_history(
    connection: &mut PgConnection,
    row: &NewHistoryRow,
) -> StageRepositoryResult<HistoryEntry> {
    let stored = diesel::insert_into(stage_history::table)
        .values(row)
        .returning(HistoryRow::as_returning())
        .get_result::<HistoryRow>(connection)?;
    row_to_entry(stored)
}

fn to_tracking_row(record: &StageRecord) -> StageTrackingRow {
    StageTrackingRow {
        task_id: record.task_id().into_inner(),
        current_stage: record.current_stage().as_str().to_owned(),
        updated_at: record.updated_at(),
        updated_by: record.updated_by().map(|actor| actor.as_str().to_owned()),
    }
}

fn to_history_row(entry: &NewHistoryEntry) -> NewHistoryRow {
    NewHistoryRow {
        task_id: entry.task_id().into_inner(),
        stage: entry.stage().as_str().to_owned(),
        recorded_at: entry.recorded_at(),
        recorded_by: entry.actor().map(|actor| actor.as_str().to_owned()),
    }
}

fn parse_actor(raw: Option<String>) -> StageRepositoryResult<Option<MemberId>> {
    raw.map(MemberId::new)
        .transpose()
        .map_err(StageRepositoryError::persistence)
}

/// Converts a loosely typed tracking row into a validated [`StageRecord`].
pub(crate) fn row_to_record(row: StageTrackingRow) -> StageRepositoryResult<StageRecord> {
    let stage =
        Stage::try_from(row.current_stage.as_str()).map_err(StageRepositoryError::persistence)?;
    Ok(StageRecord::from_persisted(
        TaskId::from_uuid(row.task_id),
        stage,
        row.updated_at,
        parse_actor(row.updated_by)?,
    ))
}

/// Converts a loosely typed ledger row into a validated [`HistoryEntry`].
pub(crate) fn row_to_entry(row: HistoryRow) -> StageRepositoryResult<HistoryEntry> {
    let stage = Stage::try_from(row.stage.as_str()).map_err(StageRepositoryError::persistence)?;
    let sequence = u64::try_from(row.id).map_err(StageRepositoryError::persistence)?;
    let entry = NewHistoryEntry::new(
        TaskId::from_uuid(row.task_id),
        stage,
        parse_actor(row.recorded_by)?,
        row.recorded_at,
    );
    Ok(entry.commit(sequence))
}
