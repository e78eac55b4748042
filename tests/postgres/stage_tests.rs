//! Stage store behaviour that depends on `PostgreSQL` transactions.

use std::sync::Arc;

use crate::postgres::helpers::{TestDatabase, edit_video_task, member_id, test_runtime};
use chrono::{Duration, Utc};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use stageboard::{
    error::ErrorKind,
    stage::{
        domain::{HistoryEntry, Stage, StageChange},
        ports::{CommitClock, StageRepository},
    },
    task::domain::TaskId,
};

fn system_clock() -> CommitClock {
    Arc::new(Utc::now)
}

#[rstest]
fn repeated_initialize_keeps_existing_record(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;
        let tracker = pipeline.stage_tracker();

        let again = tracker.initialize(task.id()).await.expect("repeat");
        assert_eq!(again.current_stage(), Stage::Assigned);

        tracker
            .transition_to(task.id(), Stage::Editing, member_id("m1"))
            .await
            .expect("transition");
        let after_move = tracker.initialize(task.id()).await.expect("repeat");
        assert_eq!(after_move.current_stage(), Stage::Editing);
        assert_eq!(after_move.updated_by(), Some(&member_id("m1")));

        let entries = pipeline
            .history_ledger()
            .list_history(Some(&[task.id()]))
            .await
            .expect("ledger listing");
        let stages: Vec<Stage> = entries.iter().map(HistoryEntry::stage).collect();
        assert_eq!(stages, vec![Stage::Editing, Stage::Assigned]);
    });
}

#[rstest]
fn initialize_unknown_task_is_not_found(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let error = pipeline
            .stage_tracker()
            .initialize(TaskId::new())
            .await
            .expect_err("task does not exist");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    });
}

#[rstest]
fn transition_for_missing_task_writes_nothing(
    shared_test_cluster: &'static TestCluster,
) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let repository = db.stage_repository();
    let pipeline = db.pipeline();
    let orphan = TaskId::new();

    test_runtime().block_on(async {
        let result = repository
            .apply_transition(
                &StageChange::transition(orphan, Stage::Editing, member_id("m1")),
                system_clock(),
            )
            .await;
        assert!(result.is_err(), "stage row must reference a stored task");

        let record = repository.find_current(orphan).await.expect("lookup");
        assert!(record.is_none());
        let entries = pipeline
            .history_ledger()
            .list_history(Some(&[orphan]))
            .await
            .expect("ledger listing");
        assert!(entries.is_empty());
    });
}

#[rstest]
fn ledger_append_accepts_any_task(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();
    let orphan = TaskId::new();

    test_runtime().block_on(async {
        let entry = pipeline
            .history_ledger()
            .append(orphan, Stage::Uploading, None, Utc::now())
            .await
            .expect("append without checks");

        assert_eq!(entry.task_id(), orphan);
        let entries = pipeline
            .history_ledger()
            .list_history(Some(&[orphan]))
            .await
            .expect("ledger listing");
        assert_eq!(entries, vec![entry]);
    });
}

#[rstest]
fn lagging_clock_never_moves_updated_at_backwards(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let repository = db.stage_repository();
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;
        let initial = repository
            .find_current(task.id())
            .await
            .expect("lookup")
            .expect("record");
        let lagging = initial.updated_at() - Duration::hours(1);

        let committed = repository
            .apply_transition(
                &StageChange::transition(task.id(), Stage::Editing, member_id("m2")),
                Arc::new(move || lagging),
            )
            .await
            .expect("transition");

        assert_eq!(committed.record().updated_at(), initial.updated_at());
        assert_eq!(committed.entry().recorded_at(), initial.updated_at());
        let entries = pipeline
            .history_ledger()
            .list_history(Some(&[task.id()]))
            .await
            .expect("ledger listing");
        assert_eq!(entries.first(), Some(committed.entry()));
    });
}
