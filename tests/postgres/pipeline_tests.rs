//! Pipeline scenarios over the `PostgreSQL` adapters.

use crate::postgres::helpers::{TestDatabase, edit_video_task, member_id, test_runtime};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use stageboard::{
    dashboard::BoardQuery,
    error::ErrorKind,
    pipeline::PostgresPipeline,
    stage::{
        domain::{HistoryEntry, Stage, StageRecord},
        services::TransitionStageRequest,
    },
    task::domain::{LifecycleStatus, TaskId},
};

async fn history(pipeline: &PostgresPipeline, task_id: TaskId) -> Vec<HistoryEntry> {
    pipeline
        .history_ledger()
        .list_history(Some(&[task_id]))
        .await
        .expect("ledger listing")
}

async fn history_stages(pipeline: &PostgresPipeline, task_id: TaskId) -> Vec<Stage> {
    history(pipeline, task_id)
        .await
        .iter()
        .map(HistoryEntry::stage)
        .collect()
}

async fn current(pipeline: &PostgresPipeline, task_id: TaskId) -> StageRecord {
    pipeline
        .stage_tracker()
        .current_stage(task_id)
        .await
        .expect("stage lookup")
        .expect("stage record")
}

#[rstest]
fn assignment_starts_at_assigned(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;

        let record = current(&pipeline, task.id()).await;
        assert_eq!(record.current_stage(), Stage::Assigned);
        assert!(record.updated_by().is_none());
        let entries = history(&pipeline, task.id()).await;
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|entry| entry.actor().is_none()));

        let listed = pipeline
            .task_store()
            .list_for_assignee(&member_id("m1"))
            .await
            .expect("assignee listing");
        let ids: Vec<TaskId> = listed.iter().map(|listed_task| listed_task.id()).collect();
        assert_eq!(ids, vec![task.id()]);
    });
}

#[rstest]
fn completion_records_status_and_stage_together(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;

        let (_, record) = pipeline
            .task_store()
            .mark_completed(task.id(), &member_id("m1"))
            .await
            .expect("completion");

        assert_eq!(record.current_stage(), Stage::Recorded);
        assert_eq!(record.updated_by(), Some(&member_id("m1")));
        let stored = pipeline
            .task_store()
            .get_task(task.id())
            .await
            .expect("task lookup");
        assert_eq!(stored.lifecycle_status(), LifecycleStatus::Completed);
        let completions = pipeline
            .task_store()
            .list_completions(task.id())
            .await
            .expect("completion log");
        assert_eq!(completions.len(), 1);
        assert_eq!(
            history_stages(&pipeline, task.id()).await,
            vec![Stage::Recorded, Stage::Assigned]
        );
    });
}

#[rstest]
fn non_assignee_completion_writes_nothing(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;

        let error = pipeline
            .task_store()
            .mark_completed(task.id(), &member_id("admin1"))
            .await
            .expect_err("only the assignee may complete");

        assert_eq!(error.kind(), ErrorKind::Authorization);
        let stored = pipeline
            .task_store()
            .get_task(task.id())
            .await
            .expect("task lookup");
        assert_eq!(stored.lifecycle_status(), LifecycleStatus::Pending);
        let completions = pipeline
            .task_store()
            .list_completions(task.id())
            .await
            .expect("completion log");
        assert!(completions.is_empty());
        assert_eq!(history_stages(&pipeline, task.id()).await.len(), 1);
    });
}

#[rstest]
fn publishing_hides_task_from_status_board(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;
        pipeline
            .task_store()
            .mark_completed(task.id(), &member_id("m1"))
            .await
            .expect("completion");

        pipeline
            .stage_tracker()
            .transition(TransitionStageRequest::new(
                task.id(),
                "published",
                member_id("admin1"),
            ))
            .await
            .expect("publish");

        assert_eq!(
            current(&pipeline, task.id()).await.current_stage(),
            Stage::Published
        );
        assert_eq!(
            history_stages(&pipeline, task.id()).await,
            vec![Stage::Published, Stage::Recorded, Stage::Assigned]
        );
        let status_view = pipeline
            .dashboard()
            .board(&BoardQuery::new().excluding_published())
            .await
            .expect("status board");
        assert!(status_view.iter().all(|row| row.task().id() != task.id()));
        let full_view = pipeline
            .dashboard()
            .board(&BoardQuery::new())
            .await
            .expect("full board");
        assert!(
            full_view
                .iter()
                .any(|row| row.task().id() == task.id() && row.is_published())
        );
    });
}

#[rstest]
fn racing_transitions_commit_in_ledger_order(shared_test_cluster: &'static TestCluster) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();

    test_runtime().block_on(async {
        let task = edit_video_task(&pipeline).await;
        let tracker = pipeline.stage_tracker();

        let (editing, uploading) = tokio::join!(
            tracker.transition_to(task.id(), Stage::Editing, member_id("m1")),
            tracker.transition_to(task.id(), Stage::Uploading, member_id("m2")),
        );
        editing.expect("editing transition");
        uploading.expect("uploading transition");

        let entries = history(&pipeline, task.id()).await;
        assert_eq!(entries.len(), 3);
        assert!(entries.is_sorted_by(|newer, older| newer.sequence() > older.sequence()));

        let record = current(&pipeline, task.id()).await;
        let newest = entries.first().expect("newest entry");
        assert_eq!(newest.stage(), record.current_stage());
        assert_eq!(newest.actor(), record.updated_by());
        assert_eq!(newest.recorded_at(), record.updated_at());

        let latest = pipeline
            .history_ledger()
            .latest_stages(Some(&[task.id()]))
            .await
            .expect("latest stages");
        assert_eq!(
            latest.get(&task.id()).map(HistoryEntry::stage),
            Some(record.current_stage())
        );
    });
}
