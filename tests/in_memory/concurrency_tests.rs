//! Racing transitions on a single task.

use std::sync::Arc;

use crate::in_memory::helpers::{edit_video_task, member_id, pipeline};
use eyre::{ensure, eyre};
use rstest::rstest;
use stageboard::{
    pipeline::InMemoryPipeline,
    stage::{domain::Stage, services::TransitionStageRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_transitions_both_reach_the_ledger(
    pipeline: InMemoryPipeline,
) -> Result<(), eyre::Report> {
    let task = edit_video_task(&pipeline).await?;
    let task_id = task.id();
    let pipeline = Arc::new(pipeline);

    let handles: Vec<_> = [("editing", "e1"), ("uploading", "e2")]
        .into_iter()
        .map(|(stage, actor)| {
            let shared = Arc::clone(&pipeline);
            tokio::spawn(async move {
                shared
                    .stage_tracker()
                    .transition(TransitionStageRequest::new(task_id, stage, member_id(actor)))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    let history = pipeline
        .history_ledger()
        .list_history(Some(&[task_id]))
        .await?;
    ensure!(history.len() == 3, "expected 3 entries, got {}", history.len());
    let stages: Vec<Stage> = history.iter().map(|entry| entry.stage()).collect();
    ensure!(stages.contains(&Stage::Editing) && stages.contains(&Stage::Uploading));

    let last_committed = history
        .iter()
        .max_by_key(|entry| entry.sequence())
        .ok_or_else(|| eyre!("empty history"))?;
    let current = pipeline
        .stage_tracker()
        .current_stage(task_id)
        .await?
        .ok_or_else(|| eyre!("missing stage record"))?;
    ensure!(current.current_stage() == last_committed.stage());
    ensure!(current.updated_by() == last_committed.actor());
    ensure!(current.updated_at() == last_committed.recorded_at());

    ensure!(
        history.is_sorted_by(|newer, older| newer.sequence() > older.sequence()),
        "ledger recency order must match commit order"
    );
    let latest = pipeline
        .history_ledger()
        .latest_stages(Some(&[task_id]))
        .await?;
    ensure!(latest.get(&task_id).map(|entry| entry.stage()) == Some(current.current_stage()));
    Ok(())
}
