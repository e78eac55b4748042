//! Then steps for task pipeline BDD scenarios.

use super::world::{PipelineWorld, run_async};
use rstest_bdd_macros::then;
use stageboard::{
    dashboard::BoardQuery,
    error::ErrorKind,
    stage::domain::{HistoryEntry, Stage},
    task::domain::LifecycleStatus,
};

fn history(world: &PipelineWorld) -> Result<Vec<HistoryEntry>, eyre::Report> {
    let task_id = world.task()?.id();
    let entries = run_async(
        world
            .pipeline
            .history_ledger()
            .list_history(Some(&[task_id])),
    )?;
    Ok(entries)
}

fn current_stage(world: &PipelineWorld) -> Result<Stage, eyre::Report> {
    let task_id = world.task()?.id();
    let record = run_async(world.pipeline.stage_tracker().current_stage(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} has no stage record"))?;
    Ok(record.current_stage())
}

#[then(r#"the task stage is "{stage}""#)]
fn task_stage_is(world: &PipelineWorld, stage: String) -> Result<(), eyre::Report> {
    let expected = Stage::try_from(stage.as_str())?;
    let actual = current_stage(world)?;
    eyre::ensure!(actual == expected, "expected stage {expected}, found {actual}");
    Ok(())
}

#[then("the task history has {count:usize} entries")]
fn task_history_has(world: &PipelineWorld, count: usize) -> Result<(), eyre::Report> {
    let entries = history(world)?;
    eyre::ensure!(
        entries.len() == count,
        "expected {count} history entries, found {}",
        entries.len()
    );
    Ok(())
}

#[then(r#"the latest history stage is "{stage}""#)]
fn latest_history_stage_is(world: &PipelineWorld, stage: String) -> Result<(), eyre::Report> {
    let expected = Stage::try_from(stage.as_str())?;
    let entries = history(world)?;
    let latest = entries
        .first()
        .ok_or_else(|| eyre::eyre!("history is empty"))?;
    eyre::ensure!(
        latest.stage() == expected,
        "expected latest stage {expected}, found {}",
        latest.stage()
    );
    Ok(())
}

#[then(r#"the task lifecycle status is "{status}""#)]
fn lifecycle_status_is(world: &PipelineWorld, status: String) -> Result<(), eyre::Report> {
    let expected = LifecycleStatus::try_from(status.as_str())?;
    let task_id = world.task()?.id();
    let stored = run_async(world.pipeline.task_store().get_task(task_id))?;
    eyre::ensure!(
        stored.lifecycle_status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        stored.lifecycle_status().as_str()
    );
    Ok(())
}

#[then("the status board without published tasks does not list the task")]
fn status_board_omits_task(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let rows = run_async(
        world
            .pipeline
            .dashboard()
            .board(&BoardQuery::new().excluding_published()),
    )?;
    eyre::ensure!(
        rows.iter().all(|row| row.task().id() != task_id),
        "published task {task_id} is still on the status board"
    );
    Ok(())
}

#[then("the current stage matches the last committed history entry")]
fn current_stage_matches_last_commit(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let entries = history(world)?;
    let last_committed = entries
        .iter()
        .max_by_key(|entry| entry.sequence())
        .ok_or_else(|| eyre::eyre!("history is empty"))?;
    let actual = current_stage(world)?;
    eyre::ensure!(
        actual == last_committed.stage(),
        "current stage {actual} differs from last committed {}",
        last_committed.stage()
    );
    Ok(())
}

#[then("the transition fails with an invalid stage error")]
fn transition_fails_with_invalid_stage(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_transition
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;
    eyre::ensure!(
        result
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::InvalidStage),
        "expected InvalidStage error, got {result:?}"
    );
    Ok(())
}

#[then("the completion fails with an authorization error")]
fn completion_fails_with_authorization(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_completion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing completion result"))?;
    eyre::ensure!(
        result
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::Authorization),
        "expected Authorization error, got {result:?}"
    );
    Ok(())
}
