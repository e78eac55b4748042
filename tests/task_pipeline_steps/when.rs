//! When steps for task pipeline BDD scenarios.

use std::sync::Arc;

use super::world::{PipelineWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use stageboard::{
    member::domain::MemberId,
    stage::services::TransitionStageRequest,
    task::services::CreateTaskRequest,
};

#[when(r#""{title}" is assigned to "{assignee}" in class "{class_tag}""#)]
fn assign_task(
    world: &mut PipelineWorld,
    title: String,
    assignee: String,
    class_tag: String,
) -> Result<(), eyre::Report> {
    let task = run_async(
        world
            .pipeline
            .task_store()
            .create_task(CreateTaskRequest::new(title, assignee, class_tag)),
    )
    .wrap_err("assign task")?;
    world.task = Some(task);
    Ok(())
}

#[when(r#""{actor}" marks the task completed"#)]
fn mark_completed(world: &mut PipelineWorld, actor: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let actor_id = MemberId::new(actor)?;
    let result = run_async(world.pipeline.task_store().mark_completed(task_id, &actor_id));
    if let Ok((ref task, _)) = result {
        world.task = Some(task.clone());
    }
    world.last_completion = Some(result);
    Ok(())
}

#[when(r#""{actor}" moves the task to "{stage}""#)]
fn move_task(world: &mut PipelineWorld, actor: String, stage: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let request = TransitionStageRequest::new(task_id, stage, MemberId::new(actor)?);
    let result = run_async(world.pipeline.stage_tracker().transition(request));
    world.last_transition = Some(result);
    Ok(())
}

#[when(r#""{first_actor}" and "{second_actor}" move the task to "{first_stage}" and "{second_stage}" at the same time"#)]
fn move_task_concurrently(
    world: &mut PipelineWorld,
    first_actor: String,
    second_actor: String,
    first_stage: String,
    second_stage: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let requests = [
        TransitionStageRequest::new(task_id, first_stage, MemberId::new(first_actor)?),
        TransitionStageRequest::new(task_id, second_stage, MemberId::new(second_actor)?),
    ];
    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let pipeline = Arc::clone(&world.pipeline);
            tokio::spawn(async move { pipeline.stage_tracker().transition(request).await })
        })
        .collect();
    run_async(async move {
        for handle in handles {
            handle.await?.wrap_err("concurrent transition")?;
        }
        Ok::<_, eyre::Report>(())
    })
}
