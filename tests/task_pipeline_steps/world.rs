//! Shared world state for task pipeline BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use stageboard::{
    member::adapters::memory::InMemoryMemberDirectory,
    pipeline::InMemoryPipeline,
    stage::{domain::StageRecord, services::StageTrackerError},
    task::{
        domain::Task,
        services::TaskStoreError,
    },
};

/// Scenario world for task pipeline behaviour tests.
pub struct PipelineWorld {
    pub pipeline: Arc<InMemoryPipeline>,
    pub directory: InMemoryMemberDirectory,
    pub task: Option<Task>,
    pub last_transition: Option<Result<StageRecord, StageTrackerError>>,
    pub last_completion: Option<Result<(Task, StageRecord), TaskStoreError>>,
}

impl PipelineWorld {
    /// Creates a world with an empty member directory and fresh stores.
    #[must_use]
    pub fn new() -> Self {
        let directory = InMemoryMemberDirectory::new();
        let pipeline = InMemoryPipeline::in_memory(directory.clone(), DefaultClock);
        Self {
            pipeline: Arc::new(pipeline),
            directory,
            task: None,
            last_transition: None,
            last_completion: None,
        }
    }

    /// Returns the task created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }
}

impl Default for PipelineWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PipelineWorld {
    PipelineWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
