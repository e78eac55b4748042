//! Composition root wiring every service over one backing store.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::config::{ConfigError, StoreConfig};
use crate::dashboard::DashboardService;
use crate::member::{
    adapters::{memory::InMemoryMemberDirectory, postgres::PostgresMemberDirectory},
    ports::MemberDirectory,
    services::MemberDirectoryService,
};
use crate::postgres::PgPool;
use crate::stage::{
    adapters::{memory::InMemoryStageStore, postgres::PostgresStageRepository},
    ports::{HistoryRepository, StageRepository},
    services::{HistoryLedgerService, StageTrackerService},
};
use crate::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
    services::TaskStoreService,
};

/// Task pipeline backed entirely by in-memory stores.
pub type InMemoryPipeline<C = DefaultClock> =
    Pipeline<InMemoryTaskRepository, InMemoryMemberDirectory, InMemoryStageStore, C>;

/// Task pipeline backed by `PostgreSQL`.
pub type PostgresPipeline =
    Pipeline<PostgresTaskRepository, PostgresMemberDirectory, PostgresStageRepository, DefaultClock>;

/// The task store, stage tracker, history ledger and read views sharing
/// one set of store clients.
///
/// `S` backs both the current-stage projection and the ledger so that a
/// transition writes both in one store operation.
pub struct Pipeline<T, M, S, C>
where
    T: TaskRepository,
    M: MemberDirectory,
    S: StageRepository + HistoryRepository,
    C: Clock + Send + Sync + 'static,
{
    tasks: TaskStoreService<T, M, S, C>,
    stages: StageTrackerService<T, S, C>,
    history: HistoryLedgerService<S>,
    dashboard: DashboardService<T, S, S, M>,
    members: MemberDirectoryService<M>,
}

impl<T, M, S, C> Pipeline<T, M, S, C>
where
    T: TaskRepository,
    M: MemberDirectory,
    S: StageRepository + HistoryRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Wires the services over the given store clients.
    #[must_use]
    pub fn new(tasks: Arc<T>, members: Arc<M>, stages: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            tasks: TaskStoreService::new(
                Arc::clone(&tasks),
                Arc::clone(&members),
                Arc::clone(&stages),
                Arc::clone(&clock),
            ),
            stages: StageTrackerService::new(Arc::clone(&tasks), Arc::clone(&stages), clock),
            history: HistoryLedgerService::new(Arc::clone(&stages)),
            dashboard: DashboardService::new(
                tasks,
                Arc::clone(&stages),
                stages,
                Arc::clone(&members),
            ),
            members: MemberDirectoryService::new(members),
        }
    }

    /// Returns the task store.
    #[must_use]
    pub const fn task_store(&self) -> &TaskStoreService<T, M, S, C> {
        &self.tasks
    }

    /// Returns the stage tracker.
    #[must_use]
    pub const fn stage_tracker(&self) -> &StageTrackerService<T, S, C> {
        &self.stages
    }

    /// Returns the history ledger.
    #[must_use]
    pub const fn history_ledger(&self) -> &HistoryLedgerService<S> {
        &self.history
    }

    /// Returns the dashboard views.
    #[must_use]
    pub const fn dashboard(&self) -> &DashboardService<T, S, S, M> {
        &self.dashboard
    }

    /// Returns the member directory.
    #[must_use]
    pub const fn members(&self) -> &MemberDirectoryService<M> {
        &self.members
    }
}

impl<C> Pipeline<InMemoryTaskRepository, InMemoryMemberDirectory, InMemoryStageStore, C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Builds a pipeline over fresh in-memory stores.
    #[must_use]
    pub fn in_memory(directory: InMemoryMemberDirectory, clock: C) -> Self {
        Self::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(directory),
            Arc::new(InMemoryStageStore::new()),
            Arc::new(clock),
        )
    }
}

impl PostgresPipeline {
    /// Builds a pipeline over an existing connection pool.
    #[must_use]
    pub fn from_pool(pool: &PgPool) -> Self {
        Self::new(
            Arc::new(PostgresTaskRepository::new(pool.clone())),
            Arc::new(PostgresMemberDirectory::new(pool.clone())),
            Arc::new(PostgresStageRepository::new(pool.clone())),
            Arc::new(DefaultClock),
        )
    }

    /// Opens a connection pool from `config` and builds a pipeline over it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot be built.
    pub fn connect(config: &StoreConfig) -> Result<Self, ConfigError> {
        let pool = config.build_pool()?;
        Ok(Self::from_pool(&pool))
    }
}
