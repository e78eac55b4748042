//! Shared test helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Local, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use stageboard::{
    member::domain::MemberId,
    pipeline::PostgresPipeline,
    postgres::PgPool,
    stage::adapters::postgres::PostgresStageRepository,
    task::{
        adapters::postgres::PostgresTaskRepository, domain::Task, services::CreateTaskRequest,
    },
};
use tokio::runtime::Runtime;

/// Boxed error returned by harness setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Full schema, applied once to the template database.
const MIGRATION_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_pipeline_tables/up.sql");

/// Members every test database starts with.
const SEED_MEMBERS_SQL: &str = concat!(
    "INSERT INTO members (id, name, role) VALUES ",
    "('admin1', 'Office', 'admin'), ",
    "('m1', 'Asha', 'member'), ",
    "('m2', 'Bilal', 'pro_member')",
);

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "stageboard_test_template";

/// Creates a tokio runtime for async repository calls in tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Builds a member identifier.
pub fn member_id(value: &str) -> MemberId {
    MemberId::new(value).expect("valid member id")
}

/// Clock that always reports the same instant.
pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(MIGRATION_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            conn.batch_execute(SEED_MEMBERS_SQL)
                .map_err(|e| eyre::eyre!("member seed failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// A database cloned from the template and dropped when the value is.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
    pool: Option<PgPool>,
}

impl TestDatabase {
    /// Clones the template into a fresh, uniquely named database.
    ///
    /// # Errors
    ///
    /// Returns an error if template setup, database creation or pool
    /// construction fails.
    pub fn create(cluster: &'static TestCluster) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let name = format!("test_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| Box::new(e) as BoxError)?;
        let url = cluster.connection().database_url(&name);
        // Racing transitions need more than one connection.
        let pool = Pool::builder()
            .max_size(4)
            .build(ConnectionManager::<PgConnection>::new(url))
            .map_err(|e| Box::new(e) as BoxError)?;
        Ok(Self {
            cluster,
            name,
            pool: Some(pool),
        })
    }

    fn pool(&self) -> &PgPool {
        self.pool.as_ref().expect("pool lives until drop")
    }

    /// Builds a pipeline over this database.
    pub fn pipeline(&self) -> PostgresPipeline {
        PostgresPipeline::from_pool(self.pool())
    }

    /// Builds a bare stage repository over this database.
    pub fn stage_repository(&self) -> PostgresStageRepository {
        PostgresStageRepository::new(self.pool().clone())
    }

    /// Builds a bare task repository over this database.
    pub fn task_repository(&self) -> PostgresTaskRepository {
        PostgresTaskRepository::new(self.pool().clone())
    }

    /// Runs one raw SQL statement and returns the affected row count.
    ///
    /// # Errors
    ///
    /// Returns the database error when the statement is rejected.
    pub fn execute(&self, sql: &str) -> QueryResult<usize> {
        let mut conn = self.pool().get().expect("pooled connection");
        diesel::sql_query(sql).execute(&mut conn)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.pool.take());
        if let Err(e) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.name);
        }
    }
}

/// Creates the "Edit video" task assigned to `m1` in class `9`.
pub async fn edit_video_task(pipeline: &PostgresPipeline) -> Task {
    pipeline
        .task_store()
        .create_task(CreateTaskRequest::new("Edit video", "m1", "9"))
        .await
        .expect("task creation")
}
