//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{CompletionRow, NewCompletionRow, NewResourceAccessRow, TaskRow},
    schema::{resource_accesses, task_completions, tasks},
};
use crate::member::domain::MemberId;
use crate::postgres::{PersistenceFailure, PgPool, run_blocking};
use crate::task::{
    domain::{
        ClassTag, LifecycleStatus, PersistedTaskData, ResourceAccess, ResourceLink, Task,
        TaskCompletion, TaskId, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for TaskRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_row(task);

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_assignee(&self, member: &MemberId) -> TaskRepositoryResult<Vec<Task>> {
        let assignee = member.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.eq(assignee))
                .order((tasks::created_at.desc(), tasks::insertion_seq.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_all(&self, class_tag: Option<&ClassTag>) -> TaskRepositoryResult<Vec<Task>> {
        let class_filter = class_tag.map(|tag| tag.as_str().to_owned());
        run_blocking(&self.pool, move |connection| {
            let mut query = tasks::table
                .order((tasks::created_at.desc(), tasks::insertion_seq.desc()))
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(tag) = class_filter {
                query = query.filter(tasks::class_tag.eq(tag));
            }
            let rows = query.load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn record_completion(
        &self,
        task: &Task,
        completion: &TaskCompletion,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let status = task.lifecycle_status().as_str().to_owned();
        let completion_row = NewCompletionRow {
            task_id: completion.task_id().into_inner(),
            member_id: completion.member_id().as_str().to_owned(),
            completed_at: completion.completed_at(),
        };

        run_blocking(&self.pool, move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx_conn| {
                let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(tasks::lifecycle_status.eq(status))
                    .execute(tx_conn)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                diesel::insert_into(task_completions::table)
                    .values(&completion_row)
                    .execute(tx_conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn list_completions(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskCompletion>> {
        run_blocking(&self.pool, move |connection| {
            let rows = task_completions::table
                .filter(task_completions::task_id.eq(task_id.into_inner()))
                .order((
                    task_completions::completed_at.asc(),
                    task_completions::id.asc(),
                ))
                .select(CompletionRow::as_select())
                .load::<CompletionRow>(connection)?;
            rows.into_iter().map(row_to_completion).collect()
        })
        .await
    }

    async fn record_resource_access(&self, access: &ResourceAccess) -> TaskRepositoryResult<()> {
        let task_id = access.task_id();
        let row = NewResourceAccessRow {
            task_id: task_id.into_inner(),
            member_id: access.member_id().as_str().to_owned(),
            accessed_at: access.accessed_at(),
        };

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(resource_accesses::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::NotFound(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        resource_link: task.resource_link().map(|link| link.as_str().to_owned()),
        private_resource_link: task
            .private_resource_link()
            .map(|link| link.as_str().to_owned()),
        assigned_to: task.assigned_to().as_str().to_owned(),
        class_tag: task.class_tag().as_str().to_owned(),
        lifecycle_status: task.lifecycle_status().as_str().to_owned(),
        created_at: task.created_at(),
    }
}

/// Converts a loosely typed task row into a validated [`Task`].
pub(crate) fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        resource_link,
        private_resource_link,
        assigned_to,
        class_tag,
        lifecycle_status,
        created_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        resource_link: ResourceLink::optional(resource_link),
        private_resource_link: ResourceLink::optional(private_resource_link),
        assigned_to: MemberId::new(assigned_to).map_err(TaskRepositoryError::persistence)?,
        class_tag: ClassTag::new(class_tag).map_err(TaskRepositoryError::persistence)?,
        lifecycle_status: LifecycleStatus::try_from(lifecycle_status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        created_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_completion(row: CompletionRow) -> TaskRepositoryResult<TaskCompletion> {
    let member_id = MemberId::new(row.member_id).map_err(TaskRepositoryError::persistence)?;
    Ok(TaskCompletion::new(
        TaskId::from_uuid(row.task_id),
        member_id,
        row.completed_at,
    ))
}
