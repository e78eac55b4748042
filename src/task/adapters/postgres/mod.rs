//! `PostgreSQL` adapters for task persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
#[cfg(test)]
pub(crate) use models::TaskRow;
#[cfg(test)]
pub(crate) use repository::row_to_task;
