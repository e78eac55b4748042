//! `PostgreSQL` adapters for stage tracking and the history ledger.

mod models;
mod repository;
mod schema;

pub use repository::PostgresStageRepository;
#[cfg(test)]
pub(crate) use models::{HistoryRow, StageTrackingRow};
#[cfg(test)]
pub(crate) use repository::{row_to_entry, row_to_record};
