//! Read-side views joining the task store, the stage tracker, the ledger
//! and the member directory.
//!
//! Nothing here writes. The board view pairs each task with its current
//! stage record; the audit view annotates ledger entries with task titles
//! and member names.

mod query;
mod service;

pub use query::{AuditQuery, AuditRow, BoardQuery, BoardRow, StageFilter, shape_audit, shape_board};
pub use service::{DashboardError, DashboardService};

#[cfg(test)]
mod tests;
