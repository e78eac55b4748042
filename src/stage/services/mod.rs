//! Application services for stage tracking and ledger reporting.

mod ledger;
mod tracker;

pub use ledger::{HistoryLedgerError, HistoryLedgerService};
pub use tracker::{StageTrackerError, StageTrackerService, TransitionStageRequest};
