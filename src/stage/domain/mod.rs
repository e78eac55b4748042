//! Domain model for stage tracking and the history ledger.

mod error;
mod history;
mod record;
mod stage;

pub use error::ParseStageError;
pub use history::{HistoryEntry, NewHistoryEntry, latest_per_task, sort_newest_first};
pub use record::{CommittedTransition, Initialization, StageChange, StageRecord};
pub use stage::Stage;
