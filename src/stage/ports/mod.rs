//! Port contracts for stage tracking and the history ledger.
//!
//! Both ports are usually implemented by one store, because a transition
//! must update the current-stage projection and append to the ledger in a
//! single store operation.

pub mod history;
pub mod repository;

pub use history::HistoryRepository;
pub use repository::{CommitClock, StageRepository, StageRepositoryError, StageRepositoryResult};
