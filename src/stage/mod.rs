//! Pipeline stage tracking and the transition history ledger.
//!
//! Every task moves through the fixed five-stage pipeline
//! `assigned → recorded → editing → uploading → published`. This context
//! owns two projections of that movement:
//!
//! - the **current stage** of each task (one [`StageRecord`] per task), and
//! - the append-only **history** of every transition ([`HistoryEntry`]).
//!
//! A transition always updates both in a single store operation. Stages may
//! be selected in any order; the vocabulary is enforced, ordering is not.
//!
//! [`StageRecord`]: domain::StageRecord
//! [`HistoryEntry`]: domain::HistoryEntry

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
