//! Unit tests for stage tracking and the history ledger.
