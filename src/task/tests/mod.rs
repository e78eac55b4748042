//! Unit tests for the task store context.
