//! Unit tests for the member directory context.
