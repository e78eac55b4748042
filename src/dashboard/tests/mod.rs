//! Unit tests for dashboard views.
