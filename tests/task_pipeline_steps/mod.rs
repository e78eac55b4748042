//! Step definitions for task pipeline behaviour scenarios.

pub mod then;
pub mod when;
pub mod world;
