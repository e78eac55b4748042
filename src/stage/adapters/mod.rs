//! Adapter implementations of the stage and history ports.

pub mod memory;
pub mod postgres;
