//! Adapter implementations of the member directory port.

pub mod memory;
pub mod postgres;
