//! Task store for the production pipeline.
//!
//! Administrators assign tasks to members; assignees mark them completed and
//! open their private resources. Creating a task puts it at the `assigned`
//! stage, and completing it moves it to `recorded`, through the
//! [`stage`](crate::stage) context. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
