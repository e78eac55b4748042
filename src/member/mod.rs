//! Member directory consumed by the task pipeline.
//!
//! Members are owned by an external identity provider. The pipeline only
//! resolves them by identifier when assigning tasks and when rendering audit
//! rows, so this context exposes a read-only directory:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Query services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
