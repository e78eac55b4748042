//! Stageboard: task assignment and stage tracking for a small
//! content-production team.
//!
//! Administrators assign tasks to members, work moves through the fixed
//! pipeline `assigned → recorded → editing → uploading → published`, and
//! every move is written to an append-only ledger for audit.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the backing store
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration over injected ports
//!
//! # Modules
//!
//! - [`task`]: Task store, assignee actions and lifecycle status
//! - [`stage`]: Current-stage tracking and the history ledger
//! - [`dashboard`]: Read-only board and audit views
//! - [`member`]: Member directory lookups
//! - [`pipeline`]: Composition root over one set of store clients
//! - [`config`]: Store configuration from the environment

pub mod config;
pub mod dashboard;
pub mod error;
pub mod member;
pub mod pipeline;
pub mod postgres;
pub mod stage;
pub mod task;
