//! In-memory stage store.

mod store;

pub use store::InMemoryStageStore;
