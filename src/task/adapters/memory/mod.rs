//! In-memory task repository.

mod task;

pub use task::InMemoryTaskRepository;
