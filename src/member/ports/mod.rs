//! Port contracts for member lookup.

pub mod directory;

pub use directory::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult};
