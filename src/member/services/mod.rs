//! Query services over the member directory.

mod directory;

pub use directory::{MemberDirectoryService, MemberQueryError};
