//! `PostgreSQL` adapter for the member directory.

mod models;
mod repository;
mod schema;

pub use repository::PostgresMemberDirectory;
#[cfg(test)]
pub(crate) use models::MemberRow;
#[cfg(test)]
pub(crate) use repository::row_to_member;
