//! Domain model for pipeline members and their roles.

mod error;
mod ids;
mod member;

pub use error::{MemberDomainError, ParseMemberRoleError};
pub use ids::MemberId;
pub use member::{Member, MemberRole};
