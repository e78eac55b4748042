//! Error types for member validation and parsing.

use thiserror::Error;

/// Errors returned while constructing member values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemberDomainError {
    /// The member identifier is empty after trimming.
    #[error("member identifier must not be empty")]
    EmptyMemberId,

    /// The member display name is empty after trimming.
    #[error("member name must not be empty")]
    EmptyMemberName,
}

/// Error returned while parsing member roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown member role: {0}")]
pub struct ParseMemberRoleError(pub String);
