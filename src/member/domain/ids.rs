//! Identifier type for members and acting users.

use super::MemberDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a member or administrator.
///
/// The identity provider owns the format; the pipeline only requires it to
/// be non-blank. The same identifier is recorded as the actor of stage
/// transitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a validated member identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MemberDomainError::EmptyMemberId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, MemberDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(MemberDomainError::EmptyMemberId);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
