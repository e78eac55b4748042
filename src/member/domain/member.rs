//! Member records as resolved from the identity provider.

use super::{MemberDomainError, MemberId, ParseMemberRoleError};
use serde::{Deserialize, Serialize};

/// Role granted to a member by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Administrator who assigns tasks and moves stages.
    Admin,
    /// Regular member who records assigned tasks.
    Member,
    /// Privileged member with access to private task resources.
    ProMember,
}

impl MemberRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::ProMember => "pro_member",
        }
    }

    /// Returns `true` for administrators.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = ParseMemberRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "pro_member" | "promember" => Ok(Self::ProMember),
            _ => Err(ParseMemberRoleError(value.to_owned())),
        }
    }
}

/// A member known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    role: MemberRole,
    class_tag: Option<String>,
}

impl Member {
    /// Creates a member record.
    ///
    /// # Errors
    ///
    /// Returns [`MemberDomainError::EmptyMemberName`] when `name` is blank.
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        role: MemberRole,
    ) -> Result<Self, MemberDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(MemberDomainError::EmptyMemberName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            role,
            class_tag: None,
        })
    }

    /// Sets the class the member belongs to.
    #[must_use]
    pub fn with_class_tag(mut self, class_tag: impl Into<String>) -> Self {
        let tag = class_tag.into();
        self.class_tag = Some(tag.trim().to_owned()).filter(|value| !value.is_empty());
        self
    }

    /// Returns the member identifier.
    #[must_use]
    pub const fn id(&self) -> &MemberId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member role.
    #[must_use]
    pub const fn role(&self) -> MemberRole {
        self.role
    }

    /// Returns the class the member belongs to, if any.
    #[must_use]
    pub fn class_tag(&self) -> Option<&str> {
        self.class_tag.as_deref()
    }
}
