//! Member lookups used by the admin assignment flow.

use crate::error::ErrorKind;
use crate::member::{
    domain::{Member, MemberId},
    ports::{MemberDirectory, MemberDirectoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for member lookups.
#[derive(Debug, Error)]
pub enum MemberQueryError {
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] MemberDirectoryError),
}

impl MemberQueryError {
    /// Returns the caller-facing error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Directory(_) => ErrorKind::Store,
        }
    }
}

/// Read-only member directory service.
#[derive(Clone)]
pub struct MemberDirectoryService<M>
where
    M: MemberDirectory,
{
    directory: Arc<M>,
}

impl<M> MemberDirectoryService<M>
where
    M: MemberDirectory,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(directory: Arc<M>) -> Self {
        Self { directory }
    }

    /// Resolves a member by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MemberQueryError::Directory`] when the lookup fails.
    pub async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, MemberQueryError> {
        Ok(self.directory.find_by_id(id).await?)
    }

    /// Lists the members tasks can be assigned to: every non-admin member,
    /// sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`MemberQueryError::Directory`] when the listing fails.
    pub async fn list_assignable(&self) -> Result<Vec<Member>, MemberQueryError> {
        let mut members: Vec<Member> = self
            .directory
            .list_members()
            .await?
            .into_iter()
            .filter(|member| !member.role().is_admin())
            .collect();
        members.sort_by(|left, right| {
            left.name()
                .cmp(right.name())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(members)
    }
}
