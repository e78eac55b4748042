//! Thread-safe in-memory member directory for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::member::{
    domain::{Member, MemberId},
    ports::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult},
};

/// In-memory member directory keyed by member identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberDirectory {
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded with the given members.
    #[must_use]
    pub fn with_members(members: impl IntoIterator<Item = Member>) -> Self {
        let entries = members
            .into_iter()
            .map(|member| (member.id().clone(), member))
            .collect();
        Self {
            members: Arc::new(RwLock::new(entries)),
        }
    }

    /// Adds or replaces a member.
    ///
    /// # Errors
    ///
    /// Returns [`MemberDirectoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert(&self, member: Member) -> MemberDirectoryResult<()> {
        let mut members = self.members.write().map_err(|err| {
            MemberDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        members.insert(member.id().clone(), member);
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_by_id(&self, id: &MemberId) -> MemberDirectoryResult<Option<Member>> {
        let members = self.members.read().map_err(|err| {
            MemberDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(members.get(id).cloned())
    }

    async fn list_members(&self) -> MemberDirectoryResult<Vec<Member>> {
        let members = self.members.read().map_err(|err| {
            MemberDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(members.values().cloned().collect())
    }
}
