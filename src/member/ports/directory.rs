//! Read-only directory port over the identity provider's member list.

use crate::member::domain::{Member, MemberId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for member directory operations.
pub type MemberDirectoryResult<T> = Result<T, MemberDirectoryError>;

/// Member lookup contract.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Finds a member by identifier.
    ///
    /// Returns `None` when the identifier does not resolve.
    async fn find_by_id(&self, id: &MemberId) -> MemberDirectoryResult<Option<Member>>;

    /// Returns every known member, in no particular order.
    async fn list_members(&self) -> MemberDirectoryResult<Vec<Member>>;
}

/// Errors returned by member directory implementations.
#[derive(Debug, Clone, Error)]
pub enum MemberDirectoryError {
    /// Persistence-layer failure.
    #[error("member directory error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MemberDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
