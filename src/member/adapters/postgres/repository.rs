//! `PostgreSQL` member directory implementation.

use super::{models::MemberRow, schema::members};
use crate::member::{
    domain::{Member, MemberId, MemberRole},
    ports::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult},
};
use crate::postgres::{PersistenceFailure, PgPool, run_blocking};
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed member directory.
#[derive(Debug, Clone)]
pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for MemberDirectoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn find_by_id(&self, id: &MemberId) -> MemberDirectoryResult<Option<Member>> {
        let lookup_id = id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = members::table
                .find(lookup_id)
                .select(MemberRow::as_select())
                .first::<MemberRow>(connection)
                .optional()
                .map_err(MemberDirectoryError::persistence)?;
            row.map(row_to_member).transpose()
        })
        .await
    }

    async fn list_members(&self) -> MemberDirectoryResult<Vec<Member>> {
        run_blocking(&self.pool, move |connection| {
            let rows = members::table
                .select(MemberRow::as_select())
                .load::<MemberRow>(connection)
                .map_err(MemberDirectoryError::persistence)?;
            rows.into_iter().map(row_to_member).collect()
        })
        .await
    }
}

/// Converts a loosely typed member row into a validated [`Member`].
pub(crate) fn row_to_member(row: MemberRow) -> MemberDirectoryResult<Member> {
    let MemberRow {
        id,
        name,
        role,
        class_tag,
    } = row;

    let member_id = MemberId::new(id).map_err(MemberDirectoryError::persistence)?;
    let member_role =
        MemberRole::try_from(role.as_str()).map_err(MemberDirectoryError::persistence)?;
    let mut member =
        Member::new(member_id, name, member_role).map_err(MemberDirectoryError::persistence)?;
    if let Some(tag) = class_tag {
        member = member.with_class_tag(tag);
    }
    Ok(member)
}
