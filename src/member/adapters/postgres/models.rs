//! Diesel row models for member lookups.

use super::schema::members;
use diesel::prelude::*;

/// Query result row for member records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MemberRow {
    /// Opaque member identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Member role.
    pub role: String,
    /// Optional class the member belongs to.
    pub class_tag: Option<String>,
}
