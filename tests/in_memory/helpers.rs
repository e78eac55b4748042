//! Shared test helpers for in-memory pipeline integration tests.

use rstest::fixture;
use stageboard::{
    member::{
        adapters::memory::InMemoryMemberDirectory,
        domain::{Member, MemberId, MemberRole},
    },
    pipeline::InMemoryPipeline,
    task::{domain::Task, services::CreateTaskRequest},
};

/// Builds a member identifier.
///
/// # Panics
///
/// Panics if `value` is blank.
pub fn member_id(value: &str) -> MemberId {
    MemberId::new(value).expect("valid member id")
}

fn member(id: &str, name: &str, role: MemberRole) -> Member {
    Member::new(member_id(id), name, role).expect("valid member")
}

/// Provides a pipeline with one administrator and two members.
#[fixture]
pub fn pipeline() -> InMemoryPipeline {
    let directory = InMemoryMemberDirectory::with_members([
        member("admin1", "Office", MemberRole::Admin),
        member("m1", "Asha", MemberRole::Member),
        member("m2", "Bilal", MemberRole::ProMember),
    ]);
    InMemoryPipeline::in_memory(directory, mockable::DefaultClock)
}

/// Creates the "Edit video" task assigned to `m1` in class `9`.
///
/// # Errors
///
/// Returns an error if task creation fails.
pub async fn edit_video_task(pipeline: &InMemoryPipeline) -> Result<Task, eyre::Report> {
    let task = pipeline
        .task_store()
        .create_task(CreateTaskRequest::new("Edit video", "m1", "9"))
        .await?;
    Ok(task)
}
