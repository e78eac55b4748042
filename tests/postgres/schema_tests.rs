//! Constraints enforced by the migration itself.

use crate::postgres::helpers::{TestDatabase, edit_video_task, test_runtime};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
#[case("UPDATE stage_history SET stage = 'published'")]
#[case("DELETE FROM stage_history")]
fn ledger_rows_cannot_be_rewritten(
    shared_test_cluster: &'static TestCluster,
    #[case] statement: &str,
) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");
    let pipeline = db.pipeline();
    let seeded = test_runtime().block_on(edit_video_task(&pipeline));

    let result = db.execute(statement);

    let error = result.expect_err("stage_history is append-only");
    assert_eq!(seeded.title().as_str(), "Edit video");
    assert!(
        error.to_string().contains("append-only"),
        "unexpected error: {error}"
    );
}

#[rstest]
#[case(concat!(
    "INSERT INTO stage_history (task_id, stage, recorded_at) ",
    "VALUES (gen_random_uuid(), 'archived', now())",
))]
#[case("INSERT INTO members (id, name, role) VALUES ('x1', 'Xena', 'owner')")]
#[case(concat!(
    "INSERT INTO tasks (id, title, assigned_to, class_tag) ",
    "VALUES (gen_random_uuid(), 'Lesson', 'nobody', '9')",
))]
#[case(concat!(
    "INSERT INTO tasks (id, title, assigned_to, class_tag) ",
    "VALUES (gen_random_uuid(), '   ', 'm1', '9')",
))]
fn vocabulary_and_reference_checks_reject_rows(
    shared_test_cluster: &'static TestCluster,
    #[case] statement: &str,
) {
    let db = TestDatabase::create(shared_test_cluster).expect("test database");

    assert!(db.execute(statement).is_err(), "accepted: {statement}");
}
