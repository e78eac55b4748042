//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Human-readable label.
        title -> Text,
        /// Optional public resource link.
        resource_link -> Nullable<Text>,
        /// Optional assignee-only resource link.
        private_resource_link -> Nullable<Text>,
        /// Assigned member identifier.
        #[max_length = 255]
        assigned_to -> Varchar,
        /// Class tag.
        #[max_length = 100]
        class_tag -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        lifecycle_status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Insertion order; breaks `created_at` ties.
        insertion_seq -> Int8,
    }
}

diesel::table! {
    /// One row per "marked completed" action.
    task_completions (id) {
        /// Surrogate key.
        id -> Int8,
        /// Completed task.
        task_id -> Uuid,
        /// Member who completed the task.
        #[max_length = 255]
        member_id -> Varchar,
        /// Completion timestamp.
        completed_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per private-resource access.
    resource_accesses (id) {
        /// Surrogate key.
        id -> Int8,
        /// Task whose resource was opened.
        task_id -> Uuid,
        /// Member who opened the resource.
        #[max_length = 255]
        member_id -> Varchar,
        /// Access timestamp.
        accessed_at -> Timestamptz,
    }
}
