//! Diesel schema for stage tracking and the history ledger.

diesel::table! {
    /// Current stage, one row per task.
    stage_tracking (task_id) {
        /// Tracked task.
        task_id -> Uuid,
        /// Current stage literal.
        #[max_length = 20]
        current_stage -> Varchar,
        /// Time of the latest transition.
        updated_at -> Timestamptz,
        /// Actor of the latest transition; null when system-initiated.
        #[max_length = 255]
        updated_by -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Append-only transition ledger.
    stage_history (id) {
        /// Insertion sequence.
        id -> Int8,
        /// Task that moved.
        task_id -> Uuid,
        /// Stage entered.
        #[max_length = 20]
        stage -> Varchar,
        /// Transition timestamp.
        recorded_at -> Timestamptz,
        /// Acting member; null when system-initiated.
        #[max_length = 255]
        recorded_by -> Nullable<Varchar>,
    }
}
