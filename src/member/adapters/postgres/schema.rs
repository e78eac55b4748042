//! Diesel schema for member lookups.

diesel::table! {
    /// Members mirrored from the identity provider.
    members (id) {
        /// Opaque member identifier.
        #[max_length = 255]
        id -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Member role.
        #[max_length = 20]
        role -> Varchar,
        /// Optional class the member belongs to.
        #[max_length = 100]
        class_tag -> Nullable<Varchar>,
    }
}
