//! Caller-facing error categories shared by every service.
//!
//! Each service keeps its own `thiserror` enum so callers can match on the
//! precise failure, and every such enum maps onto one [`ErrorKind`] through
//! its `kind()` method.

use std::fmt;

/// Broad category of a failed pipeline operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// The acting member is not permitted to perform the operation.
    Authorization,
    /// A stage value outside the fixed vocabulary.
    InvalidStage,
    /// A referenced task or stage record is absent.
    NotFound,
    /// The primary write succeeded but a follow-up write failed.
    PartialFailure,
    /// The backing store failed.
    Store,
}

impl ErrorKind {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::InvalidStage => "invalid_stage",
            Self::NotFound => "not_found",
            Self::PartialFailure => "partial_failure",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
