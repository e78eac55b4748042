//! Error types for stage parsing.

use thiserror::Error;

/// Error returned when a value is outside the stage vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage '{0}', expected one of assigned, recorded, editing, uploading, published")]
pub struct ParseStageError(pub String);
