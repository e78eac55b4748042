//! The fixed pipeline stage vocabulary.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a task's artefact in the production pipeline.
///
/// Variants are declared in display order, so the derived `Ord` matches the
/// pipeline order. Ordering is informational only; transitions may jump to
/// any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Task handed to the assignee.
    Assigned,
    /// Assignee has recorded the material.
    Recorded,
    /// Material is being edited.
    Editing,
    /// Edited material is being uploaded.
    Uploading,
    /// Material is live.
    Published,
}

impl Stage {
    /// Every stage in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Assigned,
        Self::Recorded,
        Self::Editing,
        Self::Uploading,
        Self::Published,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Recorded => "recorded",
            Self::Editing => "editing",
            Self::Uploading => "uploading",
            Self::Published => "published",
        }
    }

    /// Returns the zero-based position in the pipeline.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Assigned => 0,
            Self::Recorded => 1,
            Self::Editing => 2,
            Self::Uploading => 3,
            Self::Published => 4,
        }
    }

    /// Returns `true` for the final stage.
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "assigned" => Ok(Self::Assigned),
            "recorded" => Ok(Self::Recorded),
            "editing" => Ok(Self::Editing),
            "uploading" => Ok(Self::Uploading),
            "published" => Ok(Self::Published),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
