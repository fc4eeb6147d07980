//! Task progress status.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};

/// Task progress status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work can start.
    #[default]
    Ready,
    /// Work is under way.
    OnGoing,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::OnGoing => "ON_GOING",
            Self::Done => "DONE",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "READY" => Ok(Self::Ready),
            "ON_GOING" => Ok(Self::OnGoing),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
