//! Probe classification results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a single probe pass observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The service flagged the session as automated
    Blocked,

    /// The audio challenge asked for another attempt
    RetryRequested,

    /// The checkbox is marked as verified
    Solved,

    /// No terminal condition observed this pass
    Pending,
}

impl Classification {
    /// Check if this pass ended the polling cycle
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check if the challenge was passed
    #[must_use]
    pub fn is_solved(self) -> bool {
        matches!(self, Self::Solved)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Blocked => "blocked",
            Self::RetryRequested => "retry_requested",
            Self::Solved => "solved",
            Self::Pending => "pending",
        };
        f.write_str(s)
    }
}
