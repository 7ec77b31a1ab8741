use std::fmt;

use serde::{Deserialize, Serialize};

/// Workspace status as reported by the Schematics control plane.
///
/// Only four values drive decisions; anything else (e.g. `INPROGRESS`,
/// `DRAFT`, `CONNECTING`) is carried verbatim in [`WorkspaceStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkspaceStatus {
    Active,
    Inactive,
    Failed,
    Cancelled,
    Other(String),
}

impl WorkspaceStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Other(raw) => raw,
        }
    }

    /// `true` for the statuses that end an apply or destroy unsuccessfully.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

impl From<&str> for WorkspaceStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "FAILED" => Self::Failed,
            "CANCELLED" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WorkspaceStatus {
    fn from(raw: String) -> Self {
        match Self::from(raw.as_str()) {
            Self::Other(_) => Self::Other(raw),
            known => known,
        }
    }
}

impl From<WorkspaceStatus> for String {
    fn from(status: WorkspaceStatus) -> Self {
        match status {
            WorkspaceStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
