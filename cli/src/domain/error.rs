//! Typed domain error enums.
//!
//! `RemoteApiError` is the only error the refresh state machine returns.
//! Observed failure statuses are outcomes, not errors.

use std::fmt;

use thiserror::Error;

/// The Control API call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    GetStatus,
    Apply,
    Destroy,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GetStatus => "getting workspace status",
            Self::Apply => "applying resources",
            Self::Destroy => "destroying resources",
        })
    }
}

/// A Control API call failed (auth, network, malformed response, rejection).
///
/// Fatal for the run: never retried.
#[derive(Debug, Error)]
#[error("Error {operation}: {cause:#}")]
pub struct RemoteApiError {
    pub operation: ApiOperation,
    pub cause: anyhow::Error,
}

impl RemoteApiError {
    #[must_use]
    pub fn new(operation: ApiOperation, cause: anyhow::Error) -> Self {
        Self { operation, cause }
    }
}
