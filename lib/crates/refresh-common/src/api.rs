//! Wire types for the Schematics, IAM and log-ingestion HTTP APIs.
//!
//! Only the fields the refresher reads are modelled; unknown fields are
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::status::WorkspaceStatus;

/// Subset of `GET /v1/workspaces/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceResponse {
    pub status: WorkspaceStatus,
}

/// Response of `PUT /v1/workspaces/{id}/apply` and `/destroy`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityResponse {
    #[serde(default)]
    pub activityid: Option<String>,
}

/// IAM token endpoint response (`POST /identity/token`).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// One record in a log-ingestion batch.
#[derive(Debug, Clone, Serialize)]
pub struct IngestLine {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub line: String,
    pub app: String,
    pub level: String,
    pub meta: IngestMeta,
}

/// Indexed metadata attached to every ingested line.
#[derive(Debug, Clone, Serialize)]
pub struct IngestMeta {
    pub workspace_id: String,
}

/// Request body of the log-ingestion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct IngestBatch {
    pub lines: Vec<IngestLine>,
}
