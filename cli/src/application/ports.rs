//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `refresh_common`.

use std::time::Duration;

use anyhow::Result;
use refresh_common::WorkspaceStatus;

use crate::domain::OperationHandle;

// ── Workspace Control Port ────────────────────────────────────────────────────

/// Remote workspace operations. Pure request/response: implementations do not
/// retry and do not time out; the caller paces.
#[allow(async_fn_in_trait)]
pub trait WorkspaceControl {
    /// Read the current workspace status. Has no side effects.
    async fn status(&self, workspace_id: &str) -> Result<WorkspaceStatus>;
    /// Request provisioning of the workspace resources.
    async fn apply(&self, workspace_id: &str) -> Result<OperationHandle>;
    /// Request teardown of the workspace resources.
    async fn destroy(&self, workspace_id: &str) -> Result<OperationHandle>;
}

// ── Logging Port ──────────────────────────────────────────────────────────────

/// Leveled run log. Purely observational: never influences control flow and
/// never fails.
#[allow(async_fn_in_trait)]
pub trait RunLogger {
    async fn info(&self, message: &str);
    async fn error(&self, message: &str);
}

// ── Pacing Port ───────────────────────────────────────────────────────────────

/// Blocks the run for a duration. Every wait in a refresh goes through here.
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn pause(&self, duration: Duration);
}
