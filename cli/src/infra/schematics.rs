//! Schematics REST client — production implementation of `WorkspaceControl`.

use anyhow::{Context, Result};
use refresh_common::{ActivityResponse, WorkspaceResponse, WorkspaceStatus};

use crate::application::ports::WorkspaceControl;
use crate::domain::OperationHandle;
use crate::infra::http::ensure_success;
use crate::infra::iam::Credentials;

/// Header carrying the IAM refresh token on mutating workspace commands.
const REFRESH_TOKEN_HEADER: &str = "refresh_token";

/// Talks to `{base_url}/v1/workspaces/...` with bearer credentials.
pub struct SchematicsClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl SchematicsClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn workspace_url(&self, workspace_id: &str) -> String {
        format!("{}/v1/workspaces/{workspace_id}", self.base_url)
    }

    async fn command(&self, workspace_id: &str, verb: &str) -> Result<OperationHandle> {
        let url = format!("{}/{verb}", self.workspace_url(workspace_id));
        let response = self
            .http
            .put(&url)
            .bearer_auth(self.credentials.access_token.expose())
            .header(REFRESH_TOKEN_HEADER, self.credentials.refresh_token.expose())
            .json(&serde_json::json!({}))
            .send()
            .await
            .with_context(|| format!("PUT {url}"))?;

        let activity: ActivityResponse = ensure_success(response)
            .await
            .with_context(|| format!("PUT {url}"))?
            .json()
            .await
            .with_context(|| format!("parsing {verb} response"))?;

        tracing::debug!(verb, activity_id = ?activity.activityid, "workspace command accepted");
        Ok(OperationHandle {
            activity_id: activity.activityid,
        })
    }
}

impl WorkspaceControl for SchematicsClient {
    async fn status(&self, workspace_id: &str) -> Result<WorkspaceStatus> {
        let url = self.workspace_url(workspace_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.credentials.access_token.expose())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let workspace: WorkspaceResponse = ensure_success(response)
            .await
            .with_context(|| format!("GET {url}"))?
            .json()
            .await
            .context("parsing workspace response")?;
        Ok(workspace.status)
    }

    async fn apply(&self, workspace_id: &str) -> Result<OperationHandle> {
        self.command(workspace_id, "apply").await
    }

    async fn destroy(&self, workspace_id: &str) -> Result<OperationHandle> {
        self.command(workspace_id, "destroy").await
    }
}
