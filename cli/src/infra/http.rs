//! Shared HTTP helpers for the Schematics, IAM and ingestion clients.

use anyhow::Result;
use reqwest::Response;

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Build the HTTP client shared by every remote collaborator.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("ws-refresh/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Turn a non-2xx response into an error quoting status and body.
///
/// # Errors
///
/// Returns an error for any non-success HTTP status.
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    let quoted: String = body.chars().take(MAX_ERROR_BODY).collect();
    anyhow::bail!("HTTP {}: {quoted}", status.as_u16())
}
