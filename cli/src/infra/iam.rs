//! IAM token exchange — turns an API key into bearer credentials once per run.

use anyhow::{Context, Result};
use refresh_common::{Secret, TokenResponse};
use reqwest::header::ACCEPT;

use crate::infra::http::ensure_success;

const GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Bearer credentials handed to the Schematics client at construction.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: Secret,
    /// Sent with apply/destroy so Schematics can act on the caller's behalf.
    pub refresh_token: Secret,
}

/// Exchange `api_key` for an access/refresh token pair.
///
/// # Errors
///
/// Returns an error if the IAM endpoint is unreachable, rejects the key, or
/// answers with an unexpected body.
pub async fn request_token(
    http: &reqwest::Client,
    iam_url: &str,
    api_key: &Secret,
) -> Result<Credentials> {
    let response = http
        .post(iam_url)
        .basic_auth("bx", Some("bx"))
        .header(ACCEPT, "application/json")
        .form(&[
            ("grant_type", GRANT_TYPE),
            ("apikey", api_key.expose()),
            ("response_type", "cloud_iam"),
        ])
        .send()
        .await
        .context("requesting IAM token")?;

    let token: TokenResponse = ensure_success(response)
        .await
        .context("IAM token request rejected")?
        .json()
        .await
        .context("parsing IAM token response")?;

    tracing::debug!(expires_in = ?token.expires_in, "IAM token obtained");

    Ok(Credentials {
        access_token: Secret::new(token.access_token),
        refresh_token: Secret::new(token.refresh_token),
    })
}
