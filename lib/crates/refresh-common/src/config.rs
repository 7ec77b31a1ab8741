use serde::Deserialize;
use thiserror::Error;

use crate::secret::Secret;

/// Refresher configuration, read from the process environment.
///
/// Field names map to upper-case variables (`workspace_id` ↔ `WORKSPACE_ID`).
/// The three credentials/identifiers are required; everything else has a
/// default matching the production deployment. Required fields deserialize
/// to empty when absent so [`RefreshConfig::validate`] names the variable.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// IBM Cloud API key exchanged for an IAM token at startup.
    #[serde(default)]
    pub ibmcloud_api_key: Secret,

    /// Schematics workspace to refresh.
    #[serde(default)]
    pub workspace_id: String,

    /// Ingestion key for the remote log sink.
    #[serde(default)]
    pub logdna_ingestion_key: Secret,

    #[serde(default = "default_schematics_url")]
    pub schematics_url: String,

    #[serde(default = "default_iam_url")]
    pub iam_url: String,

    #[serde(default = "default_logdna_url")]
    pub logdna_url: String,

    /// Application tag attached to every shipped log line.
    #[serde(default = "default_logdna_app")]
    pub logdna_app: String,

    /// Hostname reported to the log sink. Falls back to `logdna_app`.
    #[serde(default)]
    pub logdna_hostname: Option<String>,

    /// Delay between issuing a command and the first status read.
    #[serde(default = "default_settle_secs")]
    pub refresh_settle_secs: u64,

    #[serde(default = "default_destroy_poll_secs")]
    pub refresh_destroy_poll_secs: u64,

    #[serde(default = "default_apply_poll_secs")]
    pub refresh_apply_poll_secs: u64,

    /// Pause after a successful destroy before anything else runs.
    #[serde(default = "default_destroy_grace_secs")]
    pub refresh_destroy_grace_secs: u64,

    #[serde(default)]
    pub refresh_apply_grace_secs: u64,

    /// Wait applied when the workspace is in a status we do not act on.
    #[serde(default = "default_idle_wait_secs")]
    pub refresh_idle_wait_secs: u64,

    /// Upper bound on the time one flow spends waiting between polls.
    /// Unset means poll until a terminal status is seen.
    #[serde(default)]
    pub refresh_poll_timeout_secs: Option<u64>,

    #[serde(default = "default_max_recovery_attempts")]
    pub refresh_max_recovery_attempts: u32,
}

/// Errors raised while validating a loaded [`RefreshConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),

    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: u64,
        value: u64,
    },
}

impl RefreshConfig {
    /// Reject empty required values and unusable tunables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ibmcloud_api_key.is_empty() {
            return Err(ConfigError::Missing("IBMCLOUD_API_KEY"));
        }
        if self.workspace_id.trim().is_empty() {
            return Err(ConfigError::Missing("WORKSPACE_ID"));
        }
        if self.logdna_ingestion_key.is_empty() {
            return Err(ConfigError::Missing("LOGDNA_INGESTION_KEY"));
        }
        if self.refresh_max_recovery_attempts == 0 {
            return Err(ConfigError::TooSmall {
                name: "REFRESH_MAX_RECOVERY_ATTEMPTS",
                min: 1,
                value: 0,
            });
        }
        for (name, value) in [
            ("REFRESH_DESTROY_POLL_SECS", self.refresh_destroy_poll_secs),
            ("REFRESH_APPLY_POLL_SECS", self.refresh_apply_poll_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::TooSmall { name, min: 1, value });
            }
        }
        Ok(())
    }

    /// Hostname reported to the log sink.
    #[must_use]
    pub fn log_hostname(&self) -> &str {
        self.logdna_hostname.as_deref().unwrap_or(&self.logdna_app)
    }
}

fn default_schematics_url() -> String {
    "https://private-us-south.schematics.cloud.ibm.com".to_string()
}

fn default_iam_url() -> String {
    "https://iam.cloud.ibm.com/identity/token".to_string()
}

fn default_logdna_url() -> String {
    "https://logs.private.us-south.logging.cloud.ibm.com/logs/ingest".to_string()
}

fn default_logdna_app() -> String {
    "schematics-refresh".to_string()
}

fn default_settle_secs() -> u64 {
    5
}

fn default_destroy_poll_secs() -> u64 {
    60
}

fn default_apply_poll_secs() -> u64 {
    600
}

fn default_destroy_grace_secs() -> u64 {
    60
}

fn default_idle_wait_secs() -> u64 {
    60
}

fn default_max_recovery_attempts() -> u32 {
    3
}
