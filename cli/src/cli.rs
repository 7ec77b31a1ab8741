//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::domain::RunOutcome;
use crate::infra::config::load_config;

const ENV_HELP: &str = "\
Environment:
  IBMCLOUD_API_KEY               IBM Cloud API key (required)
  WORKSPACE_ID                   Schematics workspace to refresh (required)
  LOGDNA_INGESTION_KEY           Log sink ingestion key (required)
  SCHEMATICS_URL, IAM_URL, LOGDNA_URL, LOGDNA_APP, LOGDNA_HOSTNAME
  REFRESH_SETTLE_SECS            Delay before the first status read [5]
  REFRESH_DESTROY_POLL_SECS      Destroy poll interval [60]
  REFRESH_APPLY_POLL_SECS        Apply poll interval [600]
  REFRESH_DESTROY_GRACE_SECS     Pause after a successful destroy [60]
  REFRESH_APPLY_GRACE_SECS       Pause after a successful apply [0]
  REFRESH_IDLE_WAIT_SECS         Wait when the status is not actionable [60]
  REFRESH_POLL_TIMEOUT_SECS      Give up polling one operation after this long
  REFRESH_MAX_RECOVERY_ATTEMPTS  Destroy+apply cycles for a FAILED workspace [3]
  RUST_LOG                       Local log filter [info]";

/// Destroy and re-provision a Schematics workspace
#[derive(Parser)]
#[command(name = "ws-refresh", version, after_help = ENV_HELP)]
pub struct Cli {}

impl Cli {
    /// Execute one refresh run.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete, the IAM token cannot
    /// be obtained, or a Control API call fails.
    pub async fn run(self) -> Result<RunOutcome> {
        init_tracing();

        let config = load_config()?;
        tracing::info!(
            workspace_id = %config.workspace_id,
            schematics_url = %config.schematics_url,
            app = %config.logdna_app,
            "configuration loaded",
        );

        let app = AppContext::connect(&config).await?;
        let outcome = app.run().await;
        app.shutdown().await;
        let outcome = outcome?;
        tracing::info!(?outcome, "refresh finished");
        Ok(outcome)
    }
}

/// Initialise tracing with RUST_LOG env filter, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
