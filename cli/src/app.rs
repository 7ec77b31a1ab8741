//! Application context — the collaborators of one refresh run, built once.
//!
//! `AppContext` owns the HTTP-backed Control API client, the run logger and
//! the pacer, and hands borrowed views of them to the refresh service.

use anyhow::Result;
use refresh_common::RefreshConfig;

use crate::application::ports::RunLogger;
use crate::application::services::refresh::{RefreshContext, run_refresh};
use crate::domain::{RefreshTimings, RemoteApiError, RunOutcome};
use crate::infra::http::build_client;
use crate::infra::iam::request_token;
use crate::infra::log_sink::IngestLogger;
use crate::infra::pacer::TokioPacer;
use crate::infra::schematics::SchematicsClient;

pub struct AppContext {
    pub workspace_id: String,
    pub timings: RefreshTimings,
    pub control: SchematicsClient,
    pub logger: IngestLogger,
    pub pacer: TokioPacer,
}

impl AppContext {
    /// Build the logger, obtain IAM credentials and construct the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the IAM token
    /// request fails. Token failures are also sent to the run logger, which
    /// is flushed before returning.
    pub async fn connect(config: &RefreshConfig) -> Result<Self> {
        let http = build_client()?;
        let logger = IngestLogger::new(http.clone(), config);

        let credentials = match request_token(&http, &config.iam_url, &config.ibmcloud_api_key).await
        {
            Ok(credentials) => credentials,
            Err(e) => {
                logger
                    .error(&format!("Error obtaining IAM token: {e:#}"))
                    .await;
                logger.flush().await;
                return Err(e);
            }
        };

        Ok(Self {
            workspace_id: config.workspace_id.clone(),
            timings: RefreshTimings::from_config(config),
            control: SchematicsClient::new(http, &config.schematics_url, credentials),
            logger,
            pacer: TokioPacer,
        })
    }

    /// Run one hardware refresh against the configured workspace.
    ///
    /// # Errors
    ///
    /// Returns `RemoteApiError` if any Control API call fails.
    pub async fn run(&self) -> Result<RunOutcome, RemoteApiError> {
        let ctx = RefreshContext {
            control: &self.control,
            logger: &self.logger,
            pacer: &self.pacer,
            workspace_id: &self.workspace_id,
            timings: &self.timings,
        };
        run_refresh(&ctx).await
    }

    /// Ship any buffered log lines before the process exits.
    pub async fn shutdown(self) {
        self.logger.flush().await;
    }
}
