//! Run logger that mirrors every record to `tracing` and ships it to a
//! LogDNA-compatible ingestion endpoint.
//!
//! Records go onto a bounded queue drained by a background task, so a slow or
//! silent sink never stalls the refresh. Shipping is best effort: failures
//! are reported locally at `warn` and never reach the refresh state machine.

use std::time::Duration;

use chrono::Utc;
use refresh_common::{IngestBatch, IngestLine, IngestMeta, RefreshConfig, Secret};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::application::ports::RunLogger;

/// Lines buffered before new records are dropped.
const QUEUE_CAPACITY: usize = 256;
/// Most lines sent in one POST.
const MAX_BATCH: usize = 50;
/// Per-request limit for one ingestion POST.
const SHIP_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound on draining the queue at shutdown.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Log level as understood by the ingestion API.
#[derive(Debug, Clone, Copy)]
enum Level {
    Info,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

pub struct IngestLogger {
    app: String,
    workspace_id: String,
    queue: mpsc::Sender<IngestLine>,
    worker: JoinHandle<()>,
}

impl IngestLogger {
    /// Build the logger and start its shipping task.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &RefreshConfig) -> Self {
        let (queue, rx) = mpsc::channel(QUEUE_CAPACITY);
        let shipper = Shipper {
            http,
            url: config.logdna_url.clone(),
            key: config.logdna_ingestion_key.clone(),
            hostname: config.log_hostname().to_string(),
        };
        Self {
            app: config.logdna_app.clone(),
            workspace_id: config.workspace_id.clone(),
            queue,
            worker: tokio::spawn(shipper.drain(rx)),
        }
    }

    /// Close the queue and wait for buffered lines to be shipped.
    pub async fn flush(self) {
        drop(self.queue);
        match tokio::time::timeout(FLUSH_TIMEOUT, self.worker).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "log shipping task failed"),
            Err(_) => tracing::warn!("log queue not drained before shutdown"),
        }
    }

    fn enqueue(&self, level: Level, message: &str) {
        let line = IngestLine {
            timestamp: Utc::now().timestamp_millis(),
            line: message.to_string(),
            app: self.app.clone(),
            level: level.as_str().to_string(),
            meta: IngestMeta {
                workspace_id: self.workspace_id.clone(),
            },
        };
        match self.queue.try_send(line) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::warn!("log queue full, dropping line"),
            Err(TrySendError::Closed(_)) => tracing::warn!("log shipping stopped, dropping line"),
        }
    }
}

impl RunLogger for IngestLogger {
    async fn info(&self, message: &str) {
        tracing::info!(app = %self.app, workspace_id = %self.workspace_id, "{message}");
        self.enqueue(Level::Info, message);
    }

    async fn error(&self, message: &str) {
        tracing::error!(app = %self.app, workspace_id = %self.workspace_id, "{message}");
        self.enqueue(Level::Error, message);
    }
}

/// Owns the ingestion endpoint details inside the background task.
struct Shipper {
    http: reqwest::Client,
    url: String,
    key: Secret,
    hostname: String,
}

impl Shipper {
    async fn drain(self, mut rx: mpsc::Receiver<IngestLine>) {
        while let Some(first) = rx.recv().await {
            let mut lines = vec![first];
            while lines.len() < MAX_BATCH {
                match rx.try_recv() {
                    Ok(line) => lines.push(line),
                    Err(_) => break,
                }
            }
            self.ship(&IngestBatch { lines }).await;
        }
    }

    async fn ship(&self, batch: &IngestBatch) {
        let now = Utc::now().timestamp_millis().to_string();
        let result = self
            .http
            .post(&self.url)
            .timeout(SHIP_TIMEOUT)
            .basic_auth(self.key.expose(), Some(""))
            .query(&[("hostname", self.hostname.as_str()), ("now", now.as_str())])
            .json(batch)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "log ingestion rejected");
            }
            Err(e) => tracing::warn!(error = %e, lines = batch.lines.len(), "log ingestion failed"),
        }
    }
}
