//! Tests for the ingestion-backed run logger.

#![allow(clippy::expect_used)]

use std::time::Duration;

use refresh_cli::application::ports::RunLogger;
use refresh_cli::infra::config::load_config_from;
use refresh_cli::infra::http::build_client;
use refresh_cli::infra::log_sink::IngestLogger;
use refresh_common::RefreshConfig;
use tokio::net::TcpListener;

use crate::fake_api::{FakeApi, WORKSPACE};

fn config(logdna_url: &str) -> RefreshConfig {
    load_config_from(
        [
            ("IBMCLOUD_API_KEY", "api-key"),
            ("WORKSPACE_ID", WORKSPACE),
            ("LOGDNA_INGESTION_KEY", "ingest-key"),
            ("LOGDNA_URL", logdna_url),
            ("LOGDNA_HOSTNAME", "runner-3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string())),
    )
    .expect("config")
}

#[tokio::test]
async fn test_lines_are_shipped_with_app_tag_and_level() {
    let api = FakeApi::start("ACTIVE").await;
    let logger = IngestLogger::new(
        build_client().expect("client"),
        &config(&format!("{}/logs/ingest", api.base_url)),
    );

    logger.info("Starting hardware refresh.").await;
    logger.error("Destroy operation FAILED").await;
    logger.flush().await;

    let ingested = api.state.ingested.lock().expect("lock").clone();
    assert!(!ingested.is_empty());

    let (query, _, auth) = &ingested[0];
    assert_eq!(query.get("hostname").map(String::as_str), Some("runner-3"));
    assert!(query.contains_key("now"));
    assert!(auth.as_deref().is_some_and(|a| a.starts_with("Basic ")));

    // Lines may arrive in one batch or several; order is preserved.
    let lines: Vec<serde_json::Value> = ingested
        .iter()
        .flat_map(|(_, body, _)| body["lines"].as_array().cloned().unwrap_or_default())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["line"], "Starting hardware refresh.");
    assert_eq!(lines[0]["app"], "schematics-refresh");
    assert_eq!(lines[0]["level"], "INFO");
    assert_eq!(lines[0]["meta"]["workspace_id"], WORKSPACE);
    assert_eq!(lines[1]["level"], "ERROR");
}

#[tokio::test]
async fn test_unreachable_sink_does_not_fail_the_run() {
    let logger = IngestLogger::new(
        build_client().expect("client"),
        &config("http://127.0.0.1:9/logs/ingest"),
    );
    logger.info("nobody is listening").await;
    logger.error("still nobody").await;
    logger.flush().await;
}

#[tokio::test]
async fn test_silent_sink_does_not_stall_logging() {
    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let logger = IngestLogger::new(
        build_client().expect("client"),
        &config(&format!("http://{addr}/logs/ingest")),
    );

    let logged = tokio::time::timeout(Duration::from_secs(1), async {
        logger.info("Destroying workspace resources").await;
        logger.error("Destroy operation FAILED").await;
    })
    .await;
    assert!(logged.is_ok(), "logging waited on the sink");

    let flushed = tokio::time::timeout(Duration::from_secs(15), logger.flush()).await;
    assert!(flushed.is_ok(), "flush did not give up on the sink");
}
