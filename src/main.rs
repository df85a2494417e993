//! Twenty Sync - Main entry point
//!
//! Reads a JSON array of `{resource, operation, params}` items from a file
//! (first argument) or stdin, runs them against the configured Twenty
//! instance and prints the array of results to stdout.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twenty_sync::client::{AsyncTwentyClient, AsyncTwentyClientImpl};
use twenty_sync::repositories::{
    GraphqlRecordRepository, GraphqlSchemaRepository, RecordRepository, RestRecordRepository,
    SchemaRepository,
};
use twenty_sync::{Backend, BatchExecutor, BatchRequest, Config, Transport, TwentyClient};

async fn read_input() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => {
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path))
        }
        _ => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("error"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Using Twenty API at {} over {:?}",
        config.twenty_api_url, config.transport
    );

    let requests: Vec<BatchRequest> =
        serde_json::from_str(&read_input().await?).context("Input must be a JSON array of items")?;

    let sync_client = TwentyClient::new(&config);
    let metrics = sync_client.metrics().clone();
    let client = Arc::new(AsyncTwentyClientImpl::new(sync_client)) as Arc<dyn AsyncTwentyClient>;

    let records: Arc<dyn RecordRepository> = match config.transport {
        Transport::Graphql => Arc::new(GraphqlRecordRepository::new(client.clone(), metrics.clone())),
        Transport::Rest => Arc::new(RestRecordRepository::new(client.clone(), metrics.clone())),
    };
    let schema = Arc::new(GraphqlSchemaRepository::new(client)) as Arc<dyn SchemaRepository>;

    let backend = Backend::new(records, schema, config.search_limit, config.list_limit);
    let executor = BatchExecutor::new(backend, config.continue_on_fail);

    info!("Running {} item(s)", requests.len());
    let outputs = executor.run(requests).await?;

    println!("{}", serde_json::to_string_pretty(&outputs)?);

    let summary = metrics.summary();
    info!(
        "HTTP requests: {} ({} errors, avg {:.1} ms), records fetched: {}, created: {}, updated: {}, deleted: {}",
        summary.http_requests_total,
        summary.http_errors_total,
        summary.http_duration_avg_ms,
        summary.records_fetched_total,
        summary.records_created_total,
        summary.records_updated_total,
        summary.records_deleted_total,
    );

    Ok(())
}
