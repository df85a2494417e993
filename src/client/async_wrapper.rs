//! Async wrapper around synchronous TwentyClient.
//!
//! This module provides an async interface to the synchronous TwentyClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::{RestListParams, TwentyClient};
use crate::error::{TwentyApiError, TwentyApiResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Async wrapper trait for Twenty API operations.
///
/// This trait provides async versions of the TwentyClient methods,
/// internally using `tokio::task::spawn_blocking` to avoid
/// blocking the async runtime with synchronous HTTP calls.
#[async_trait]
pub trait AsyncTwentyClient: Send + Sync {
    async fn graphql(&self, query: &str, variables: Value) -> TwentyApiResult<Value>;

    async fn rest_list(&self, plural: &str, params: &RestListParams) -> TwentyApiResult<Value>;
    async fn rest_get(&self, plural: &str, id: &str) -> TwentyApiResult<Value>;
    async fn rest_create(&self, plural: &str, body: &Value) -> TwentyApiResult<Value>;
    async fn rest_update(&self, plural: &str, id: &str, body: &Value) -> TwentyApiResult<Value>;
    async fn rest_delete(&self, plural: &str, id: &str) -> TwentyApiResult<Value>;
}

/// Async wrapper around synchronous TwentyClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncTwentyClientImpl {
    client: Arc<TwentyClient>,
}

impl AsyncTwentyClientImpl {
    pub fn new(client: TwentyClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// The wrapped client's metrics.
    pub fn metrics(&self) -> &crate::metrics::Metrics {
        self.client.metrics()
    }
}

fn join_error(e: tokio::task::JoinError) -> TwentyApiError {
    TwentyApiError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncTwentyClient for AsyncTwentyClientImpl {
    async fn graphql(&self, query: &str, variables: Value) -> TwentyApiResult<Value> {
        let client = self.client.clone();
        let query = query.to_string();

        tokio::task::spawn_blocking(move || client.graphql(&query, variables))
            .await
            .map_err(join_error)?
    }

    async fn rest_list(&self, plural: &str, params: &RestListParams) -> TwentyApiResult<Value> {
        let client = self.client.clone();
        let plural = plural.to_string();
        let params = params.clone();

        tokio::task::spawn_blocking(move || client.rest_list(&plural, &params))
            .await
            .map_err(join_error)?
    }

    async fn rest_get(&self, plural: &str, id: &str) -> TwentyApiResult<Value> {
        let client = self.client.clone();
        let plural = plural.to_string();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.rest_get(&plural, &id))
            .await
            .map_err(join_error)?
    }

    async fn rest_create(&self, plural: &str, body: &Value) -> TwentyApiResult<Value> {
        let client = self.client.clone();
        let plural = plural.to_string();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.rest_create(&plural, &body))
            .await
            .map_err(join_error)?
    }

    async fn rest_update(&self, plural: &str, id: &str, body: &Value) -> TwentyApiResult<Value> {
        let client = self.client.clone();
        let plural = plural.to_string();
        let id = id.to_string();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.rest_update(&plural, &id, &body))
            .await
            .map_err(join_error)?
    }

    async fn rest_delete(&self, plural: &str, id: &str) -> TwentyApiResult<Value> {
        let client = self.client.clone();
        let plural = plural.to_string();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.rest_delete(&plural, &id))
            .await
            .map_err(join_error)?
    }
}
