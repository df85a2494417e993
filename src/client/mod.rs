//! HTTP client for the Twenty CRM API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles bearer authentication, error
//! mapping and GraphQL error extraction. Both the GraphQL endpoint and the legacy REST
//! endpoints are exposed; callers decide how responses are shaped into records.

mod async_wrapper;
pub use async_wrapper::{AsyncTwentyClient, AsyncTwentyClientImpl};

use crate::config::Config;
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::metrics::{HttpTimer, Metrics};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Query parameters for a REST collection request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestListParams {
    /// Bracket-syntax filter (`name[ilike]:"%acme%"`)
    pub filter: Option<String>,

    /// Page size
    pub limit: usize,

    /// `field[Direction]`
    pub order_by: Option<String>,
}

/// HTTP client for the Twenty CRM API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct TwentyClient {
    /// Base URL of the Twenty instance
    base_url: String,

    /// API key for authentication
    api_key: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl TwentyClient {
    /// Create a new TwentyClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.twenty_api_url.clone(),
            api_key: config.twenty_api_key.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a TwentyClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute an authenticated request, with a JSON body when one is given.
    fn send(&self, method: &str, path: &str, body: Option<&Value>) -> TwentyApiResult<Value> {
        let url = self.build_url(path);
        let timer = HttpTimer::new(self.metrics.clone());

        tracing::debug!("{} {}", method, url);
        if let Some(body) = body {
            tracing::debug!(
                "Request body: {}",
                serde_json::to_string_pretty(body).unwrap_or_else(|_| "<invalid json>".to_string())
            );
        }

        let request = self
            .agent
            .request(method, &url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json");

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        }
        .map_err(|e| self.map_error(e));

        match result {
            Ok(response) => {
                tracing::debug!("{} {} - Success (status: {})", method, url, response.status());
                timer.complete();
                let text = response
                    .into_string()
                    .map_err(|e| TwentyApiError::HttpError(e.to_string()))?;
                if text.trim().is_empty() {
                    return Ok(Value::Null);
                }
                Ok(serde_json::from_str(&text)?)
            }
            Err(e) => {
                tracing::error!("{} {} - Error: {:?}", method, url, e);
                timer.complete_with_error();
                Err(e)
            }
        }
    }

    /// Map a ureq error to a TwentyApiError.
    fn map_error(&self, error: ureq::Error) -> TwentyApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 => TwentyApiError::Unauthorized,
                    404 => TwentyApiError::NotFound(message),
                    429 => TwentyApiError::RateLimitExceeded,
                    _ => TwentyApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    TwentyApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    TwentyApiError::Timeout
                } else {
                    TwentyApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    // ========================= GraphQL =========================

    /// Run a GraphQL document and return its `data` object.
    ///
    /// A non-empty top-level `errors` array is an error even on HTTP 200.
    /// Twenty also answers invalid documents with HTTP 400 and the same
    /// `errors` body, which is reported the same way.
    pub fn graphql(&self, query: &str, variables: Value) -> TwentyApiResult<Value> {
        let body = json!({ "query": query, "variables": variables });

        let response = match self.send("POST", "/graphql", Some(&body)) {
            Ok(response) => response,
            Err(TwentyApiError::ApiError { status, message }) => {
                return match serde_json::from_str::<Value>(&message)
                    .ok()
                    .and_then(|v| graphql_errors(&v))
                {
                    Some(errors) => {
                        self.metrics.record_graphql_error();
                        Err(TwentyApiError::GraphqlError(errors))
                    }
                    None => Err(TwentyApiError::ApiError { status, message }),
                };
            }
            Err(e) => return Err(e),
        };

        if let Some(errors) = graphql_errors(&response) {
            self.metrics.record_graphql_error();
            tracing::warn!("GraphQL errors: {}", errors.join("; "));
            return Err(TwentyApiError::GraphqlError(errors));
        }

        match response.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(TwentyApiError::Other(
                "GraphQL response has no data".to_string(),
            )),
        }
    }

    // ========================= REST =========================

    /// `GET /rest/<plural>` with optional filter and ordering.
    pub fn rest_list(&self, plural: &str, params: &RestListParams) -> TwentyApiResult<Value> {
        let mut path = format!("/rest/{}?limit={}", plural, params.limit);
        if let Some(filter) = &params.filter {
            path.push_str(&format!("&filter={}", urlencoding::encode(filter)));
        }
        if let Some(order_by) = &params.order_by {
            path.push_str(&format!("&order_by={}", urlencoding::encode(order_by)));
        }
        self.send("GET", &path, None)
    }

    /// `GET /rest/<plural>/<id>`
    pub fn rest_get(&self, plural: &str, id: &str) -> TwentyApiResult<Value> {
        self.send("GET", &format!("/rest/{}/{}", plural, id), None)
    }

    /// `POST /rest/<plural>`
    pub fn rest_create(&self, plural: &str, body: &Value) -> TwentyApiResult<Value> {
        self.send("POST", &format!("/rest/{}", plural), Some(body))
    }

    /// `PUT /rest/<plural>/<id>`
    pub fn rest_update(&self, plural: &str, id: &str, body: &Value) -> TwentyApiResult<Value> {
        self.send("PUT", &format!("/rest/{}/{}", plural, id), Some(body))
    }

    /// `DELETE /rest/<plural>/<id>`
    pub fn rest_delete(&self, plural: &str, id: &str) -> TwentyApiResult<Value> {
        self.send("DELETE", &format!("/rest/{}/{}", plural, id), None)
    }
}

/// Messages of a non-empty `errors` array, if the response has one.
fn graphql_errors(response: &Value) -> Option<Vec<String>> {
    let errors = response.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string())
            })
            .collect(),
    )
}
