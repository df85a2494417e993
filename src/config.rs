//! Configuration management for the Twenty sync runner.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is honored when present; nothing is printed to stdout, which
//! carries the batch results.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::str::FromStr;

/// Which Twenty API surface requests go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Graphql,
    Rest,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graphql" => Ok(Self::Graphql),
            "rest" => Ok(Self::Rest),
            other => Err(ConfigError::InvalidValue {
                var: "TWENTY_TRANSPORT".to_string(),
                reason: format!("Must be \"graphql\" or \"rest\", got: {}", other),
            }),
        }
    }
}

/// Configuration for the Twenty sync runner.
#[derive(Debug, Clone)]
pub struct Config {
    /// Twenty instance base URL (`https://crm.example.com`)
    pub twenty_api_url: String,

    /// Twenty API key, sent as a bearer token
    pub twenty_api_key: String,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout: u64,

    /// Page size for finder queries (default: 50)
    pub search_limit: usize,

    /// Page size for list operations (default: 100)
    pub list_limit: usize,

    /// API surface for record operations (default: GraphQL)
    pub transport: Transport,

    /// Capture per-item errors instead of aborting the batch (default: false)
    pub continue_on_fail: bool,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TWENTY_API_URL`: Base URL of the Twenty instance
    /// - `TWENTY_API_KEY`: API key for authentication
    ///
    /// Optional environment variables:
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 30)
    /// - `SEARCH_LIMIT`: Finder page size (default: 50)
    /// - `LIST_LIMIT`: List page size (default: 100)
    /// - `TWENTY_TRANSPORT`: `graphql` or `rest` (default: graphql)
    /// - `CONTINUE_ON_FAIL`: Keep going past failed items (default: false)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Missing .env is fine; dotenvy does not print to stdout
        let _ = dotenvy::dotenv();

        let twenty_api_url = env::var("TWENTY_API_URL")
            .map_err(|_| ConfigError::MissingVar("TWENTY_API_URL".to_string()))?;

        let twenty_api_key = env::var("TWENTY_API_KEY")
            .map_err(|_| ConfigError::MissingVar("TWENTY_API_KEY".to_string()))?;

        if !twenty_api_url.starts_with("http://") && !twenty_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "TWENTY_API_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if twenty_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "TWENTY_API_KEY".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 30)?;
        let search_limit = Self::parse_env_usize("SEARCH_LIMIT", 50)?;
        let list_limit = Self::parse_env_usize("LIST_LIMIT", 100)?;

        if search_limit == 0 || list_limit == 0 {
            return Err(ConfigError::InvalidValue {
                var: if search_limit == 0 { "SEARCH_LIMIT" } else { "LIST_LIMIT" }.to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let transport = match env::var("TWENTY_TRANSPORT") {
            Ok(val) => val.parse()?,
            Err(_) => Transport::default(),
        };

        let continue_on_fail = Self::parse_env_bool("CONTINUE_ON_FAIL", false)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            twenty_api_url,
            twenty_api_key,
            request_timeout,
            search_limit,
            list_limit,
            transport,
            continue_on_fail,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a boolean flag.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" | "" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            twenty_api_url: String::new(),
            twenty_api_key: String::new(),
            request_timeout: 30,
            search_limit: 50,
            list_limit: 100,
            transport: Transport::Graphql,
            continue_on_fail: false,
            log_level: "error".to_string(),
        }
    }
}
