//! Twenty Sync - record lookup, reconciliation and batch operations for Twenty CRM.
//!
//! This library finds, creates, updates and deletes people, companies,
//! opportunities, notes and tasks in a Twenty workspace. Lookups return a
//! confidence score so callers can refuse to modify records that were not
//! matched exactly.
//!
//! # Architecture
//!
//! - **models**: Entity kinds, generic records and typed input fields
//! - **domain**: Validated value types (emails, domains, record ids)
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the Twenty GraphQL and REST APIs
//! - **filter** / **graphql**: Filter, ordering and document builders
//! - **repositories**: Record and schema access over either transport
//! - **resolution**: Custom field name resolution against the schema
//! - **matching**: Search criteria, confidence scoring and the unified finder
//! - **services**: Per-entity operations
//! - **batch**: Resource/operation dispatch over a list of items

pub mod batch;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod graphql;
pub mod matching;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod resolution;
pub mod services;

pub use batch::{BatchExecutor, BatchRequest, Operation};
pub use client::TwentyClient;
pub use config::{Config, Transport};
pub use domain::ValidationError;
pub use error::{ConfigError, TwentyApiError, TwentyApiResult};
pub use filter::Filter;
pub use matching::{Confidence, MatchResult, NaturalKey, SearchCriterion, SearchMethod, UnifiedFinder};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{EntityKind, Record, RecordPage};
pub use services::Backend;
