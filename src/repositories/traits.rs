use crate::domain::RecordId;
use crate::error::TwentyApiResult;
use crate::filter::Filter;
use crate::graphql::OrderBy;
use crate::models::{EntityKind, Record, RecordPage};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A collection query against one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Option<Filter>,
    pub limit: usize,
    pub order_by: Option<OrderBy>,

    /// Fetch related records alongside each match
    pub include_related: bool,
}

impl FindQuery {
    pub fn new(filter: Option<Filter>, limit: usize) -> Self {
        Self {
            filter,
            limit,
            order_by: None,
            include_related: false,
        }
    }

    pub fn with_order_by(mut self, order_by: Option<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_related(mut self, include_related: bool) -> Self {
        self.include_related = include_related;
        self
    }
}

/// Repository for Twenty records.
///
/// Provides abstraction over the API surface used to read and write
/// records, enabling different implementations (GraphQL, REST, mock).
/// Implementations validate id-bearing payload fields before sending.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Run a collection query. Records keep backend order.
    async fn find(&self, kind: EntityKind, query: &FindQuery) -> TwentyApiResult<RecordPage>;

    /// Retrieve a single record; `None` when it does not exist.
    async fn get(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<Option<Record>>;

    /// Create a record from a nested payload.
    async fn create(&self, kind: EntityKind, data: &Map<String, Value>) -> TwentyApiResult<Record>;

    /// Apply a patch to an existing record.
    async fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        data: &Map<String, Value>,
    ) -> TwentyApiResult<Record>;

    /// Delete a record, returning the deleted id.
    async fn delete(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<String>;
}

/// Read-only access to the remote schema.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Field names of a GraphQL object type; `None` if the type is unknown.
    async fn field_names(&self, type_name: &str) -> TwentyApiResult<Option<Vec<String>>>;
}
