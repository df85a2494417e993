use crate::domain::RecordId;
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::matching::UnifiedFinder;
use crate::models::Record;
use crate::repositories::{RecordRepository, SchemaRepository};
use crate::resolution::FieldResolver;
use std::sync::Arc;

/// Repositories and lookup helpers shared by every service.
#[derive(Clone)]
pub struct Backend {
    pub records: Arc<dyn RecordRepository>,
    pub resolver: FieldResolver,
    pub finder: UnifiedFinder,

    /// Page size for list operations
    pub list_limit: usize,
}

impl Backend {
    /// Wire a backend from its repositories.
    ///
    /// # Arguments
    /// * `records` - Record repository for the configured transport
    /// * `schema` - Schema repository used for field resolution
    /// * `search_limit` - Page size for finder queries
    /// * `list_limit` - Page size for list operations
    pub fn new(
        records: Arc<dyn RecordRepository>,
        schema: Arc<dyn SchemaRepository>,
        search_limit: usize,
        list_limit: usize,
    ) -> Self {
        let resolver = FieldResolver::new(schema);
        let finder = UnifiedFinder::new(records.clone(), resolver.clone(), search_limit);
        Self {
            records,
            resolver,
            finder,
            list_limit,
        }
    }
}

/// Id of a record fetched from the backend.
pub(crate) fn id_of(record: &Record) -> TwentyApiResult<RecordId> {
    let id = record
        .id()
        .ok_or_else(|| TwentyApiError::Other("record has no id".into()))?;
    Ok(RecordId::new(id)?)
}
