use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use twenty_sync::error::{TwentyApiError, TwentyApiResult};
use twenty_sync::repositories::SchemaRepository;

/// Mock schema repository: field names per GraphQL type, or a failing
/// introspection endpoint.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockSchemaRepository {
    types: Arc<Mutex<HashMap<String, Vec<String>>>>,
    failing: bool,
}

#[allow(dead_code)]
impl MockSchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema whose introspection always fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_fields(self, type_name: &str, fields: &[&str]) -> Self {
        self.types.lock().unwrap().insert(
            type_name.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl SchemaRepository for MockSchemaRepository {
    async fn field_names(&self, type_name: &str) -> TwentyApiResult<Option<Vec<String>>> {
        if self.failing {
            return Err(TwentyApiError::Timeout);
        }
        Ok(self.types.lock().unwrap().get(type_name).cloned())
    }
}
