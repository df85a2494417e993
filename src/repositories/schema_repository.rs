use crate::client::AsyncTwentyClient;
use crate::error::{ResultExt, TwentyApiResult};
use crate::graphql::TYPE_FIELDS_QUERY;
use crate::repositories::traits::SchemaRepository;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Schema access through GraphQL `__type` introspection.
pub struct GraphqlSchemaRepository {
    client: Arc<dyn AsyncTwentyClient>,
}

impl GraphqlSchemaRepository {
    pub fn new(client: Arc<dyn AsyncTwentyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchemaRepository for GraphqlSchemaRepository {
    async fn field_names(&self, type_name: &str) -> TwentyApiResult<Option<Vec<String>>> {
        let data = self
            .client
            .graphql(TYPE_FIELDS_QUERY, json!({ "name": type_name }))
            .await
            .context(&format!("introspect {}", type_name))?;

        let Some(fields) = data
            .get("__type")
            .filter(|t| !t.is_null())
            .and_then(|t| t.get("fields"))
            .and_then(Value::as_array)
        else {
            return Ok(None);
        };

        Ok(Some(
            fields
                .iter()
                .filter_map(|f| f.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
        ))
    }
}
