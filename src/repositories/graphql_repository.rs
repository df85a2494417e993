use crate::client::AsyncTwentyClient;
use crate::domain::{prepare_payload, RecordId};
use crate::error::{ResultExt, TwentyApiResult};
use crate::graphql::{self, mutation_key};
use crate::metrics::Metrics;
use crate::models::{EntityKind, Record, RecordPage};
use crate::repositories::response::{expect_id, expect_record, optional_record, page_from_connection};
use crate::repositories::traits::{FindQuery, RecordRepository};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Record repository backed by the Twenty GraphQL API.
///
/// Queries and mutations are built by [`crate::graphql`]; this type sends
/// them through the async client and shapes the `data` object into records.
pub struct GraphqlRecordRepository {
    client: Arc<dyn AsyncTwentyClient>,
    metrics: Metrics,
}

impl GraphqlRecordRepository {
    pub fn new(client: Arc<dyn AsyncTwentyClient>, metrics: Metrics) -> Self {
        Self { client, metrics }
    }
}

#[async_trait]
impl RecordRepository for GraphqlRecordRepository {
    async fn find(&self, kind: EntityKind, query: &FindQuery) -> TwentyApiResult<RecordPage> {
        let document = graphql::find_query(kind, query.include_related);
        let variables = json!({
            "filter": query.filter.as_ref().map(|f| f.to_graphql()).unwrap_or_else(|| json!({})),
            "first": query.limit,
            "orderBy": query.order_by.as_ref().map(|o| o.to_graphql()),
        });

        let data = self
            .client
            .graphql(&document, variables)
            .await
            .context(&format!("search {}", kind.plural()))?;

        let connection = data.get(kind.plural()).cloned().unwrap_or(Value::Null);
        let page = page_from_connection(&connection)?;
        self.metrics.record_records_fetched(page.records.len());
        Ok(page)
    }

    async fn get(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<Option<Record>> {
        let variables = json!({ "filter": { "id": { "eq": id.as_str() } } });
        let data = self
            .client
            .graphql(&graphql::get_query(kind), variables)
            .await
            .context(&format!("get {}", kind.singular()))?;

        let record = optional_record(&data, kind.singular());
        if record.is_some() {
            self.metrics.record_records_fetched(1);
        }
        Ok(record)
    }

    async fn create(&self, kind: EntityKind, data: &Map<String, Value>) -> TwentyApiResult<Record> {
        let payload = prepare_payload(data, false)?;
        let response = self
            .client
            .graphql(&graphql::create_mutation(kind), json!({ "data": payload }))
            .await
            .context(&format!("create {}", kind.singular()))?;

        let record = expect_record(&response, &mutation_key("create", kind))?;
        self.metrics.record_created();
        tracing::info!("Created {} {}", kind, record.id().unwrap_or_default());
        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        data: &Map<String, Value>,
    ) -> TwentyApiResult<Record> {
        let payload = prepare_payload(data, false)?;
        let response = self
            .client
            .graphql(
                &graphql::update_mutation(kind),
                json!({ "id": id.as_str(), "data": payload }),
            )
            .await
            .context(&format!("update {}", kind.singular()))?;

        let record = expect_record(&response, &mutation_key("update", kind))?;
        self.metrics.record_updated();
        tracing::info!("Updated {} {}", kind, id);
        Ok(record)
    }

    async fn delete(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<String> {
        let response = self
            .client
            .graphql(&graphql::delete_mutation(kind), json!({ "id": id.as_str() }))
            .await
            .context(&format!("delete {}", kind.singular()))?;

        let deleted = expect_id(&response, &mutation_key("delete", kind))?;
        self.metrics.record_deleted();
        tracing::info!("Deleted {} {}", kind, deleted);
        Ok(deleted)
    }
}
