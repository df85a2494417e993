use crate::client::{AsyncTwentyClient, RestListParams};
use crate::domain::{prepare_payload, RecordId};
use crate::error::{ResultExt, TwentyApiError, TwentyApiResult};
use crate::graphql::mutation_key;
use crate::metrics::Metrics;
use crate::models::{EntityKind, Record, RecordPage};
use crate::repositories::response::{expect_id, expect_record, optional_record, page_from_rest};
use crate::repositories::traits::{FindQuery, RecordRepository};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Record repository backed by the legacy `/rest` endpoints.
///
/// Filters are rendered in bracket syntax. Creates carry a client-generated
/// id, and response bodies are unwrapped from their `data` envelope.
pub struct RestRecordRepository {
    client: Arc<dyn AsyncTwentyClient>,
    metrics: Metrics,
}

impl RestRecordRepository {
    pub fn new(client: Arc<dyn AsyncTwentyClient>, metrics: Metrics) -> Self {
        Self { client, metrics }
    }
}

fn data_of(body: &Value) -> &Value {
    body.get("data").unwrap_or(body)
}

#[async_trait]
impl RecordRepository for RestRecordRepository {
    async fn find(&self, kind: EntityKind, query: &FindQuery) -> TwentyApiResult<RecordPage> {
        let params = RestListParams {
            filter: query.filter.as_ref().map(|f| f.to_rest()),
            limit: query.limit,
            order_by: query.order_by.as_ref().map(|o| o.to_rest()),
        };

        let body = self
            .client
            .rest_list(kind.plural(), &params)
            .await
            .context(&format!("search {}", kind.plural()))?;

        let page = page_from_rest(&body, kind.plural())?;
        self.metrics.record_records_fetched(page.records.len());
        Ok(page)
    }

    async fn get(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<Option<Record>> {
        let body = match self.client.rest_get(kind.plural(), id.as_str()).await {
            Ok(body) => body,
            Err(TwentyApiError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.with_context(format!("get {}", kind.singular()))),
        };

        let record = optional_record(data_of(&body), kind.singular());
        if record.is_some() {
            self.metrics.record_records_fetched(1);
        }
        Ok(record)
    }

    async fn create(&self, kind: EntityKind, data: &Map<String, Value>) -> TwentyApiResult<Record> {
        let payload = prepare_payload(data, true)?;
        let body = self
            .client
            .rest_create(kind.plural(), &Value::Object(payload))
            .await
            .context(&format!("create {}", kind.singular()))?;

        let record = expect_record(data_of(&body), &mutation_key("create", kind))?;
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
        let body = self
            .client
            .rest_update(kind.plural(), id.as_str(), &Value::Object(payload))
            .await
            .context(&format!("update {}", kind.singular()))?;

        let record = expect_record(data_of(&body), &mutation_key("update", kind))?;
        self.metrics.record_updated();
        tracing::info!("Updated {} {}", kind, id);
        Ok(record)
    }

    async fn delete(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<String> {
        let body = self
            .client
            .rest_delete(kind.plural(), id.as_str())
            .await
            .context(&format!("delete {}", kind.singular()))?;

        let deleted = expect_id(data_of(&body), &mutation_key("delete", kind))?;
        self.metrics.record_deleted();
        tracing::info!("Deleted {} {}", kind, deleted);
        Ok(deleted)
    }
}
