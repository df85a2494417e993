//! Shaping raw API responses into records.

use crate::error::{TwentyApiError, TwentyApiResult};
use crate::models::{Record, RecordPage};
use serde_json::Value;

/// The object at `key`, as a record.
pub(crate) fn expect_record(container: &Value, key: &str) -> TwentyApiResult<Record> {
    container
        .get(key)
        .cloned()
        .and_then(Record::from_value)
        .ok_or_else(|| TwentyApiError::Other(format!("Missing {} in API response", key)))
}

/// The object at `key`; `None` when absent or null.
pub(crate) fn optional_record(container: &Value, key: &str) -> Option<Record> {
    container.get(key).cloned().and_then(Record::from_value)
}

/// The `id` of the object at `key`.
pub(crate) fn expect_id(container: &Value, key: &str) -> TwentyApiResult<String> {
    container
        .get(key)
        .and_then(|v| v.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TwentyApiError::Other(format!("Missing {}.id in API response", key)))
}

/// A GraphQL connection (`totalCount`, `edges[].node`, `pageInfo`).
pub(crate) fn page_from_connection(connection: &Value) -> TwentyApiResult<RecordPage> {
    let edges = connection
        .get("edges")
        .and_then(Value::as_array)
        .ok_or_else(|| TwentyApiError::Other("Missing edges in API response".to_string()))?;

    let records: Vec<Record> = edges
        .iter()
        .filter_map(|edge| edge.get("node").cloned().and_then(Record::from_value))
        .collect();

    Ok(finish_page(records, connection))
}

/// A REST list body (`data.<plural>[]`, `totalCount`, `pageInfo`).
pub(crate) fn page_from_rest(body: &Value, plural: &str) -> TwentyApiResult<RecordPage> {
    let items = body
        .get("data")
        .and_then(|d| d.get(plural))
        .and_then(Value::as_array)
        .ok_or_else(|| TwentyApiError::Other(format!("Missing data.{} in API response", plural)))?;

    let records: Vec<Record> = items.iter().cloned().filter_map(Record::from_value).collect();

    Ok(finish_page(records, body))
}

fn finish_page(records: Vec<Record>, meta: &Value) -> RecordPage {
    let total_count = meta
        .get("totalCount")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(records.len());
    let has_next_page = meta
        .get("pageInfo")
        .and_then(|p| p.get("hasNextPage"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    RecordPage {
        records,
        total_count,
        has_next_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_from_connection_keeps_order() {
        let connection = json!({
            "totalCount": 7,
            "edges": [{"node": {"id": "b"}}, {"node": {"id": "a"}}],
            "pageInfo": {"hasNextPage": true}
        });
        let page = page_from_connection(&connection).unwrap();
        assert_eq!(page.records[0].id(), Some("b"));
        assert_eq!(page.records[1].id(), Some("a"));
        assert_eq!(page.total_count, 7);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_page_from_rest_defaults_total() {
        let body = json!({"data": {"companies": [{"id": "c1"}]}});
        let page = page_from_rest(&body, "companies").unwrap();
        assert_eq!(page.total_count, 1);
        assert!(!page.has_next_page);

        assert!(page_from_rest(&json!({"data": {}}), "companies").is_err());
    }

    #[test]
    fn test_expect_helpers() {
        let data = json!({"createPerson": {"id": "p1"}, "deletePerson": {"id": "p2"}, "person": null});
        assert_eq!(expect_record(&data, "createPerson").unwrap().id(), Some("p1"));
        assert_eq!(expect_id(&data, "deletePerson").unwrap(), "p2");
        assert!(optional_record(&data, "person").is_none());
        assert!(expect_record(&data, "updatePerson").is_err());
    }
}
