//! Helpers for turning flat caller fields into nested mutation payloads.

use crate::domain::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Insert `key` when a value was supplied.
pub(crate) fn put_str(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value.clone()));
    }
}

/// Insert a nested object when it has at least one key.
pub(crate) fn put_object(map: &mut Map<String, Value>, key: &str, nested: Map<String, Value>) {
    if !nested.is_empty() {
        map.insert(key.to_string(), Value::Object(nested));
    }
}

/// `{ primaryLinkUrl: url }` for link-typed fields.
pub(crate) fn link(url: &str) -> Value {
    let mut nested = Map::new();
    nested.insert("primaryLinkUrl".into(), Value::String(url.to_string()));
    Value::Object(nested)
}

/// Reject values that are neither RFC 3339 timestamps nor `YYYY-MM-DD` dates.
pub fn validate_date(field: &str, value: &str) -> Result<(), ValidationError> {
    let parses = chrono::DateTime::parse_from_rfc3339(value).is_ok()
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if parses {
        Ok(())
    } else {
        Err(ValidationError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// A caller-named field whose schema name is resolved at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValue {
    /// Field name as typed by the caller (`instagram`)
    pub field_name: String,

    /// Value to store
    pub field_value: Value,
}
