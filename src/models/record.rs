//! Opaque CRM records.
//!
//! Records are owned by the remote CRM. The crate reads fields out of them
//! and builds patches, but never edits a fetched record in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record returned by the backend, kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from any JSON value; non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The record id, if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Look up a dot-delimited path (`emails.primaryEmail`).
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Like [`Record::get_path`] for string values.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(Value::as_str)
    }

    /// Raw field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// "First Last" for people, the name/title field for everything else.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.0.get("name") {
            if let Some(name) = name.as_str() {
                return name.to_string();
            }
            let first = name.get("firstName").and_then(Value::as_str).unwrap_or("");
            let last = name.get("lastName").and_then(Value::as_str).unwrap_or("");
            return format!("{} {}", first, last).trim().to_string();
        }
        self.get_str("title").unwrap_or_default().to_string()
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// One page of records from a collection query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    /// Records in backend order
    pub records: Vec<Record>,

    /// Total matches reported by the backend (falls back to page length)
    pub total_count: usize,

    /// Whether the backend has more results
    pub has_next_page: bool,
}

impl RecordPage {
    /// Page whose total is its own length.
    pub fn from_records(records: Vec<Record>) -> Self {
        let total_count = records.len();
        Self {
            records,
            total_count,
            has_next_page: false,
        }
    }
}
