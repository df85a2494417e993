use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use twenty_sync::domain::RecordId;
use twenty_sync::error::{TwentyApiError, TwentyApiResult};
use twenty_sync::filter::Filter;
use twenty_sync::models::{EntityKind, Record, RecordPage};
use twenty_sync::repositories::{FindQuery, RecordRepository};

/// Mock record repository for testing.
///
/// Keeps records per entity kind in insertion order, evaluates filters the
/// way the backend would and tracks method calls for verification.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockRecordRepository {
    records: Arc<Mutex<HashMap<EntityKind, Vec<Record>>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    last_query: Arc<Mutex<Option<FindQuery>>>,
    fail_creates_for: Arc<Mutex<Vec<EntityKind>>>,
}

#[allow(dead_code)]
impl MockRecordRepository {
    /// Create a new empty MockRecordRepository.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            last_query: Arc::new(Mutex::new(None)),
            fail_creates_for: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a record from a JSON object.
    pub fn add(&self, kind: EntityKind, value: Value) {
        let record = Record::from_value(value).expect("record must be a JSON object");
        self.records
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(record);
    }

    /// All stored records of a kind.
    pub fn all(&self, kind: EntityKind) -> Vec<Record> {
        self.records
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.all(kind).len()
    }

    /// Make every create of `kind` fail.
    pub fn fail_creates(&self, kind: EntityKind) {
        self.fail_creates_for.lock().unwrap().push(kind);
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        self.call_counts.lock().unwrap().clear();
    }

    pub fn last_query(&self) -> Option<FindQuery> {
        self.last_query.lock().unwrap().clone()
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    /// Attach the parent note to note targets, as a related-records query would.
    fn with_related(&self, kind: EntityKind, record: Record) -> Record {
        if kind != EntityKind::NoteTarget {
            return record;
        }
        let Some(note_id) = record.get_str("noteId").map(str::to_string) else {
            return record;
        };
        let note = self
            .all(EntityKind::Note)
            .into_iter()
            .find(|n| n.id() == Some(note_id.as_str()));
        let mut fields = record.fields().clone();
        if let Some(note) = note {
            fields.insert("note".into(), note.into_value());
        }
        Record::new(fields)
    }
}

impl Default for MockRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// SQL `LIKE`: `%` and `_` are wildcards anywhere, `\` escapes the next
/// character.
fn like(stored: &str, pattern: &str, case_insensitive: bool) -> bool {
    let mut source = String::from(if case_insensitive { "(?is)^" } else { "(?s)^" });
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    source.push_str(&regex::escape(&escaped.to_string()));
                }
            }
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source)
        .map(|re| re.is_match(stored))
        .unwrap_or(false)
}

fn matches(record: &Record, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { path, value } => record.get_str(path) == Some(value.as_str()),
        Filter::ILike { path, pattern } => record
            .get_str(path)
            .map(|s| like(s, pattern, true))
            .unwrap_or(false),
        Filter::Like { path, pattern } => record
            .get_str(path)
            .map(|s| like(s, pattern, false))
            .unwrap_or(false),
        Filter::Or(children) => children.iter().any(|f| matches(record, f)),
        Filter::And(children) => children.iter().all(|f| matches(record, f)),
    }
}

#[async_trait]
impl RecordRepository for MockRecordRepository {
    async fn find(&self, kind: EntityKind, query: &FindQuery) -> TwentyApiResult<RecordPage> {
        self.track_call("find");
        *self.last_query.lock().unwrap() = Some(query.clone());

        let hits: Vec<Record> = self
            .all(kind)
            .into_iter()
            .filter(|r| query.filter.as_ref().map(|f| matches(r, f)).unwrap_or(true))
            .collect();
        let total_count = hits.len();
        let records: Vec<Record> = hits
            .into_iter()
            .take(query.limit)
            .map(|r| {
                if query.include_related {
                    self.with_related(kind, r)
                } else {
                    r
                }
            })
            .collect();

        Ok(RecordPage {
            has_next_page: total_count > records.len(),
            total_count,
            records,
        })
    }

    async fn get(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<Option<Record>> {
        self.track_call("get");
        Ok(self
            .all(kind)
            .into_iter()
            .find(|r| r.id() == Some(id.as_str())))
    }

    async fn create(&self, kind: EntityKind, data: &Map<String, Value>) -> TwentyApiResult<Record> {
        self.track_call("create");
        if self.fail_creates_for.lock().unwrap().contains(&kind) {
            return Err(TwentyApiError::ApiError {
                status: 400,
                message: format!("cannot create {}", kind.singular()),
            });
        }

        let mut fields = data.clone();
        fields.insert(
            "id".into(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
        let record = Record::new(fields);
        self.records
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        data: &Map<String, Value>,
    ) -> TwentyApiResult<Record> {
        self.track_call("update");
        let mut store = self.records.lock().unwrap();
        let records = store.entry(kind).or_default();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == Some(id.as_str()))
            .ok_or_else(|| TwentyApiError::NotFound(id.to_string()))?;

        let mut fields = slot.fields().clone();
        for (key, value) in data {
            fields.insert(key.clone(), value.clone());
        }
        *slot = Record::new(fields);
        Ok(slot.clone())
    }

    async fn delete(&self, kind: EntityKind, id: &RecordId) -> TwentyApiResult<String> {
        self.track_call("delete");
        let mut store = self.records.lock().unwrap();
        let records = store.entry(kind).or_default();
        let before = records.len();
        records.retain(|r| r.id() != Some(id.as_str()));
        if records.len() == before {
            return Err(TwentyApiError::NotFound(id.to_string()));
        }
        Ok(id.to_string())
    }
}
