//! RecordId value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("static UUID pattern compiles")
});

/// Payload keys that always hold a record id.
const REFERENCE_FIELDS: &[&str] = &[
    "companyId",
    "personId",
    "opportunityId",
    "accountOwnerId",
    "workspaceMemberId",
    "authorId",
    "pointOfContactId",
    "assigneeId",
    "noteId",
    "taskId",
];

/// A type-safe wrapper for Twenty record ids.
///
/// Ids are hyphenated 8-4-4-4-12 hex UUIDs with a version nibble of 1-5 and
/// a variant nibble of 8-b. Anything else is rejected at construction time
/// so malformed ids never reach the backend.
///
/// # Example
///
/// ```
/// use twenty_sync::domain::RecordId;
///
/// let id = RecordId::new("123e4567-e89b-12d3-a456-426614174000").unwrap();
/// assert_eq!(id.as_str(), "123e4567-e89b-12d3-a456-426614174000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new RecordId, validating the UUID format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidUuid` if the value is not a UUID.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        Self::for_field(id, "id")
    }

    /// Like [`RecordId::new`], naming `field` in the error.
    pub fn for_field(id: impl Into<String>, field: &str) -> Result<Self, ValidationError> {
        let id = id.into();
        if !is_valid_uuid(&id) {
            return Err(ValidationError::InvalidUuid {
                field: field.to_string(),
                value: id,
            });
        }
        Ok(Self(id))
    }

    /// Generate a fresh random (v4) id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Whether `value` matches the canonical UUID shape accepted by Twenty.
pub fn is_valid_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Validate the id-bearing fields of a mutation payload.
///
/// When `require_id` is set and the payload has no `id`, a fresh one is
/// generated. Present ids and reference fields must be valid UUIDs.
pub fn prepare_payload(
    payload: &Map<String, Value>,
    require_id: bool,
) -> Result<Map<String, Value>, ValidationError> {
    let mut prepared = payload.clone();

    match prepared.get("id") {
        Some(Value::String(id)) => {
            RecordId::new(id.as_str())?;
        }
        Some(other) => {
            return Err(ValidationError::InvalidUuid {
                field: "id".into(),
                value: other.to_string(),
            })
        }
        None if require_id => {
            prepared.insert("id".into(), Value::String(RecordId::generate().into_inner()));
        }
        None => {}
    }

    for field in REFERENCE_FIELDS {
        match prepared.get(*field) {
            Some(Value::String(value)) => {
                RecordId::for_field(value.as_str(), field)?;
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(ValidationError::InvalidUuid {
                    field: field.to_string(),
                    value: other.to_string(),
                })
            }
        }
    }

    Ok(prepared)
}

// Serde support - serialize as string
impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
