//! Serializable operation results.
//!
//! Find, create, update and delete results share one shape across entity
//! kinds; only the key the record sits under changes (`person`,
//! `originalCompany`, `opportunityId`). [`Keyed`] carries that key.

use super::reconciler::{ReconcileAction, Reconciled};
use crate::matching::{Confidence, MatchResult, SearchCriterion, SearchMethod};
use crate::models::{EntityKind, Record};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A value serialized as a one-entry map, for flattening under a
/// kind-dependent key.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub key: String,
    pub value: T,
}

impl<T> Keyed<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl<T: Serialize> Serialize for Keyed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

/// `originalPerson`, `originalCompany`, ...
fn original_key(kind: EntityKind) -> String {
    let singular = kind.singular();
    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => format!("original{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "original".into(),
    }
}

/// `personId`, `companyId`, ...
fn id_key(kind: EntityKind) -> String {
    format!("{}Id", kind.singular())
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOutput {
    pub found: bool,
    #[serde(flatten)]
    pub record: Keyed<Option<Record>>,
    pub confidence: Confidence,
    pub record_id: Option<String>,
    pub search_method: SearchMethod,
    pub search_value: String,
    pub total_matches: usize,
    pub message: String,
}

impl FindOutput {
    pub fn new(kind: EntityKind, criterion: &SearchCriterion, result: MatchResult) -> Self {
        let message = match &result.record {
            Some(record) => format!("{} found: {}", kind.label(), record.display_name()),
            None => format!(
                "No {} found with {}: {}",
                kind.singular(),
                criterion.method,
                criterion.value
            ),
        };
        Self {
            found: result.found,
            record_id: result.record_id().map(str::to_string),
            record: Keyed::new(kind.singular(), result.record),
            confidence: result.confidence,
            search_method: criterion.method,
            search_value: criterion.value.clone(),
            total_matches: result.total_matches,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutput {
    pub created: bool,
    pub action: ReconcileAction,
    #[serde(flatten)]
    pub record: Keyed<Record>,
    pub confidence: Confidence,
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_by: Option<&'static str>,
    pub message: String,
}

impl CreateOutput {
    /// `label` names the record in the message (`Jane Doe`, `Acme`).
    pub fn new(kind: EntityKind, label: &str, reconciled: Reconciled) -> Self {
        let created = reconciled.action == ReconcileAction::Created;
        let message = if created {
            format!("{} created: {}", kind.label(), label)
        } else {
            format!("{} already exists: {}", kind.label(), label)
        };
        Self {
            created,
            action: reconciled.action,
            record_id: reconciled.record.id().map(str::to_string),
            record: Keyed::new(kind.singular(), reconciled.record),
            confidence: reconciled.confidence,
            found_by: reconciled.found_by,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutput {
    pub updated: bool,
    #[serde(flatten)]
    pub record: Keyed<Option<Record>>,
    #[serde(flatten)]
    pub original: Keyed<Option<Record>>,
    pub search_method: SearchMethod,
    pub search_value: String,
    pub confidence: Confidence,
    pub record_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateOutput {
    pub fn updated(
        kind: EntityKind,
        criterion: &SearchCriterion,
        original: Record,
        confidence: Confidence,
        record: Record,
    ) -> Self {
        Self {
            updated: true,
            record_id: record.id().map(str::to_string),
            record: Keyed::new(kind.singular(), Some(record)),
            original: Keyed::new(original_key(kind), Some(original)),
            search_method: criterion.method,
            search_value: criterion.value.clone(),
            confidence,
            message: format!("{} updated: {}", kind.label(), criterion.value),
            error: None,
        }
    }

    /// Soft failure: nothing was sent to the backend.
    pub fn skipped(
        kind: EntityKind,
        criterion: &SearchCriterion,
        confidence: Confidence,
        error: &str,
    ) -> Self {
        Self {
            updated: false,
            record: Keyed::new(kind.singular(), None),
            original: Keyed::new(original_key(kind), None),
            search_method: criterion.method,
            search_value: criterion.value.clone(),
            confidence,
            record_id: None,
            message: format!(
                "{} not found with {}: {}",
                kind.label(),
                criterion.method,
                criterion.value
            ),
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutput {
    pub deleted: bool,
    #[serde(flatten)]
    pub id: Keyed<Option<String>>,
    pub search_method: SearchMethod,
    pub search_value: String,
    pub confidence: Confidence,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteOutput {
    pub fn deleted(
        kind: EntityKind,
        criterion: &SearchCriterion,
        confidence: Confidence,
        id: String,
    ) -> Self {
        Self {
            deleted: true,
            id: Keyed::new(id_key(kind), Some(id)),
            search_method: criterion.method,
            search_value: criterion.value.clone(),
            confidence,
            message: format!("{} deleted: {}", kind.label(), criterion.value),
            error: None,
        }
    }

    /// Soft failure: nothing was sent to the backend.
    pub fn skipped(
        kind: EntityKind,
        criterion: &SearchCriterion,
        confidence: Confidence,
        error: &str,
    ) -> Self {
        Self {
            deleted: false,
            id: Keyed::new(id_key(kind), None),
            search_method: criterion.method,
            search_value: criterion.value.clone(),
            confidence,
            message: format!(
                "{} not found with {}: {}",
                kind.label(),
                criterion.method,
                criterion.value
            ),
            error: Some(error.to_string()),
        }
    }
}
