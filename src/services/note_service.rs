//! Note service layer.
//!
//! Notes attach to people and companies through note targets. Targets are
//! created one at a time after the note; a failed target is reported, not
//! fatal.

use super::backend::Backend;
use super::params::{DeleteByIdParams, IdParams, ListNotesBy, NoteListParams};
use crate::domain::{RecordId, ValidationError};
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::filter::Filter;
use crate::models::{ActivityTarget, EntityKind, NoteFields, Record};
use crate::repositories::FindQuery;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// A target that could not be attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetError {
    /// 1-based position in the request
    pub target: usize,
    pub target_type: EntityKind,
    pub target_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreated {
    pub success: bool,

    /// The note with a `targets` array of the created join records
    pub note: Value,
    pub note_id: String,
    pub target_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_errors: Option<Vec<TargetError>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdated {
    pub success: bool,
    pub note: Record,
    pub note_id: String,
    pub updated_fields: Vec<&'static str>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDeleted {
    pub success: bool,
    pub deleted_note_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteList {
    pub success: bool,
    pub list_type: ListNotesBy,
    pub target_id: String,
    pub notes: Vec<Value>,
    pub total_count: usize,
    pub message: String,
}

/// Note operations.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// Create a note attached to at least one person or company.
    async fn create(&self, fields: NoteFields) -> TwentyApiResult<NoteCreated>;

    /// Change a note's title and/or body.
    async fn update(&self, params: IdParams<NoteFields>) -> TwentyApiResult<NoteUpdated>;

    async fn delete(&self, params: DeleteByIdParams) -> TwentyApiResult<NoteDeleted>;

    /// Notes attached to one person or company.
    async fn list(&self, params: NoteListParams) -> TwentyApiResult<NoteList>;
}

/// Default implementation of NoteService.
pub struct NoteServiceImpl {
    backend: Backend,
}

impl NoteServiceImpl {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

/// Reject empty target lists, unsupported target kinds and bad ids before
/// anything is created.
fn validate_targets(targets: &[ActivityTarget]) -> Result<(), ValidationError> {
    if targets.is_empty() {
        return Err(ValidationError::InvalidParameters(
            "At least one target (person or company) must be specified for the note".into(),
        ));
    }
    for (index, target) in targets.iter().enumerate() {
        if let ActivityTarget::Opportunity { .. } = target {
            return Err(ValidationError::InvalidParameters(format!(
                "Invalid target type \"opportunity\" in target {}. Must be \"person\" or \"company\".",
                index + 1
            )));
        }
        RecordId::for_field(target.target_id(), target.reference_field())?;
    }
    Ok(())
}

/// The created join record, tagged with what it points at.
fn tagged_target(record: Record, target: &ActivityTarget) -> Value {
    let mut fields: Map<String, Value> = record.fields().clone();
    fields.insert("targetType".into(), Value::String(target.kind().singular().into()));
    fields.insert("targetId".into(), Value::String(target.target_id().into()));
    Value::Object(fields)
}

#[async_trait]
impl NoteService for NoteServiceImpl {
    async fn create(&self, fields: NoteFields) -> TwentyApiResult<NoteCreated> {
        let payload = fields.to_create_payload()?;
        validate_targets(&fields.targets)?;

        let note = self.backend.records.create(EntityKind::Note, &payload).await?;
        let note_id = note
            .id()
            .map(str::to_string)
            .ok_or_else(|| TwentyApiError::Other("created note has no id".into()))?;

        let mut created = Vec::new();
        let mut errors = Vec::new();
        for (index, target) in fields.targets.iter().enumerate() {
            let result = match target.to_payload("noteId", &note_id) {
                Ok(payload) => self
                    .backend
                    .records
                    .create(EntityKind::NoteTarget, &payload)
                    .await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(record) => created.push(tagged_target(record, target)),
                Err(e) => {
                    warn!("Note target {} failed: {}", index + 1, e);
                    errors.push(TargetError {
                        target: index + 1,
                        target_type: target.kind(),
                        target_id: target.target_id().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let mut message = format!(
            "Note created successfully and assigned to {} target(s)",
            created.len()
        );
        if !errors.is_empty() {
            message.push_str(&format!(" ({} targets failed)", errors.len()));
        }

        let target_count = created.len();
        let mut note_value = note.fields().clone();
        note_value.insert("targets".into(), Value::Array(created));

        Ok(NoteCreated {
            success: true,
            note: Value::Object(note_value),
            note_id,
            target_count,
            target_errors: (!errors.is_empty()).then_some(errors),
            message,
        })
    }

    async fn update(&self, params: IdParams<NoteFields>) -> TwentyApiResult<NoteUpdated> {
        let id = RecordId::for_field(params.id.as_str(), "noteId")?;
        let patch = params.fields.to_patch();
        if patch.is_empty() {
            return Err(ValidationError::InvalidParameters(
                "No update data provided. Please specify at least one field to update (title or body)."
                    .into(),
            )
            .into());
        }

        let mut updated_fields = Vec::new();
        if patch.contains_key("title") {
            updated_fields.push("title");
        }
        if patch.contains_key("bodyV2") {
            updated_fields.push("body");
        }

        let note = self.backend.records.update(EntityKind::Note, &id, &patch).await?;
        Ok(NoteUpdated {
            success: true,
            note,
            note_id: id.into_inner(),
            updated_fields,
            message: "Note updated successfully".into(),
        })
    }

    async fn delete(&self, params: DeleteByIdParams) -> TwentyApiResult<NoteDeleted> {
        let id = RecordId::for_field(params.id, "noteId")?;
        let deleted = self.backend.records.delete(EntityKind::Note, &id).await?;
        Ok(NoteDeleted {
            success: true,
            deleted_note_id: deleted,
            message: "Note deleted successfully".into(),
        })
    }

    async fn list(&self, params: NoteListParams) -> TwentyApiResult<NoteList> {
        let (field, raw_id) = match params.list_notes_by {
            ListNotesBy::Person => ("personId", params.person_id),
            ListNotesBy::Company => ("companyId", params.company_id),
        };
        let raw_id = raw_id.ok_or_else(|| ValidationError::MissingRequiredParameter(field.into()))?;
        let id = RecordId::for_field(raw_id, field)?;

        let query = FindQuery::new(Some(Filter::eq(field, id.as_str())), self.backend.list_limit)
            .with_related(true);
        let page = self
            .backend
            .records
            .find(EntityKind::NoteTarget, &query)
            .await?;

        let notes: Vec<Value> = page
            .records
            .iter()
            .filter_map(|target| target.get_path("note"))
            .filter(|note| !note.is_null())
            .cloned()
            .collect();

        let kind_label = match params.list_notes_by {
            ListNotesBy::Person => "person",
            ListNotesBy::Company => "company",
        };
        Ok(NoteList {
            success: true,
            list_type: params.list_notes_by,
            message: format!(
                "Found {} note(s) for {} ID: {}",
                notes.len(),
                kind_label,
                id
            ),
            total_count: notes.len(),
            target_id: id.into_inner(),
            notes,
        })
    }
}
