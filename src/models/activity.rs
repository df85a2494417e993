//! Notes, tasks and the targets that attach them to records.

use super::entity::EntityKind;
use super::payload::{put_str, validate_date};
use crate::domain::{RecordId, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record a note or task is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "targetType", rename_all = "camelCase")]
pub enum ActivityTarget {
    Person {
        #[serde(rename = "personId")]
        person_id: String,
    },
    Company {
        #[serde(rename = "companyId")]
        company_id: String,
    },
    Opportunity {
        #[serde(rename = "opportunityId")]
        opportunity_id: String,
    },
}

impl ActivityTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Person { .. } => EntityKind::Person,
            Self::Company { .. } => EntityKind::Company,
            Self::Opportunity { .. } => EntityKind::Opportunity,
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            Self::Person { person_id } => person_id,
            Self::Company { company_id } => company_id,
            Self::Opportunity { opportunity_id } => opportunity_id,
        }
    }

    /// Key of the join record field that points at the target.
    pub fn reference_field(&self) -> &'static str {
        match self {
            Self::Person { .. } => "personId",
            Self::Company { .. } => "companyId",
            Self::Opportunity { .. } => "opportunityId",
        }
    }

    /// Validated join-record payload (`{noteId, personId}` and so on).
    pub fn to_payload(
        &self,
        owner_field: &str,
        owner_id: &str,
    ) -> Result<Map<String, Value>, ValidationError> {
        let target = RecordId::for_field(self.target_id(), self.reference_field())?;
        let mut payload = Map::new();
        payload.insert(owner_field.into(), Value::String(owner_id.to_string()));
        payload.insert(
            self.reference_field().into(),
            Value::String(target.into_inner()),
        );
        Ok(payload)
    }
}

fn markdown_body(body: &str) -> Value {
    let mut nested = Map::new();
    nested.insert("markdown".into(), Value::String(body.to_string()));
    Value::Object(nested)
}

/// Fields for creating or editing a note.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub targets: Vec<ActivityTarget>,
}

impl NoteFields {
    pub fn to_create_payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let title = self
            .title
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingRequiredParameter("title".into()))?;

        let mut payload = Map::new();
        payload.insert("title".into(), Value::String(title.to_string()));
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            payload.insert("bodyV2".into(), markdown_body(body));
        }
        Ok(payload)
    }

    /// Title and body only; empty strings count as absent.
    pub fn to_patch(&self) -> Map<String, Value> {
        let mut patch = Map::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            patch.insert("title".into(), Value::String(title.to_string()));
        }
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            patch.insert("bodyV2".into(), markdown_body(body));
        }
        patch
    }
}

/// Fields for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub due_at: Option<String>,

    /// `TODO`, `IN_PROGRESS` or `DONE`
    pub status: Option<String>,
    pub position: Option<f64>,
    pub assignee_id: Option<String>,
    pub targets: Vec<ActivityTarget>,
}

impl TaskFields {
    pub fn to_create_payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let title = self
            .title
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingRequiredParameter("title".into()))?;

        let mut payload = Map::new();
        payload.insert("title".into(), Value::String(title.to_string()));
        payload.insert(
            "status".into(),
            Value::String(self.status.clone().unwrap_or_else(|| "TODO".into())),
        );
        payload.insert("position".into(), Value::from(self.position.unwrap_or(0.0)));
        self.put_optional(&mut payload)?;
        Ok(payload)
    }

    pub fn to_patch(&self) -> Result<Map<String, Value>, ValidationError> {
        let mut patch = Map::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            patch.insert("title".into(), Value::String(title.to_string()));
        }
        put_str(&mut patch, "status", &self.status);
        if let Some(position) = self.position {
            patch.insert("position".into(), Value::from(position));
        }
        self.put_optional(&mut patch)?;
        Ok(patch)
    }

    fn put_optional(&self, payload: &mut Map<String, Value>) -> Result<(), ValidationError> {
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            payload.insert("bodyV2".into(), markdown_body(body));
        }
        if let Some(due_at) = self.due_at.as_deref().filter(|d| !d.is_empty()) {
            validate_date("dueAt", due_at)?;
            payload.insert("dueAt".into(), Value::String(due_at.to_string()));
        }
        if let Some(assignee) = self.assignee_id.as_deref().filter(|a| !a.is_empty()) {
            let assignee = RecordId::for_field(assignee, "assigneeId")?;
            payload.insert("assigneeId".into(), Value::String(assignee.into_inner()));
        }
        Ok(())
    }
}
