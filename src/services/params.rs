//! Operation parameters as they arrive in a batch request.

use crate::domain::ValidationError;
use crate::matching::SearchCriterion;
use crate::models::EntityKind;
use serde::{Deserialize, Serialize};

/// Identifies records by search method and value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyParams {
    pub search_by: String,
    pub search_value: String,
    #[serde(default)]
    pub custom_field_path: Option<String>,

    /// Only honoured by find operations (default true)
    #[serde(default)]
    pub include_related: Option<bool>,
}

impl KeyParams {
    pub fn criterion(&self, kind: EntityKind) -> Result<SearchCriterion, ValidationError> {
        SearchCriterion::new(
            kind,
            &self.search_by,
            &self.search_value,
            self.custom_field_path.as_deref(),
        )
    }
}

/// A natural-key lookup plus the fields to change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParams<F> {
    #[serde(flatten)]
    pub key: KeyParams,
    #[serde(flatten)]
    pub fields: F,
}

/// An id plus the fields to change.
#[derive(Debug, Clone, Deserialize)]
pub struct IdParams<F> {
    #[serde(alias = "noteId", alias = "taskId")]
    pub id: String,
    #[serde(flatten)]
    pub fields: F,
}

/// Just an id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteByIdParams {
    #[serde(alias = "noteId", alias = "taskId")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanySearchBy {
    #[default]
    Name,
    Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListByCompanyParams {
    #[serde(default)]
    pub company_search_by: CompanySearchBy,
    pub company_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunityListParams {
    pub stage: Option<String>,
    pub company_id: Option<String>,
    pub point_of_contact_id: Option<String>,
    pub search_term: Option<String>,
    pub limit: Option<usize>,

    /// `field:ASC|DESC`, default `createdAt:DESC`
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListNotesBy {
    Person,
    Company,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListParams {
    pub list_notes_by: ListNotesBy,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskListParams {
    pub limit: Option<usize>,
}
