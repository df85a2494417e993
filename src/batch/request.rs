//! Batch request items and their dispatch keys.

use crate::domain::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One item of a batch: which operation to run and with what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub resource: String,
    pub operation: String,
    #[serde(default)]
    pub params: Value,
}

impl BatchRequest {
    pub fn new(resource: &str, operation: &str, params: Value) -> Self {
        Self {
            resource: resource.to_string(),
            operation: operation.to_string(),
            params,
        }
    }

    /// `resource:operation`, as named in errors.
    pub fn pair(&self) -> String {
        format!("{}:{}", self.resource, self.operation)
    }
}

/// Every supported resource/operation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PersonFind,
    PersonCreate,
    PersonUpdate,
    PersonDelete,
    PersonListByCompany,
    PersonSync,
    CompanyFind,
    CompanyCreate,
    CompanyUpdate,
    CompanyDelete,
    OpportunityFind,
    OpportunityCreate,
    OpportunityUpdate,
    OpportunityDelete,
    OpportunityList,
    NoteCreate,
    NoteUpdate,
    NoteDelete,
    NoteList,
    TaskCreate,
    TaskUpdate,
    TaskDelete,
    TaskFind,
    TaskList,
}

impl Operation {
    pub fn parse(resource: &str, operation: &str) -> Result<Self, ValidationError> {
        use Operation::*;
        let op = match (resource, operation) {
            ("person", "find") => PersonFind,
            ("person", "create") => PersonCreate,
            ("person", "update") => PersonUpdate,
            ("person", "delete") => PersonDelete,
            ("person", "listByCompany") => PersonListByCompany,
            ("person", "sync") => PersonSync,
            ("company", "find") => CompanyFind,
            ("company", "create") => CompanyCreate,
            ("company", "update") => CompanyUpdate,
            ("company", "delete") => CompanyDelete,
            ("opportunity", "find") => OpportunityFind,
            ("opportunity", "create") => OpportunityCreate,
            ("opportunity", "update") => OpportunityUpdate,
            ("opportunity", "delete") => OpportunityDelete,
            ("opportunity", "list") => OpportunityList,
            ("note", "create") => NoteCreate,
            ("note", "update") => NoteUpdate,
            ("note", "delete") => NoteDelete,
            ("note", "list") => NoteList,
            ("task", "create") => TaskCreate,
            ("task", "update") => TaskUpdate,
            ("task", "delete") => TaskDelete,
            ("task", "find") => TaskFind,
            ("task", "list") => TaskList,
            _ => {
                return Err(ValidationError::UnknownOperation(format!(
                    "{}:{}",
                    resource, operation
                )))
            }
        };
        Ok(op)
    }
}
