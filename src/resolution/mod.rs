//! Resolution of user-typed field names against the remote schema.
//!
//! Custom fields are addressed by whatever the caller typed (`instagram`,
//! `LinkedIn`). The resolver tries a fixed list of candidate spellings and
//! reports which one the schema knows. When the schema cannot be read at
//! all, it falls back to the verbatim spelling and says so, leaving the
//! caller to decide whether to proceed.

mod candidates;

pub use candidates::{candidates, CandidateStrategy};

use crate::domain::ValidationError;
use crate::error::TwentyApiResult;
use crate::models::EntityKind;
use crate::repositories::SchemaRepository;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of resolving one field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResolution {
    pub resolved_field: Option<String>,
    pub field_exists: bool,
    pub tried_fields: Vec<String>,
    pub fallback_used: bool,
}

impl FieldResolution {
    /// The field to use, unless resolution established it does not exist.
    pub fn usable_field(&self) -> Option<&str> {
        if self.field_exists || self.fallback_used {
            self.resolved_field.as_deref()
        } else {
            None
        }
    }

    /// The usable field or a `FieldNotFound` error listing the candidates.
    pub fn require(&self, field_input: &str) -> Result<String, ValidationError> {
        self.usable_field()
            .map(str::to_string)
            .ok_or_else(|| ValidationError::FieldNotFound {
                field: field_input.to_string(),
                tried: self.tried_fields.clone(),
            })
    }
}

/// Maps user-typed field names to schema field names.
#[derive(Clone)]
pub struct FieldResolver {
    schema: Arc<dyn SchemaRepository>,
}

impl FieldResolver {
    pub fn new(schema: Arc<dyn SchemaRepository>) -> Self {
        Self { schema }
    }

    /// Resolve `field_input` on the schema type of `kind`.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        field_input: &str,
    ) -> TwentyApiResult<FieldResolution> {
        if field_input.trim().is_empty() {
            return Err(ValidationError::MissingRequiredParameter("fieldName".into()).into());
        }

        let tried_fields = candidates(field_input);

        let fields = match self.schema.field_names(kind.type_name()).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(
                    "Introspection of {} failed, using \"{}\" unverified: {}",
                    kind.type_name(),
                    tried_fields[0],
                    e
                );
                return Ok(FieldResolution {
                    resolved_field: tried_fields.first().cloned(),
                    field_exists: false,
                    tried_fields,
                    fallback_used: true,
                });
            }
        };

        let resolved_field = fields.and_then(|fields| {
            tried_fields
                .iter()
                .find(|candidate| fields.iter().any(|f| f == *candidate))
                .cloned()
        });

        tracing::debug!(
            "Resolved {}.{} -> {:?}",
            kind.type_name(),
            field_input,
            resolved_field
        );

        Ok(FieldResolution {
            field_exists: resolved_field.is_some(),
            resolved_field,
            tried_fields,
            fallback_used: false,
        })
    }
}
