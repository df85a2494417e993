//! Search criteria and their validation.

use crate::domain::{EmailAddress, RecordId, ValidationError};
use crate::models::EntityKind;
use serde::Serialize;
use std::fmt;

/// Maximum number of dot-separated segments in a custom field path.
pub const MAX_FIELD_PATH_SEGMENTS: usize = 3;

/// How a search value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchMethod {
    Email,
    Phone,
    Name,
    Domain,
    CustomField,
    Id,
}

impl SearchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Name => "name",
            Self::Domain => "domain",
            Self::CustomField => "customField",
            Self::Id => "id",
        }
    }

    /// Methods the finder supports for an entity kind.
    pub fn supported_by(kind: EntityKind) -> &'static [SearchMethod] {
        use SearchMethod::*;
        match kind {
            EntityKind::Person => &[Email, Phone, Name, CustomField, Id],
            EntityKind::Company => &[Name, Domain, CustomField, Id],
            EntityKind::Opportunity | EntityKind::Task => &[Name, CustomField, Id],
            _ => &[Id],
        }
    }

    /// Parse a method name, rejecting ones `kind` does not support.
    pub fn parse_for(value: &str, kind: EntityKind) -> Result<Self, ValidationError> {
        Self::supported_by(kind)
            .iter()
            .copied()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| ValidationError::UnsupportedSearchMethod {
                method: value.to_string(),
                entity: kind.singular().to_string(),
            })
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `(method, value)` search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriterion {
    pub method: SearchMethod,
    pub value: String,

    /// Only set for [`SearchMethod::CustomField`]
    pub field_path: Option<String>,
}

impl SearchCriterion {
    /// Validate a raw search request for `kind`.
    ///
    /// Emails are normalized; ids must be UUIDs; custom field searches
    /// need a path of at most [`MAX_FIELD_PATH_SEGMENTS`] segments.
    pub fn new(
        kind: EntityKind,
        search_by: &str,
        value: &str,
        field_path: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let method = SearchMethod::parse_for(search_by, kind)?;

        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::MissingRequiredParameter("searchValue".into()));
        }

        let value = match method {
            SearchMethod::Email => EmailAddress::new(value)?.into_inner(),
            SearchMethod::Id => RecordId::new(value)?.into_inner(),
            _ => value.to_string(),
        };

        let field_path = if method == SearchMethod::CustomField {
            let path = field_path
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| ValidationError::MissingRequiredParameter("customFieldPath".into()))?;
            let segments: Vec<&str> = path.split('.').collect();
            if segments.len() > MAX_FIELD_PATH_SEGMENTS {
                return Err(ValidationError::FieldPathTooDeep(path.to_string()));
            }
            if segments.iter().any(|s| s.is_empty()) {
                return Err(ValidationError::InvalidParameters(format!(
                    "Malformed custom field path: \"{}\"",
                    path
                )));
            }
            Some(path.to_string())
        } else {
            None
        };

        Ok(Self {
            method,
            value,
            field_path,
        })
    }

    /// Shorthand for a name search.
    pub fn name(kind: EntityKind, value: &str) -> Result<Self, ValidationError> {
        Self::new(kind, "name", value, None)
    }

    /// Shorthand for an email search on people.
    pub fn email(value: &str) -> Result<Self, ValidationError> {
        Self::new(EntityKind::Person, "email", value, None)
    }
}
