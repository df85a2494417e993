//! Domain validation errors.

use std::fmt;

/// Errors raised while validating caller input, before anything is sent to
/// the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A record id is not a canonical UUID.
    InvalidUuid { field: String, value: String },

    /// The provided email address is invalid.
    InvalidEmail(String),

    /// The provided domain cannot be normalized.
    InvalidDomain(String),

    /// A parameter required by the chosen operation was not supplied.
    MissingRequiredParameter(String),

    /// The search method is not supported for this entity kind.
    UnsupportedSearchMethod { method: String, entity: String },

    /// No candidate field name exists on the remote schema.
    FieldNotFound { field: String, tried: Vec<String> },

    /// A custom field path has more segments than records nest.
    FieldPathTooDeep(String),

    /// A date field is not ISO 8601.
    InvalidDate { field: String, value: String },

    /// A record referenced by name or email does not exist.
    ReferenceNotFound { entity: String, key: String },

    /// No handler for this resource/operation pair.
    UnknownOperation(String),

    /// Operation parameters could not be decoded.
    InvalidParameters(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUuid { field, value } => write!(
                f,
                "Invalid UUID format for {}: \"{}\". Must be a valid UUID (e.g., \"123e4567-e89b-12d3-a456-426614174000\")",
                field, value
            ),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            Self::InvalidDomain(domain) => write!(f, "Invalid domain format: {}", domain),
            Self::MissingRequiredParameter(name) => {
                write!(f, "Missing required parameter: {}", name)
            }
            Self::UnsupportedSearchMethod { method, entity } => {
                write!(f, "Unsupported search method for {}: {}", entity, method)
            }
            Self::FieldNotFound { field, tried } => write!(
                f,
                "Field \"{}\" not found. Tried: {}.",
                field,
                tried.join(", ")
            ),
            Self::FieldPathTooDeep(path) => {
                write!(f, "Custom field path \"{}\" has more than 3 segments", path)
            }
            Self::InvalidDate { field, value } => {
                write!(f, "Invalid date for {}: \"{}\". Expected ISO 8601", field, value)
            }
            Self::ReferenceNotFound { entity, key } => write!(f, "{} not found: {}", entity, key),
            Self::UnknownOperation(pair) => {
                write!(f, "Unknown resource:operation combination: {}", pair)
            }
            Self::InvalidParameters(reason) => write!(f, "Invalid parameters: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_lists_candidates() {
        let err = ValidationError::FieldNotFound {
            field: "instagram".into(),
            tried: vec!["instagram".into(), "instagramLink".into()],
        };
        assert_eq!(
            err.to_string(),
            "Field \"instagram\" not found. Tried: instagram, instagramLink."
        );
    }

    #[test]
    fn test_unsupported_search_method_names_value() {
        let err = ValidationError::UnsupportedSearchMethod {
            method: "fax".into(),
            entity: "person".into(),
        };
        assert!(err.to_string().contains("fax"));
    }
}
