//! Lookups that turn caller-friendly references (company names, emails)
//! into record ids, and custom field names into schema field names.

use super::backend::{id_of, Backend};
use crate::domain::{EmailAddress, ValidationError};
use crate::error::TwentyApiResult;
use crate::filter::Filter;
use crate::matching::SearchCriterion;
use crate::models::payload::link;
use crate::models::{CustomFieldValue, EntityKind};
use crate::repositories::FindQuery;
use serde_json::{Map, Value};

/// Id of the company whose name best matches `name`.
pub async fn company_id_by_name(backend: &Backend, name: &str) -> TwentyApiResult<String> {
    let criterion = SearchCriterion::name(EntityKind::Company, name)?;
    let result = backend
        .finder
        .find(EntityKind::Company, &criterion, false)
        .await?;
    match result.record {
        Some(record) => Ok(id_of(&record)?.into_inner()),
        None => Err(ValidationError::ReferenceNotFound {
            entity: "Company".into(),
            key: name.to_string(),
        }
        .into()),
    }
}

/// Id of the person with primary email `email`.
pub async fn person_id_by_email(
    backend: &Backend,
    email: &str,
    role: &str,
) -> TwentyApiResult<String> {
    let criterion = SearchCriterion::email(email)?;
    let result = backend
        .finder
        .find(EntityKind::Person, &criterion, false)
        .await?;
    match result.record {
        Some(record) => Ok(id_of(&record)?.into_inner()),
        None => Err(ValidationError::ReferenceNotFound {
            entity: role.to_string(),
            key: email.to_string(),
        }
        .into()),
    }
}

/// Id of the workspace member whose login email is `email`.
pub async fn workspace_member_id_by_email(backend: &Backend, email: &str) -> TwentyApiResult<String> {
    let email = EmailAddress::new(email)?;
    let query = FindQuery::new(Some(Filter::eq("userEmail", email.as_str())), 1);
    let page = backend
        .records
        .find(EntityKind::WorkspaceMember, &query)
        .await?;
    match page.records.first() {
        Some(member) => Ok(id_of(member)?.into_inner()),
        None => Err(ValidationError::ReferenceNotFound {
            entity: "Account owner".into(),
            key: email.into_inner(),
        }
        .into()),
    }
}

/// Resolve each custom field name and write its value into `payload`.
///
/// Link fields get `{ primaryLinkUrl }`; everything else the raw value.
/// A field the schema lacks aborts the whole operation.
pub async fn apply_custom_fields(
    backend: &Backend,
    kind: EntityKind,
    fields: &[CustomFieldValue],
    payload: &mut Map<String, Value>,
) -> TwentyApiResult<()> {
    for field in fields {
        let resolution = backend.resolver.resolve(kind, &field.field_name).await?;
        let resolved = resolution.require(&field.field_name)?;

        let value = match (&field.field_value, resolved.ends_with("Link")) {
            (Value::String(url), true) => link(url),
            (other, _) => other.clone(),
        };
        payload.insert(resolved, value);
    }
    Ok(())
}
