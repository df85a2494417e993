//! Person service layer.
//!
//! People are keyed by primary email. Creation is find-or-create, and the
//! sync operation folds external data into an existing person.

use super::backend::{id_of, Backend};
use super::by_key;
use super::merge::merge_patch;
use super::outputs::{CreateOutput, DeleteOutput, FindOutput, UpdateOutput};
use super::params::{CompanySearchBy, KeyParams, ListByCompanyParams, UpdateParams};
use super::reconciler::Reconciler;
use super::references::{apply_custom_fields, company_id_by_name};
use crate::domain::{RecordId, ValidationError};
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::filter::Filter;
use crate::matching::{NaturalKey, SearchCriterion};
use crate::models::{EntityKind, PersonFields, Record};
use crate::repositories::FindQuery;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Result of listing a company's people.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleByCompany {
    pub company_id: Option<String>,
    pub company_search_by: CompanySearchBy,
    pub company_identifier: String,
    pub people: Vec<Record>,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Created,
    Updated,
    NoChanges,
}

/// Result of syncing external contact data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutput {
    pub action: SyncAction,
    pub person: Record,
    pub changes: Vec<String>,
}

/// Person operations.
#[async_trait]
pub trait PersonService: Send + Sync {
    /// Find a person by email, phone, name, custom field or id.
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput>;

    /// Find-or-create by email. `firstName` is required.
    async fn create(&self, fields: PersonFields) -> TwentyApiResult<CreateOutput>;

    /// Update the person the key identifies.
    ///
    /// `companyName` is resolved to a company id; a miss is an error.
    async fn update(&self, params: UpdateParams<PersonFields>) -> TwentyApiResult<UpdateOutput>;

    /// Delete the person the key identifies.
    async fn delete(&self, params: KeyParams) -> TwentyApiResult<DeleteOutput>;

    /// People whose company is identified by name or id.
    async fn list_by_company(&self, params: ListByCompanyParams) -> TwentyApiResult<PeopleByCompany>;

    /// Create, update or leave alone the person with `fields.email`.
    async fn sync(&self, fields: PersonFields) -> TwentyApiResult<SyncOutput>;
}

/// Default implementation of PersonService.
pub struct PersonServiceImpl {
    backend: Backend,
}

impl PersonServiceImpl {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    async fn patch_for(&self, fields: &PersonFields) -> TwentyApiResult<Map<String, Value>> {
        let mut patch = fields.to_patch()?;
        if let Some(company_name) = fields.company_name.as_deref().filter(|n| !n.is_empty()) {
            let company_id = company_id_by_name(&self.backend, company_name).await?;
            patch.insert("companyId".into(), Value::String(company_id));
        }
        apply_custom_fields(
            &self.backend,
            EntityKind::Person,
            &fields.custom_fields,
            &mut patch,
        )
        .await?;
        Ok(patch)
    }
}

fn full_name(fields: &PersonFields) -> String {
    format!(
        "{} {}",
        fields.first_name.as_deref().unwrap_or_default(),
        fields.last_name.as_deref().unwrap_or_default()
    )
    .trim()
    .to_string()
}

/// Fields of `incoming` that differ from `person`, as a patch.
fn sync_changes(person: &Record, incoming: &PersonFields) -> (Vec<String>, Map<String, Value>) {
    let mut changes = Vec::new();
    let mut patch = Map::new();

    if let Some(city) = incoming.city.as_deref().filter(|c| !c.is_empty()) {
        if person.get_str("city") != Some(city) {
            patch.insert("city".into(), Value::String(city.to_string()));
            changes.push("city".to_string());
        }
    }

    if let Some(position) = incoming.position {
        let current = person.get_path("position").and_then(Value::as_f64);
        if current != Some(position) {
            patch.insert("position".into(), Value::from(position));
            changes.push("position".to_string());
        }
    }

    let first = incoming.first_name.as_deref().filter(|s| !s.is_empty());
    let last = incoming.last_name.as_deref().filter(|s| !s.is_empty());
    if first.is_some() || last.is_some() {
        let current_first = person.get_str("name.firstName").unwrap_or_default();
        let current_last = person.get_str("name.lastName").unwrap_or_default();
        let new_first = first.unwrap_or(current_first);
        let new_last = last.unwrap_or(current_last);
        if new_first != current_first || new_last != current_last {
            let mut name = Map::new();
            name.insert("firstName".into(), Value::String(new_first.to_string()));
            name.insert("lastName".into(), Value::String(new_last.to_string()));
            patch.insert("name".into(), Value::Object(name));
            changes.push("name".to_string());
        }
    }

    if let Some(phone) = incoming.phone.as_deref().filter(|p| !p.is_empty()) {
        let current = person.get_str("phones.primaryPhoneNumber").unwrap_or_default();
        if phone != current {
            let mut phones = Map::new();
            phones.insert("primaryPhoneNumber".into(), Value::String(phone.to_string()));
            patch.insert("phones".into(), Value::Object(phones));
            changes.push("phone".to_string());
        }
    }

    (changes, patch)
}

#[async_trait]
impl PersonService for PersonServiceImpl {
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput> {
        by_key::find(&self.backend, EntityKind::Person, &params).await
    }

    async fn create(&self, fields: PersonFields) -> TwentyApiResult<CreateOutput> {
        let mut payload = fields.to_create_payload()?;
        apply_custom_fields(
            &self.backend,
            EntityKind::Person,
            &fields.custom_fields,
            &mut payload,
        )
        .await?;
        if let Some(company_name) = fields.company_name.as_deref().filter(|n| !n.is_empty()) {
            let company_id = company_id_by_name(&self.backend, company_name).await?;
            payload.insert("companyId".into(), Value::String(company_id));
        }

        let keys: Vec<NaturalKey> = fields
            .email_address()?
            .map(NaturalKey::Email)
            .into_iter()
            .collect();

        let reconciled = Reconciler::new(&self.backend)
            .find_or_create(EntityKind::Person, &keys, &payload)
            .await?;
        Ok(CreateOutput::new(
            EntityKind::Person,
            &full_name(&fields),
            reconciled,
        ))
    }

    async fn update(&self, params: UpdateParams<PersonFields>) -> TwentyApiResult<UpdateOutput> {
        let fields = &params.fields;
        by_key::update(
            &self.backend,
            EntityKind::Person,
            &params.key,
            0.0,
            |existing| async move {
                let patch = self.patch_for(fields).await?;
                Ok::<_, TwentyApiError>((existing, patch))
            },
        )
        .await
    }

    async fn delete(&self, params: KeyParams) -> TwentyApiResult<DeleteOutput> {
        by_key::delete(&self.backend, EntityKind::Person, &params, 0.0).await
    }

    async fn list_by_company(&self, params: ListByCompanyParams) -> TwentyApiResult<PeopleByCompany> {
        let identifier = params.company_identifier.trim();
        if identifier.is_empty() {
            return Err(ValidationError::MissingRequiredParameter("companyIdentifier".into()).into());
        }

        let company = match params.company_search_by {
            CompanySearchBy::Id => {
                let id = RecordId::for_field(identifier, "companyId")?;
                self.backend.records.get(EntityKind::Company, &id).await?
            }
            CompanySearchBy::Name => {
                let criterion = SearchCriterion::name(EntityKind::Company, identifier)?;
                self.backend
                    .finder
                    .find(EntityKind::Company, &criterion, false)
                    .await?
                    .record
            }
        };

        let Some(company) = company else {
            return Ok(PeopleByCompany {
                company_id: None,
                company_search_by: params.company_search_by,
                company_identifier: identifier.to_string(),
                people: Vec::new(),
                total_count: 0,
                error: Some("Company not found".into()),
                message: format!("Company not found: {}", identifier),
            });
        };

        let company_id = id_of(&company)?;
        let query = FindQuery::new(
            Some(Filter::eq("companyId", company_id.as_str())),
            self.backend.list_limit,
        );
        let page = self.backend.records.find(EntityKind::Person, &query).await?;

        Ok(PeopleByCompany {
            company_id: Some(company_id.into_inner()),
            company_search_by: params.company_search_by,
            company_identifier: identifier.to_string(),
            total_count: page.total_count,
            message: format!("Found {} people in company", page.total_count),
            people: page.records,
            error: None,
        })
    }

    async fn sync(&self, fields: PersonFields) -> TwentyApiResult<SyncOutput> {
        let email = fields
            .email_address()?
            .ok_or_else(|| ValidationError::MissingRequiredParameter("email".into()))?;

        let existing = self
            .backend
            .finder
            .find_exact(EntityKind::Person, &NaturalKey::Email(email))
            .await?
            .record;

        let Some(person) = existing else {
            let payload = fields.to_create_payload()?;
            let changes = payload.keys().cloned().collect();
            let person = self.backend.records.create(EntityKind::Person, &payload).await?;
            return Ok(SyncOutput {
                action: SyncAction::Created,
                person,
                changes,
            });
        };

        let (changes, patch) = sync_changes(&person, &fields);
        if changes.is_empty() {
            return Ok(SyncOutput {
                action: SyncAction::NoChanges,
                person,
                changes,
            });
        }

        let id = id_of(&person)?;
        let updated = self
            .backend
            .records
            .update(EntityKind::Person, &id, &merge_patch(&person, &patch))
            .await?;
        Ok(SyncOutput {
            action: SyncAction::Updated,
            person: updated,
            changes,
        })
    }
}
