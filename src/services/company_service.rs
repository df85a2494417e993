//! Company service layer.
//!
//! Companies are keyed by domain first, then by name.

use super::backend::Backend;
use super::by_key;
use super::outputs::{CreateOutput, DeleteOutput, FindOutput, UpdateOutput};
use super::params::{KeyParams, UpdateParams};
use super::reconciler::Reconciler;
use super::references::{apply_custom_fields, workspace_member_id_by_email};
use crate::domain::DomainName;
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::matching::NaturalKey;
use crate::models::{CompanyFields, EntityKind};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Minimum confidence for updating a company found by search.
pub const UPDATE_MIN_CONFIDENCE: f64 = 0.8;

/// Minimum confidence for deleting a company found by search.
pub const DELETE_MIN_CONFIDENCE: f64 = 0.9;

/// Company operations.
#[async_trait]
pub trait CompanyService: Send + Sync {
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput>;

    /// Find-or-create by domain, then name.
    async fn create(&self, fields: CompanyFields) -> TwentyApiResult<CreateOutput>;

    async fn update(&self, params: UpdateParams<CompanyFields>) -> TwentyApiResult<UpdateOutput>;

    async fn delete(&self, params: KeyParams) -> TwentyApiResult<DeleteOutput>;
}

/// Default implementation of CompanyService.
pub struct CompanyServiceImpl {
    backend: Backend,
}

impl CompanyServiceImpl {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Resolve the account owner and custom fields into `payload`.
    async fn resolve_references(
        &self,
        fields: &CompanyFields,
        payload: &mut Map<String, Value>,
    ) -> TwentyApiResult<()> {
        if let Some(email) = fields.account_owner_email.as_deref().filter(|e| !e.is_empty()) {
            let owner_id = workspace_member_id_by_email(&self.backend, email).await?;
            payload.insert("accountOwnerId".into(), Value::String(owner_id));
        }
        apply_custom_fields(
            &self.backend,
            EntityKind::Company,
            &fields.custom_fields,
            payload,
        )
        .await
    }
}

#[async_trait]
impl CompanyService for CompanyServiceImpl {
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput> {
        by_key::find(&self.backend, EntityKind::Company, &params).await
    }

    async fn create(&self, fields: CompanyFields) -> TwentyApiResult<CreateOutput> {
        let mut payload = fields.to_create_payload()?;
        self.resolve_references(&fields, &mut payload).await?;

        let mut keys = Vec::with_capacity(2);
        if let Some(domain) = fields.domain.as_deref().filter(|d| !d.trim().is_empty()) {
            keys.push(NaturalKey::Domain(DomainName::normalize(domain)?));
        }
        if let Some(name) = fields.name.as_deref() {
            keys.push(NaturalKey::Name(name.trim().to_string()));
        }

        let reconciled = Reconciler::new(&self.backend)
            .find_or_create(EntityKind::Company, &keys, &payload)
            .await?;
        Ok(CreateOutput::new(
            EntityKind::Company,
            fields.name.as_deref().unwrap_or_default(),
            reconciled,
        ))
    }

    async fn update(&self, params: UpdateParams<CompanyFields>) -> TwentyApiResult<UpdateOutput> {
        let fields = &params.fields;
        by_key::update(
            &self.backend,
            EntityKind::Company,
            &params.key,
            UPDATE_MIN_CONFIDENCE,
            |existing| async move {
                let mut patch = fields.to_patch();
                self.resolve_references(fields, &mut patch).await?;
                Ok::<_, TwentyApiError>((existing, patch))
            },
        )
        .await
    }

    async fn delete(&self, params: KeyParams) -> TwentyApiResult<DeleteOutput> {
        by_key::delete(
            &self.backend,
            EntityKind::Company,
            &params,
            DELETE_MIN_CONFIDENCE,
        )
        .await
    }
}
