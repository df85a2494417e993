//! Opportunity service layer.

use super::backend::Backend;
use super::by_key;
use super::outputs::{CreateOutput, DeleteOutput, FindOutput, UpdateOutput};
use super::params::{KeyParams, OpportunityListParams, UpdateParams};
use super::reconciler::Reconciler;
use super::references::{company_id_by_name, person_id_by_email};
use crate::domain::RecordId;
use crate::error::{TwentyApiError, TwentyApiResult};
use crate::filter::Filter;
use crate::graphql::OrderBy;
use crate::matching::NaturalKey;
use crate::models::{EntityKind, OpportunityFields, Record};
use crate::repositories::FindQuery;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Default page size for opportunity lists.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Default ordering for opportunity lists.
pub const DEFAULT_ORDER_BY: &str = "createdAt:DESC";

/// One page of opportunities plus the filters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityList {
    pub opportunities: Vec<Record>,
    pub total_count: usize,
    pub has_next_page: bool,
    pub returned_count: usize,
    pub filters: Map<String, Value>,
    pub message: String,
}

/// Opportunity operations.
#[async_trait]
pub trait OpportunityService: Send + Sync {
    /// Find by name, custom field or id. An exact name match wins.
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput>;

    /// Find-or-create by name.
    async fn create(&self, fields: OpportunityFields) -> TwentyApiResult<CreateOutput>;

    async fn update(&self, params: UpdateParams<OpportunityFields>) -> TwentyApiResult<UpdateOutput>;

    async fn delete(&self, params: KeyParams) -> TwentyApiResult<DeleteOutput>;

    /// Filtered, ordered page of opportunities.
    async fn list(&self, params: OpportunityListParams) -> TwentyApiResult<OpportunityList>;
}

/// Default implementation of OpportunityService.
pub struct OpportunityServiceImpl {
    backend: Backend,
}

impl OpportunityServiceImpl {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Turn `companyName` and `pointOfContactEmail` into ids.
    async fn resolve_references(
        &self,
        fields: &OpportunityFields,
        payload: &mut Map<String, Value>,
    ) -> TwentyApiResult<()> {
        if let Some(name) = fields.company_name.as_deref().filter(|n| !n.is_empty()) {
            let company_id = company_id_by_name(&self.backend, name).await?;
            payload.insert("companyId".into(), Value::String(company_id));
        }
        if let Some(email) = fields
            .point_of_contact_email
            .as_deref()
            .filter(|e| !e.is_empty())
        {
            let person_id = person_id_by_email(&self.backend, email, "Point of contact").await?;
            payload.insert("pointOfContactId".into(), Value::String(person_id));
        }
        Ok(())
    }
}

/// Build the list filter and echo the filters that were applied.
fn list_filter(
    params: &OpportunityListParams,
) -> TwentyApiResult<(Option<Filter>, Map<String, Value>)> {
    let mut filters = Vec::new();
    let mut applied = Map::new();

    if let Some(stage) = params.stage.as_deref().filter(|s| !s.is_empty()) {
        filters.push(Filter::eq("stage", stage));
        applied.insert("stage".into(), Value::String(stage.to_string()));
    }
    if let Some(company_id) = params.company_id.as_deref().filter(|s| !s.is_empty()) {
        let company_id = RecordId::for_field(company_id, "companyId")?;
        filters.push(Filter::eq("companyId", company_id.as_str()));
        applied.insert("companyId".into(), Value::String(company_id.into_inner()));
    }
    if let Some(contact_id) = params
        .point_of_contact_id
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        let contact_id = RecordId::for_field(contact_id, "pointOfContactId")?;
        filters.push(Filter::eq("pointOfContactId", contact_id.as_str()));
        applied.insert(
            "pointOfContactId".into(),
            Value::String(contact_id.into_inner()),
        );
    }
    if let Some(term) = params.search_term.as_deref().filter(|s| !s.is_empty()) {
        filters.push(Filter::icontains("name", term));
        applied.insert("searchTerm".into(), Value::String(term.to_string()));
    }

    Ok((Filter::all(filters), applied))
}

#[async_trait]
impl OpportunityService for OpportunityServiceImpl {
    async fn find(&self, params: KeyParams) -> TwentyApiResult<FindOutput> {
        by_key::find(&self.backend, EntityKind::Opportunity, &params).await
    }

    async fn create(&self, fields: OpportunityFields) -> TwentyApiResult<CreateOutput> {
        let mut payload = fields.to_create_payload()?;
        self.resolve_references(&fields, &mut payload).await?;

        let name = fields.name.as_deref().unwrap_or_default().trim().to_string();
        let reconciled = Reconciler::new(&self.backend)
            .find_or_create(
                EntityKind::Opportunity,
                &[NaturalKey::Name(name.clone())],
                &payload,
            )
            .await?;
        Ok(CreateOutput::new(EntityKind::Opportunity, &name, reconciled))
    }

    async fn update(&self, params: UpdateParams<OpportunityFields>) -> TwentyApiResult<UpdateOutput> {
        let fields = &params.fields;
        by_key::update(
            &self.backend,
            EntityKind::Opportunity,
            &params.key,
            0.0,
            |existing| async move {
                let mut patch = fields.to_patch()?;
                self.resolve_references(fields, &mut patch).await?;
                Ok::<_, TwentyApiError>((existing, patch))
            },
        )
        .await
    }

    async fn delete(&self, params: KeyParams) -> TwentyApiResult<DeleteOutput> {
        by_key::delete(&self.backend, EntityKind::Opportunity, &params, 0.0).await
    }

    async fn list(&self, params: OpportunityListParams) -> TwentyApiResult<OpportunityList> {
        let (filter, applied) = list_filter(&params)?;
        let order_by: OrderBy = params
            .order_by
            .as_deref()
            .unwrap_or(DEFAULT_ORDER_BY)
            .parse()?;
        let query = FindQuery::new(filter, params.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .with_order_by(Some(order_by))
            .with_related(true);

        let page = self
            .backend
            .records
            .find(EntityKind::Opportunity, &query)
            .await?;

        let returned_count = page.records.len();
        Ok(OpportunityList {
            message: format!(
                "Found {} opportunities ({} total)",
                returned_count, page.total_count
            ),
            opportunities: page.records,
            total_count: page.total_count,
            has_next_page: page.has_next_page,
            returned_count,
            filters: applied,
        })
    }
}
