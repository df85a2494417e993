//! Unified finder: one search entry point for every entity kind.

use super::confidence::{score, Confidence, ExactName, MatchResult};
use super::criterion::{SearchCriterion, SearchMethod};
use crate::domain::{DomainName, EmailAddress, ValidationError};
use crate::error::TwentyApiResult;
use crate::filter::Filter;
use crate::models::{EntityKind, Record};
use crate::repositories::{FindQuery, RecordRepository};
use crate::resolution::FieldResolver;
use std::sync::Arc;
use tracing::debug;

/// Sub-field used when a link-typed custom field path has no second segment.
const DEFAULT_LINK_SUBFIELD: &str = "primaryLinkUrl";

/// The key a strict lookup matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NaturalKey {
    Email(EmailAddress),
    Domain(DomainName),
    Name(String),
}

impl NaturalKey {
    /// Label used for `foundBy` and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Domain(_) => "domain",
            Self::Name(_) => "name",
        }
    }

    /// Backend filter admitting only records whose key equals this one.
    fn filter(&self, kind: EntityKind) -> Result<Filter, ValidationError> {
        match self {
            Self::Email(email) => Ok(Filter::eq("emails.primaryEmail", email.as_str())),
            Self::Domain(domain) => Ok(Filter::Or(
                link_forms(domain)
                    .iter()
                    .map(|form| Filter::iexact("domainName.primaryLinkUrl", form))
                    .collect(),
            )),
            Self::Name(name) => Ok(Filter::iexact(name_field(kind)?, name.trim())),
        }
    }

    fn verifies(&self, kind: EntityKind, record: &Record) -> bool {
        match self {
            Self::Email(email) => record
                .get_str("emails.primaryEmail")
                .map(|stored| email.matches(stored))
                .unwrap_or(false),
            Self::Domain(domain) => record
                .get_str("domainName.primaryLinkUrl")
                .map(|stored| domain.matches(stored))
                .unwrap_or(false),
            Self::Name(name) => kind
                .name_field()
                .and_then(|field| record.get_str(field))
                .map(|stored| stored.trim().to_lowercase() == name.trim().to_lowercase())
                .unwrap_or(false),
        }
    }
}

/// Every way a company link for `domain` is commonly stored.
fn link_forms(domain: &DomainName) -> Vec<String> {
    const PREFIXES: [&str; 5] = ["", "https://", "http://", "https://www.", "http://www."];
    PREFIXES
        .iter()
        .flat_map(|prefix| {
            [
                format!("{}{}", prefix, domain),
                format!("{}{}/", prefix, domain),
            ]
        })
        .collect()
}

fn name_field(kind: EntityKind) -> Result<&'static str, ValidationError> {
    kind.name_field()
        .ok_or_else(|| ValidationError::UnsupportedSearchMethod {
            method: "name".into(),
            entity: kind.singular().into(),
        })
}

/// Translates search criteria into backend filters and scores the results.
#[derive(Clone)]
pub struct UnifiedFinder {
    records: Arc<dyn RecordRepository>,
    resolver: FieldResolver,
    limit: usize,
}

impl UnifiedFinder {
    pub fn new(records: Arc<dyn RecordRepository>, resolver: FieldResolver, limit: usize) -> Self {
        Self {
            records,
            resolver,
            limit,
        }
    }

    /// Build the backend filter for a validated criterion.
    ///
    /// Custom field paths go through the field resolver, so this may hit
    /// the schema.
    pub async fn build_filter(
        &self,
        kind: EntityKind,
        criterion: &SearchCriterion,
    ) -> TwentyApiResult<Filter> {
        let value = criterion.value.as_str();

        let filter = match criterion.method {
            SearchMethod::Email => Filter::eq("emails.primaryEmail", value.to_lowercase()),
            SearchMethod::Phone => Filter::eq("phones.primaryPhoneNumber", value),
            SearchMethod::Name => match kind {
                EntityKind::Person => Filter::Or(vec![
                    Filter::icontains("name.firstName", value),
                    Filter::icontains("name.lastName", value),
                ]),
                _ => Filter::icontains(name_field(kind)?, value),
            },
            SearchMethod::Domain => {
                let domain = DomainName::normalize(value)?;
                Filter::icontains("domainName.primaryLinkUrl", domain.as_str())
            }
            SearchMethod::CustomField => {
                let path = criterion
                    .field_path
                    .as_deref()
                    .ok_or_else(|| ValidationError::MissingRequiredParameter("customFieldPath".into()))?;
                self.custom_field_filter(kind, path, value).await?
            }
            SearchMethod::Id => Filter::eq("id", value),
        };

        debug!("{} search by {}: {:?}", kind, criterion.method, filter);
        Ok(filter)
    }

    async fn custom_field_filter(
        &self,
        kind: EntityKind,
        path: &str,
        value: &str,
    ) -> TwentyApiResult<Filter> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let resolved = self.resolver.resolve(kind, head).await?.require(head)?;

        if resolved.ends_with("Link") {
            let sub = if rest.is_empty() {
                DEFAULT_LINK_SUBFIELD.to_string()
            } else {
                rest.join(".")
            };
            Ok(Filter::eq(format!("{}.{}", resolved, sub), value))
        } else {
            let full_path = std::iter::once(resolved.as_str())
                .chain(rest.iter().copied())
                .collect::<Vec<_>>()
                .join(".");
            Ok(Filter::contains(full_path, value))
        }
    }

    /// Search `kind` by `criterion` and score the result set.
    ///
    /// Opportunity name searches prefer a record whose name equals the
    /// value, ignoring case.
    pub async fn find(
        &self,
        kind: EntityKind,
        criterion: &SearchCriterion,
        include_related: bool,
    ) -> TwentyApiResult<MatchResult> {
        let filter = self.build_filter(kind, criterion).await?;
        let query = FindQuery::new(Some(filter), self.limit).with_related(include_related);
        let page = self.records.find(kind, &query).await?;

        let exact = (kind == EntityKind::Opportunity && criterion.method == SearchMethod::Name)
            .then(|| ExactName {
                field: "name",
                value: criterion.value.as_str(),
            });

        let has_next_page = page.has_next_page;
        let result = score(page.records, page.total_count, exact);

        // The exact name may sit beyond the first page of substring hits.
        if exact.is_some() && has_next_page && result.confidence != Confidence::Exact {
            let query = FindQuery::new(
                Some(Filter::iexact("name", criterion.value.trim())),
                1,
            )
            .with_related(include_related);
            let exact_page = self.records.find(kind, &query).await?;
            if let Some(record) = exact_page.records.into_iter().next() {
                return Ok(MatchResult::matched(
                    record,
                    Confidence::Exact,
                    result.total_matches,
                ));
            }
        }

        Ok(result)
    }

    /// Strict lookup by natural key: only a record whose key equals the
    /// given one counts as found, and then with [`Confidence::Exact`].
    pub async fn find_exact(&self, kind: EntityKind, key: &NaturalKey) -> TwentyApiResult<MatchResult> {
        let filter = key.filter(kind)?;
        let page = self
            .records
            .find(kind, &FindQuery::new(Some(filter), self.limit))
            .await?;

        let total = page.records.len();
        let hit = page.records.into_iter().find(|r| key.verifies(kind, r));

        debug!(
            "Strict {} lookup by {}: {} candidates, hit={}",
            kind,
            key.label(),
            total,
            hit.is_some()
        );

        Ok(match hit {
            Some(record) => MatchResult::matched(record, Confidence::Exact, 1),
            None => MatchResult::not_found(),
        })
    }
}
