//! Find, update and delete through the unified finder.

use super::backend::{id_of, Backend};
use super::merge::merge_patch;
use super::outputs::{DeleteOutput, FindOutput, UpdateOutput};
use super::params::KeyParams;
use crate::error::TwentyApiResult;
use crate::matching::SearchCriterion;
use crate::models::{EntityKind, Record};
use serde_json::{Map, Value};
use std::future::Future;
use tracing::warn;

pub async fn find(backend: &Backend, kind: EntityKind, params: &KeyParams) -> TwentyApiResult<FindOutput> {
    let criterion = params.criterion(kind)?;
    let include_related = params.include_related.unwrap_or(true);
    let result = backend.finder.find(kind, &criterion, include_related).await?;
    Ok(FindOutput::new(kind, &criterion, result))
}

/// Update the record `params` identifies.
///
/// `build_patch` runs only after a match and may do its own lookups. A
/// miss, or a match below `min_confidence`, is a soft failure.
pub async fn update<F, Fut>(
    backend: &Backend,
    kind: EntityKind,
    params: &KeyParams,
    min_confidence: f64,
    build_patch: F,
) -> TwentyApiResult<UpdateOutput>
where
    F: FnOnce(Record) -> Fut,
    Fut: Future<Output = TwentyApiResult<(Record, Map<String, Value>)>>,
{
    let criterion = params.criterion(kind)?;
    let result = backend.finder.find(kind, &criterion, false).await?;

    let Some(existing) = result.record else {
        warn!("No {} matched {} {}", kind, criterion.method, criterion.value);
        return Ok(UpdateOutput::skipped(
            kind,
            &criterion,
            result.confidence,
            &format!("{} not found", kind.label()),
        ));
    };
    if !result.confidence.meets(min_confidence) {
        return Ok(UpdateOutput::skipped(
            kind,
            &criterion,
            result.confidence,
            "No exact match found, update cancelled",
        ));
    }

    let id = id_of(&existing)?;
    let (existing, patch) = build_patch(existing).await?;
    let merged = merge_patch(&existing, &patch);
    let updated = backend.records.update(kind, &id, &merged).await?;

    Ok(UpdateOutput::updated(
        kind,
        &criterion,
        existing,
        result.confidence,
        updated,
    ))
}

/// Delete the record `params` identifies, subject to `min_confidence`.
pub async fn delete(
    backend: &Backend,
    kind: EntityKind,
    params: &KeyParams,
    min_confidence: f64,
) -> TwentyApiResult<DeleteOutput> {
    let criterion: SearchCriterion = params.criterion(kind)?;
    let result = backend.finder.find(kind, &criterion, false).await?;

    let Some(existing) = result.record else {
        return Ok(DeleteOutput::skipped(
            kind,
            &criterion,
            result.confidence,
            &format!("{} not found", kind.label()),
        ));
    };
    if !result.confidence.meets(min_confidence) {
        return Ok(DeleteOutput::skipped(
            kind,
            &criterion,
            result.confidence,
            "No exact match found, delete cancelled",
        ));
    }

    let id = id_of(&existing)?;
    let deleted = backend.records.delete(kind, &id).await?;
    Ok(DeleteOutput::deleted(kind, &criterion, result.confidence, deleted))
}
