//! Find-or-create by natural key.

use super::backend::Backend;
use crate::error::{ResultExt, TwentyApiResult};
use crate::matching::{Confidence, NaturalKey};
use crate::models::{EntityKind, Record};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    Found,
    Created,
}

/// Outcome of a find-or-create.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub action: ReconcileAction,
    pub record: Record,
    pub confidence: Confidence,

    /// Which key matched, when the record already existed
    pub found_by: Option<&'static str>,
}

/// Makes creates idempotent: a record is created only when no existing
/// record carries exactly the same natural key.
pub struct Reconciler<'a> {
    backend: &'a Backend,
}

impl<'a> Reconciler<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// Try each key in order; create from `payload` if none matches exactly.
    ///
    /// Substring or ambiguous hits never count as found, so a near-miss
    /// creates a new record rather than touching an unrelated one.
    pub async fn find_or_create(
        &self,
        kind: EntityKind,
        keys: &[NaturalKey],
        payload: &Map<String, Value>,
    ) -> TwentyApiResult<Reconciled> {
        for key in keys {
            let result = self
                .backend
                .finder
                .find_exact(kind, key)
                .await
                .context(&format!("find or create {}", kind.singular()))?;

            if let Some(record) = result.record {
                if result.confidence == Confidence::Exact {
                    info!(
                        "{} {} already exists (matched by {})",
                        kind.label(),
                        record.id().unwrap_or_default(),
                        key.label()
                    );
                    return Ok(Reconciled {
                        action: ReconcileAction::Found,
                        record,
                        confidence: Confidence::Exact,
                        found_by: Some(key.label()),
                    });
                }
            }
        }

        let record = self.backend.records.create(kind, payload).await?;
        Ok(Reconciled {
            action: ReconcileAction::Created,
            record,
            confidence: Confidence::Exact,
            found_by: None,
        })
    }
}
