//! Match confidence.
//!
//! Confidence is a fixed lookup, not a computed score. A result set is run
//! through [`MatchRule::ORDER`]; the first rule that applies picks the
//! record and the confidence.

use crate::models::Record;
use serde::{Serialize, Serializer};

/// How sure the finder is that it picked the intended record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    /// Nothing matched
    NoMatch,
    /// Several matches; the first was taken
    Ambiguous,
    /// Exactly one match
    Unique,
    /// The natural key matched exactly
    Exact,
}

impl Confidence {
    pub fn value(&self) -> f64 {
        match self {
            Self::NoMatch => 0.0,
            Self::Ambiguous => 0.8,
            Self::Unique => 0.95,
            Self::Exact => 1.0,
        }
    }

    /// Whether this is at least `threshold` (`0.0..=1.0`).
    pub fn meets(&self, threshold: f64) -> bool {
        self.value() >= threshold
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// Result of a find. `found == false` implies no record and no confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub found: bool,
    pub record: Option<Record>,
    pub confidence: Confidence,
    pub total_matches: usize,
}

impl MatchResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            record: None,
            confidence: Confidence::NoMatch,
            total_matches: 0,
        }
    }

    pub fn matched(record: Record, confidence: Confidence, total_matches: usize) -> Self {
        Self {
            found: true,
            record: Some(record),
            confidence,
            total_matches,
        }
    }

    /// The matched record's id.
    pub fn record_id(&self) -> Option<&str> {
        self.record.as_ref().and_then(Record::id)
    }
}

/// Case-insensitive equality on one field, used by name searches that
/// prefer an exact hit over the first substring hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactName<'a> {
    pub field: &'a str,
    pub value: &'a str,
}

impl ExactName<'_> {
    fn matches(&self, record: &Record) -> bool {
        record
            .get_str(self.field)
            .map(|v| v.to_lowercase() == self.value.to_lowercase())
            .unwrap_or(false)
    }
}

/// Scoring rules, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// A record equals the searched name, ignoring case
    ExactName,
    /// No records
    Empty,
    /// One record
    Single,
    /// Several records; backend order decides
    FirstOfMany,
}

impl MatchRule {
    pub const ORDER: [MatchRule; 4] = [
        Self::ExactName,
        Self::Empty,
        Self::Single,
        Self::FirstOfMany,
    ];

    fn apply(
        &self,
        records: &[Record],
        exact: Option<ExactName<'_>>,
    ) -> Option<(Option<usize>, Confidence)> {
        match self {
            Self::ExactName => {
                let exact = exact?;
                records
                    .iter()
                    .position(|r| exact.matches(r))
                    .map(|i| (Some(i), Confidence::Exact))
            }
            Self::Empty => records.is_empty().then_some((None, Confidence::NoMatch)),
            Self::Single => (records.len() == 1).then_some((Some(0), Confidence::Unique)),
            Self::FirstOfMany => (records.len() > 1).then_some((Some(0), Confidence::Ambiguous)),
        }
    }
}

/// Score a result set. `total` is the backend's match count, if larger
/// than the page.
pub fn score(records: Vec<Record>, total: usize, exact: Option<ExactName<'_>>) -> MatchResult {
    let total_matches = total.max(records.len());

    for rule in MatchRule::ORDER {
        if let Some((index, confidence)) = rule.apply(&records, exact) {
            return match index.and_then(|i| records.into_iter().nth(i)) {
                Some(record) => MatchResult::matched(record, confidence, total_matches),
                None => MatchResult::not_found(),
            };
        }
    }
    MatchResult::not_found()
}
