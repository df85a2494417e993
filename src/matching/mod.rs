//! Record matching for lookups by search criterion or natural key.
//!
//! The finder turns a validated [`SearchCriterion`] into a backend filter,
//! runs it, and scores the result set with a fixed confidence table.

pub mod confidence;
pub mod criterion;
pub mod finder;

pub use confidence::{Confidence, MatchResult};
pub use criterion::{SearchCriterion, SearchMethod, MAX_FIELD_PATH_SEGMENTS};
pub use finder::{NaturalKey, UnifiedFinder};
