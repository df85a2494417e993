//! Patch merging for updates by natural key.

use crate::models::Record;
use serde_json::{Map, Value};

/// Overlay `patch` onto the matching fields of `existing`.
///
/// Nested objects (names, phones, addresses, amounts) are merged key by
/// key, so a patch carrying only `name.firstName` keeps the stored last
/// name. Everything else in the patch replaces the stored value. Fields
/// absent from the patch are left out of the result.
pub fn merge_patch(existing: &Record, patch: &Map<String, Value>) -> Map<String, Value> {
    patch
        .iter()
        .map(|(key, incoming)| {
            let merged = match (existing.fields().get(key), incoming) {
                (Some(Value::Object(current)), Value::Object(incoming)) => {
                    let mut combined = current.clone();
                    for (k, v) in incoming {
                        combined.insert(k.clone(), v.clone());
                    }
                    Value::Object(combined)
                }
                _ => incoming.clone(),
            };
            (key.clone(), merged)
        })
        .collect()
}
