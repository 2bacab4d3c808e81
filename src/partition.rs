//! Partition key resolution.
//!
//! Partitioning by a business key (for this pipeline, the city name) routes
//! all events about the same entity to the same stream shard, which is what
//! gives downstream consumers per-entity ordering.

use serde_json::Value;

use crate::record::NormalizedRecord;

/// Key used when the configured field is absent or renders empty.
///
/// The stream service rejects empty partition keys at publish time, so the
/// resolver guarantees a non-empty result.
pub const FALLBACK_PARTITION_KEY: &str = "unknown";

/// Resolve the partition key for one normalized record.
///
/// Looks up `key_field` and renders its value canonically: strings pass
/// through unquoted, numbers render as their decimal text, booleans and null
/// as their JSON literals, and containers as compact JSON. A missing field
/// or an empty rendering falls back to [`FALLBACK_PARTITION_KEY`].
pub fn resolve_key(record: &NormalizedRecord, key_field: &str) -> String {
    let rendered = match record.get(key_field) {
        None => return FALLBACK_PARTITION_KEY.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if rendered.is_empty() {
        FALLBACK_PARTITION_KEY.to_string()
    } else {
        rendered
    }
}
