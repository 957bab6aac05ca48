//! Encoding of the persisted activity list: one JSON array, newest first.

use crate::types::ActivityRecord;

/// Decode a stored list. A blank value reads as an empty list.
pub fn decode(raw: &str) -> Result<Vec<ActivityRecord>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}

pub fn encode(records: &[ActivityRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Two-space indented JSON, the layout used for exports.
pub fn encode_pretty(records: &[ActivityRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}
