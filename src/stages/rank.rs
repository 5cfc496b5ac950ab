use serde_json::{Map, Value};

use crate::models::{score_of, DigestResult};

/// Reorder `insights` by `confidence_score` and `quotes` by `relevance_score`,
/// highest first.
///
/// Missing scores count as 0 and ties keep their original order. Missing keys,
/// or keys that do not hold an array, are left as they are.
pub fn rank_digest(object: Map<String, Value>) -> DigestResult {
    let mut result = DigestResult::new(object);
    let map = result.as_map_mut();

    if let Some(Value::Array(insights)) = map.get_mut("insights") {
        sort_by_score(insights, "confidence_score");
    }
    if let Some(Value::Array(quotes)) = map.get_mut("quotes") {
        sort_by_score(quotes, "relevance_score");
    }

    result
}

/// Stable descending sort on a numeric field of each entry
fn sort_by_score(entries: &mut [Value], field: &str) {
    let score = |entry: &Value| entry.get(field).map(score_of).unwrap_or(0.0);
    entries.sort_by(|a, b| score(b).total_cmp(&score(a)));
}
