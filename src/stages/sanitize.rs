use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::DigestError;

const FENCE: &str = "```";

/// Pull the model's literal reply out of a messages payload (`content[0].text`)
pub fn extract_reply_text(payload: &Value) -> Result<&str, DigestError> {
    payload
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| DigestError::Unexpected {
            detail: "Provider payload has no content[0].text field".to_string(),
            raw_response: payload.clone(),
        })
}

/// Reduce a free-form model reply to a single-line JSON object candidate.
///
/// Steps, each on the output of the previous one:
/// 1. trim surrounding whitespace
/// 2. keep only the body of the first code fence wrapping a `{...}` object
/// 3. drop everything before the first `{`
/// 4. drop everything after the last `}`
/// 5. collapse line breaks and whitespace runs to single spaces
///
/// Step 5 also flattens line breaks inside string values.
pub fn sanitize_reply(raw: &str) -> String {
    let text = raw.trim();
    let text = extract_fenced_object(text).unwrap_or(text);

    let text = match text.find('{') {
        Some(start) => &text[start..],
        None => text,
    };
    let text = match text.rfind('}') {
        Some(end) => &text[..=end],
        None => text,
    };

    collapse_whitespace(text)
}

/// Sanitize and parse a model reply into a JSON object.
///
/// No schema validation happens here; any object is accepted.
pub fn parse_reply(raw: &str) -> Result<Map<String, Value>, DigestError> {
    let sanitized = sanitize_reply(raw);
    debug!(
        "Sanitized reply: {} bytes -> {} bytes",
        raw.len(),
        sanitized.len()
    );

    serde_json::from_str::<Map<String, Value>>(&sanitized).map_err(|e| {
        warn!("Reply is not a JSON object after sanitizing: {}", e);
        DigestError::json_decode(e.to_string(), raw, &sanitized)
    })
}

fn extract_fenced_object(text: &str) -> Option<&str> {
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let close = after_open.find(FENCE)?;
        let body = strip_json_tag(&after_open[..close]).trim();

        if body.starts_with('{') && body.ends_with('}') {
            return Some(body);
        }
        rest = &after_open[close + FENCE.len()..];
    }

    None
}

fn strip_json_tag(body: &str) -> &str {
    match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
