//! Pulling JSON out of model replies.
//!
//! Even in JSON mode, replies sometimes arrive fenced in markdown or padded
//! with a sentence of preamble. These helpers find the JSON payload first and
//! parse it second.

use lullaby_error::{LullabyResult, StoryError, StoryErrorKind};
use serde_json::{Map, Value};

/// Find the JSON payload in a model reply.
///
/// Strategies, in order:
/// 1. A fenced ```` ```json ```` block
/// 2. The first balanced `{ ... }` object
/// 3. The first balanced `[ ... ]` array
///
/// # Errors
///
/// Returns [`StoryErrorKind::UnparseableReply`] when no candidate is found.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::extract_json;
///
/// let reply = "Here you go:\n```json\n{\"is_safe\": true}\n```";
/// assert_eq!(extract_json(reply).unwrap(), "{\"is_safe\": true}");
///
/// let padded = "Sure! {\"verdict\": \"ACCEPT\"} Hope that helps.";
/// assert_eq!(extract_json(padded).unwrap(), "{\"verdict\": \"ACCEPT\"}");
/// ```
pub fn extract_json(reply: &str) -> LullabyResult<String> {
    if let Some(json) = fenced_block(reply) {
        return Ok(json);
    }
    if let Some(json) = balanced(reply, '{', '}') {
        return Ok(json);
    }
    if let Some(json) = balanced(reply, '[', ']') {
        return Ok(json);
    }

    tracing::error!(reply_length = reply.len(), "No JSON found in model reply");
    Err(StoryError::new(StoryErrorKind::UnparseableReply(format!(
        "no JSON found in reply of {} bytes",
        reply.len()
    )))
    .into())
}

/// Parse a reply into a JSON object, yielding an empty object on any failure.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::safe_parse_json;
///
/// let parsed = safe_parse_json("Scores follow: {\"scores\": {\"overall\": 8}}");
/// assert_eq!(parsed["scores"]["overall"], 8);
/// assert!(safe_parse_json("no json here").is_empty());
/// ```
pub fn safe_parse_json(reply: &str) -> Map<String, Value> {
    extract_json(reply)
        .ok()
        .and_then(|json| serde_json::from_str::<Value>(&json).ok())
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default()
}

/// Deserialize a JSON string into `T`.
///
/// # Errors
///
/// Returns [`StoryErrorKind::UnparseableReply`] with a preview of the input.
pub fn parse_json<T>(json: &str) -> LullabyResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json).map_err(|e| {
        let preview: String = json.chars().take(100).collect();
        tracing::error!(error = %e, json_preview = %preview, "JSON parsing failed");
        StoryError::new(StoryErrorKind::UnparseableReply(format!(
            "{e} (JSON: {preview}...)"
        )))
        .into()
    })
}

fn fenced_block(reply: &str) -> Option<String> {
    const FENCE: &str = "```json";
    let start = reply.find(FENCE)? + FENCE.len();
    let body = &reply[start..];
    // An unterminated fence usually means the reply was cut off.
    let end = body.find("```").unwrap_or(body.len());
    let content = body[..end].trim();
    (!content.is_empty()).then(|| content.to_string())
}

fn balanced(reply: &str, open: char, close: char) -> Option<String> {
    let start = reply.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in reply[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(reply[start..end].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
