//! Response sanitizer — the one place free-form model output becomes data.
//!
//! Models like to wrap JSON in markdown fences. `strip_fence` removes a
//! leading ```` ``` ```` (optionally tagged) and the matching trailing fence;
//! `parse_json` then decodes strictly. Failures come back as values.

use serde::de::DeserializeOwned;

/// Longest excerpt of the offending text kept in a failure.
const EXCERPT_LEN: usize = 120;

/// A response that could not be decoded.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unparsable response: {reason} (starts with {excerpt:?})")]
pub struct ParseFailure {
    pub reason: String,
    pub excerpt: String,
}

/// Strip a surrounding markdown fence. `tag` is the language tag to accept
/// after the opening fence ("json", "python"); an untagged fence is accepted too.
/// Text without a leading fence is returned trimmed and otherwise untouched.
pub fn strip_fence<'a>(raw: &'a str, tag: &str) -> &'a str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix(tag).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Strip a `json` fence and decode strictly into `T`.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, ParseFailure> {
    let body = strip_fence(raw, "json");
    if body.is_empty() {
        return Err(ParseFailure {
            reason: "empty response".into(),
            excerpt: String::new(),
        });
    }
    serde_json::from_str(body).map_err(|e| ParseFailure {
        reason: e.to_string(),
        excerpt: body.chars().take(EXCERPT_LEN).collect(),
    })
}
