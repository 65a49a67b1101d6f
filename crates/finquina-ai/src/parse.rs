//! Model output parsing.
//!
//! Models are asked for bare JSON but often wrap it in a Markdown code
//! block, add a sentence before it, or leave a trailing comma. Parsing is
//! lenient about the envelope and strict about the payload.

use serde::de::DeserializeOwned;

use crate::error::AiError;

/// Parse a JSON payload out of raw model text.
///
/// # Errors
///
/// Returns [`AiError::Parse`] when no valid JSON of the expected shape
/// can be found.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, AiError> {
    let json = extract_json(raw);
    serde_json::from_str(json).or_else(|first| {
        serde_json::from_str(&strip_trailing_commas(json))
            .map_err(|e| AiError::Parse(format!("{first}; after cleanup: {e}")))
    })
}

/// Locate the JSON inside model text.
///
/// Prefers a fenced code block, then the outermost `{...}` span, then the
/// trimmed text itself.
pub fn extract_json(text: &str) -> &str {
    if let Some(inner) = fenced_block(text) {
        return inner;
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text.get(start..=end).unwrap_or(text),
        _ => text.trim(),
    }
}

/// Body of the first ```` ``` ```` block, without the language tag line.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = text.get(open..)?;
    let newline = after_open.find('\n')?;
    let body = after_open.get(newline..)?;
    let close = body.find("```")?;
    body.get(..close).map(str::trim).filter(|b| !b.is_empty())
}

/// Remove commas that directly precede `}` or `]`.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (index, c) in text.char_indices() {
        if c == ',' {
            let closes = text
                .get(index..)
                .and_then(|rest| rest.get(1..))
                .map(str::trim_start)
                .is_some_and(|rest| rest.starts_with('}') || rest.starts_with(']'));
            if closes {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Clean a one-line translation: trim, drop quotes and full stops.
pub fn clean_translation(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '"' && *c != '.').collect()
}
