//! Tolerant model-reply parser.
//!
//! Models wrap JSON in markdown fences, prepend prose, or abandon the schema
//! entirely. Parsing is a total function over increasingly forgiving stages;
//! the worst possible reply yields the empty intent, which the loop treats as
//! malformed data rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::intent::{Command, ParsedIntent};

/// ReAct-style fallback: some models revert to `Action:` / `Action Input:`
/// lines no matter what the prompt demands.
static REACT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)Action:\s*([\w.\-]+)\s*(?:Action Input:\s*(.*))?$")
        .unwrap_or_else(|_| unreachable!("pattern is static"))
});

/// Parse one raw model reply into an intent. Never fails.
pub fn parse(raw: &str) -> ParsedIntent {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedIntent::default();
    }

    // Stage 1: the reply is exactly the JSON we asked for.
    if let Some(intent) = decode(trimmed) {
        return intent;
    }

    // Stage 2: JSON inside a markdown fence.
    if let Some(fenced) = extract_fenced(trimmed) {
        if let Some(intent) = decode(fenced) {
            debug!("Recovered intent from fenced code block");
            return intent;
        }
    }

    // Stage 3: first-to-last-brace substring.
    if let Some(substring) = extract_braced(trimmed) {
        if let Some(intent) = decode(substring) {
            debug!("Recovered intent from brace-delimited substring");
            return intent;
        }
    }

    // Stage 4: schema abandoned entirely.
    if let Some(intent) = parse_react(trimmed) {
        debug!("Recovered intent from ReAct-style text");
        return intent;
    }
    if !trimmed.contains('{') {
        debug!("Treating brace-free prose as a final answer");
        return ParsedIntent::answer_only(trimmed);
    }

    ParsedIntent::default()
}

/// Strict decode; an object with none of the recognized fields is empty, not
/// an answer.
fn decode(candidate: &str) -> Option<ParsedIntent> {
    serde_json::from_str::<ParsedIntent>(candidate).ok()
}

/// The content of the first ``` fence, tolerating a language tag.
fn extract_fenced(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after_ticks = &raw[start + 3..];
    let body_start = after_ticks.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_ticks[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Substring from the first `{` to the last `}`.
fn extract_braced(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

fn parse_react(raw: &str) -> Option<ParsedIntent> {
    let captures = REACT_PATTERN.captures(raw)?;
    let name = captures.get(1)?.as_str().to_string();

    let params = match captures.get(2).map(|m| m.as_str().trim()) {
        Some(input) if !input.is_empty() => match serde_json::from_str::<Value>(input) {
            Ok(Value::Object(map)) => map,
            _ => {
                let mut map = Map::new();
                map.insert("input".to_string(), Value::String(input.to_string()));
                map
            }
        },
        _ => Map::new(),
    };

    let match_start = captures
        .get(0)
        .map(|m| m.start())
        .unwrap_or(0);
    let thought = raw[..match_start].trim();

    Some(ParsedIntent {
        thought: (!thought.is_empty()).then(|| thought.to_string()),
        command: Some(Command::new(name, params)),
        canvas: None,
        answer: None,
    })
}
