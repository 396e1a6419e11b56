//! Recover the action array from free-form model output
//!
//! Models ignore "JSON only" about as often as they follow it, so the
//! reply is searched in two tiers:
//! 1. a ```` ```json ```` fence wrapping an array, returned verbatim;
//! 2. the first `[` up to the nearest `]`, returned only if it parses.
//!
//! Anything else yields the empty array `[]`.

use crate::core::types::ActionCommand;

/// Opening marker of a JSON code fence
const FENCE_OPEN: &str = "```json";

/// Closing marker of a code fence
const FENCE_CLOSE: &str = "```";

/// The empty action list
pub const EMPTY_ACTIONS: &str = "[]";

/// Extract a JSON array substring from a model reply
///
/// Always returns something: the fenced array, a parseable bare array,
/// or `"[]"`. Fenced content is not validated here.
pub fn extract_json_array(text: &str) -> String {
    if let Some(fenced) = find_fenced_array(text) {
        return fenced.to_string();
    }

    if let Some(candidate) = find_bare_array(text) {
        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
            return candidate.to_string();
        }
    }

    EMPTY_ACTIONS.to_string()
}

/// Decode an extracted array into typed commands
///
/// Used for logging only; the game receives the JSON untouched.
pub fn parse_actions(json: &str) -> serde_json::Result<Vec<ActionCommand>> {
    serde_json::from_str(json)
}

/// Find ```` ```json <ws> [ ... ] <ws> ``` ````, shortest array first
fn find_fenced_array(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(rel) = text[search_from..].find(FENCE_OPEN) {
        let fence = search_from + rel;
        let body = fence + FENCE_OPEN.len();
        let array_start = body + leading_whitespace(&text[body..]);

        if text[array_start..].starts_with('[') {
            if let Some(array_end) = closing_bracket_before_fence(text, array_start) {
                return Some(&text[array_start..array_end]);
            }
        }

        search_from = body;
    }

    None
}

/// Byte index just past the first `]` after `array_start` that is
/// followed by optional whitespace and a closing fence
fn closing_bracket_before_fence(text: &str, array_start: usize) -> Option<usize> {
    let mut offset = array_start + 1;

    while let Some(rel) = text[offset..].find(']') {
        let end = offset + rel + 1;
        let after = &text[end..];
        if after[leading_whitespace(after)..].starts_with(FENCE_CLOSE) {
            return Some(end);
        }
        offset = end;
    }

    None
}

/// First `[` through the nearest following `]`
fn find_bare_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let rel_end = text[start..].find(']')?;
    Some(&text[start..=start + rel_end])
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}
