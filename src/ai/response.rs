//! Lenient parsing of model output.
//!
//! Models wrap JSON in markdown fences, add prose around it, or stop halfway
//! through a list. These helpers recover what they can and return `None`
//! otherwise.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("uuid regex is valid")
});

/// Remove a surrounding ```/```json fence if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

/// First `{ ... }` span of the text parsed as a JSON object.
pub fn extract_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let text = strip_code_fence(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// First `[ ... ]` span of the text parsed as a JSON list.
pub fn extract_json_list(text: &str) -> Option<Vec<Value>> {
    let text = strip_code_fence(text);
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Ids named in a model's answer, in answer order, without duplicates.
///
/// The answer's id list is the first bracketed span that names an id or is
/// empty. Other bracketed prose such as `[Note]` is skipped. Returns `None`
/// when no such span exists, which callers treat as a failed call; `[]`
/// yields `Some(vec![])`. A list truncated before its closing bracket still
/// yields the ids it managed to name.
pub fn parse_id_list(text: &str) -> Option<Vec<Uuid>> {
    let text = strip_code_fence(text);

    text.match_indices('[').find_map(|(start, _)| {
        let body = &text[start + 1..];
        let body = match body.find(']') {
            Some(end) => &body[..end],
            None => body,
        };

        if body.trim().is_empty() {
            return Some(Vec::new());
        }

        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = UUID_RE
            .find_iter(body)
            .filter_map(|m| Uuid::parse_str(m.as_str()).ok())
            .filter(|id| seen.insert(*id))
            .collect();
        (!ids.is_empty()).then_some(ids)
    })
}

/// Non-empty strings from a JSON list answer.
pub fn parse_string_list(text: &str) -> Option<Vec<String>> {
    let items = extract_json_list(text)?;
    Some(
        items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "3f2b8c1e-0d5a-4e7b-9c61-2a4d8e9f0b11";
    const B: &str = "8a7d6c5b-4e3f-4a2b-8c1d-0e9f8a7b6c5d";

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  plain "), "plain");
    }

    #[test]
    fn object_is_found_inside_prose() {
        let map = extract_json_object("Sure! Here you go: {\"location\": \"Austin\"} hope it helps")
            .unwrap();
        assert_eq!(map["location"], "Austin");
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("[1, 2]").is_none());
    }

    #[test]
    fn id_list_keeps_order_and_drops_duplicates() {
        let text = format!("```json\n[\"{B}\", \"{A}\", \"{B}\"]\n```");
        let ids = parse_id_list(&text).unwrap();
        assert_eq!(ids, vec![Uuid::parse_str(B).unwrap(), Uuid::parse_str(A).unwrap()]);
    }

    #[test]
    fn truncated_id_list_keeps_complete_ids() {
        let text = format!("[\"{A}\", \"{B}\", \"8a7d6c5b-4e3f");
        let ids = parse_id_list(&text).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn empty_list_differs_from_no_list() {
        assert_eq!(parse_id_list("[]"), Some(vec![]));
        assert_eq!(parse_id_list("None of these jobs fit."), None);
        assert_eq!(parse_id_list("[\"no ids here\"]"), None);
    }

    #[test]
    fn bracketed_prose_before_the_list_is_skipped() {
        let text = format!("[Note] after review: [\"{A}\"]");
        assert_eq!(parse_id_list(&text), Some(vec![Uuid::parse_str(A).unwrap()]));

        assert_eq!(parse_id_list("[Note] none of them fit: [ ]"), Some(vec![]));
        assert_eq!(parse_id_list("[Note] I could not decide."), None);
    }

    #[test]
    fn string_list_skips_blanks() {
        let reasons = parse_string_list("```json\n[\"Fits your video work\", \"\", 3]\n```").unwrap();
        assert_eq!(reasons, vec!["Fits your video work", "3"]);
        assert!(parse_string_list("nope").is_none());
    }
}
