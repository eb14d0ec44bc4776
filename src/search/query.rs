use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::ai::{AiEngine, response};

/// Structured intent extracted from a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub service_type: Option<String>,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub min_budget: Option<i64>,
    pub max_budget: Option<i64>,
    pub urgency: Option<String>,
}

const SERVICE_TYPES: &[(&str, &[&str])] = &[
    ("photography", &["photo", "photographer", "photography"]),
    ("videography", &["video", "videographer", "videography"]),
    ("tutoring", &["tutor", "tutoring", "teach"]),
    ("design", &["design", "designer"]),
    ("repair", &["repair", "fix", "technician"]),
];

const CITIES: &[&str] = &[
    "new york",
    "los angeles",
    "chicago",
    "houston",
    "phoenix",
    "austin",
    "seattle",
    "boston",
    "denver",
    "portland",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "need", "looking", "want", "find", "have", "near", "in", "a",
    "an", "under", "from",
];

static MAX_BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"under\s*\$?(\d+)").expect("max budget regex is valid"));
static MIN_BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s*\$?(\d+)").expect("min budget regex is valid"));
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word regex is valid"));

/// Parse with the AI backend when available, otherwise (or on any failure) locally.
pub async fn parse_query(raw: &str, ai: &AiEngine) -> ParsedQuery {
    if !ai.is_enabled() {
        info!("Using fallback query parser (AI not configured)");
        return fallback_parse(raw);
    }

    match ai.generate(&parse_prompt(raw)).await {
        Ok(answer) => match response::extract_json_object(&answer) {
            Some(map) => {
                let parsed = from_ai_object(&map);
                info!("AI parsed query: {:?}", parsed);
                parsed
            }
            None => {
                warn!("AI query parse returned no JSON object, using fallback");
                fallback_parse(raw)
            }
        },
        Err(e) => {
            warn!("AI query parse failed: {}, using fallback", e);
            fallback_parse(raw)
        }
    }
}

fn parse_prompt(raw: &str) -> String {
    format!(
        "You are a search intent extractor for a local freelancer platform.\n\
         Extract structured data from this user query: \"{raw}\"\n\n\
         Return ONLY valid JSON with these fields:\n\
         - service_type: string (e.g. photography, tutoring, videography, repair)\n\
         - keywords: list of strings\n\
         - location: string or null\n\
         - min_budget: integer or null\n\
         - max_budget: integer or null\n\
         - urgency: string or null (e.g. \"today\", \"this week\")\n\n\
         Return nothing else, no explanation, no markdown."
    )
}

fn from_ai_object(map: &Map<String, Value>) -> ParsedQuery {
    ParsedQuery {
        service_type: text_field(map.get("service_type")),
        keywords: map
            .get("keywords")
            .map(crate::models::string_list)
            .unwrap_or_default(),
        location: text_field(map.get("location")),
        min_budget: number_field(map.get("min_budget")),
        max_budget: number_field(map.get("max_budget")),
        urgency: text_field(map.get("urgency")),
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn number_field(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    }
}

/// Deterministic, network-free parser.
pub fn fallback_parse(raw: &str) -> ParsedQuery {
    let query = raw.to_lowercase();

    let capture = |re: &Regex| {
        re.captures(&query)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
    };
    let max_budget = capture(&MAX_BUDGET_RE);
    let min_budget = capture(&MIN_BUDGET_RE);

    let service_type = SERVICE_TYPES
        .iter()
        .find(|(_, words)| words.iter().any(|w| query.contains(w)))
        .map(|(name, _)| name.to_string());

    let location = CITIES
        .iter()
        .find(|city| query.contains(*city))
        .map(|city| title_case(city));

    let keywords = WORD_RE
        .find_iter(&query)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect();

    ParsedQuery {
        service_type,
        keywords,
        location,
        min_budget,
        max_budget,
        urgency: None,
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing;

    #[test]
    fn fallback_extracts_everything() {
        let parsed = fallback_parse("I need a wedding photographer in Austin under $300");
        assert_eq!(parsed.service_type.as_deref(), Some("photography"));
        assert_eq!(parsed.location.as_deref(), Some("Austin"));
        assert_eq!(parsed.max_budget, Some(300));
        assert_eq!(parsed.min_budget, None);
        assert_eq!(parsed.urgency, None);
        assert_eq!(parsed.keywords, vec!["wedding", "photographer", "austin"]);
    }

    #[test]
    fn fallback_first_service_type_wins() {
        // "video" and "fix" both appear; videography comes first in the table.
        let parsed = fallback_parse("fix my video from $50");
        assert_eq!(parsed.service_type.as_deref(), Some("videography"));
        assert_eq!(parsed.min_budget, Some(50));
    }

    #[test]
    fn fallback_title_cases_multi_word_cities() {
        let parsed = fallback_parse("math tutor new york");
        assert_eq!(parsed.location.as_deref(), Some("New York"));
        assert_eq!(parsed.service_type.as_deref(), Some("tutoring"));
    }

    #[test]
    fn fallback_is_deterministic_and_plain_queries_have_no_filters() {
        let a = fallback_parse("gardening help");
        assert_eq!(a, fallback_parse("gardening help"));
        assert_eq!(a.service_type, None);
        assert_eq!(a.location, None);
        assert_eq!(a.keywords, vec!["gardening", "help"]);
    }

    #[tokio::test]
    async fn ai_answer_is_used_when_it_parses() {
        let ai = testing::engine(vec![Ok(
            "```json\n{\"service_type\": \"tutoring\", \"keywords\": [\"math\"], \"max_budget\": \"40\"}\n```",
        )]);
        let parsed = parse_query("math help", &ai).await;
        assert_eq!(parsed.service_type.as_deref(), Some("tutoring"));
        assert_eq!(parsed.keywords, vec!["math"]);
        assert_eq!(parsed.max_budget, Some(40));
        assert_eq!(parsed.location, None);
    }

    #[tokio::test]
    async fn malformed_ai_answer_falls_back() {
        let ai = testing::engine(vec![Ok("I think they want a photographer.")]);
        let parsed = parse_query("photographer in Seattle", &ai).await;
        assert_eq!(parsed, fallback_parse("photographer in Seattle"));
    }

    #[tokio::test]
    async fn ai_error_falls_back() {
        let ai = testing::engine(vec![Err("quota exceeded")]);
        let parsed = parse_query("repair under 80", &ai).await;
        assert_eq!(parsed.max_budget, Some(80));
        assert_eq!(parsed.service_type.as_deref(), Some("repair"));
    }
}
