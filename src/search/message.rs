use super::query::ParsedQuery;

/// Human-readable summary of a search, worded by result count.
pub fn search_message(raw_query: &str, parsed: &ParsedQuery, count: usize) -> String {
    let mut parts = Vec::new();

    if let Some(service) = &parsed.service_type {
        parts.push(format!("looking for {service}"));
    }

    if !parsed.keywords.is_empty() {
        let mut keywords = parsed
            .keywords
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if parsed.keywords.len() > 3 {
            keywords.push_str(" and more");
        }
        parts.push(format!("with skills in {keywords}"));
    }

    if let Some(location) = &parsed.location {
        parts.push(format!("near {location}"));
    }
    if let Some(max) = parsed.max_budget {
        parts.push(format!("under ${max}"));
    }
    if let Some(min) = parsed.min_budget {
        parts.push(format!("above ${min}"));
    }

    let description = if parts.is_empty() {
        raw_query.to_string()
    } else {
        parts.join(" ")
    };

    match count {
        0 => format!(
            "Sorry, we couldn't find any freelancers {description}. Try adjusting your search criteria."
        ),
        1 => format!("Found 1 freelancer {description}. Here's your perfect match!"),
        n => format!("Found {n} freelancers {description}. Here are the best matches for you!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_at_most_three_keywords() {
        let parsed = ParsedQuery {
            service_type: Some("photography".into()),
            keywords: vec!["wedding".into(), "outdoor".into(), "drone".into(), "film".into()],
            location: Some("Austin".into()),
            max_budget: Some(300),
            ..Default::default()
        };
        assert_eq!(
            search_message("q", &parsed, 4),
            "Found 4 freelancers looking for photography with skills in wedding, outdoor, drone and more near Austin under $300. Here are the best matches for you!"
        );
    }

    #[test]
    fn wording_depends_on_count() {
        let parsed = ParsedQuery {
            min_budget: Some(50),
            ..Default::default()
        };
        assert_eq!(
            search_message("q", &parsed, 1),
            "Found 1 freelancer above $50. Here's your perfect match!"
        );
        assert!(search_message("q", &parsed, 0).starts_with("Sorry, we couldn't find any freelancers above $50."));
    }

    #[test]
    fn falls_back_to_raw_query() {
        assert_eq!(
            search_message("zz top", &ParsedQuery::default(), 0),
            "Sorry, we couldn't find any freelancers zz top. Try adjusting your search criteria."
        );
    }
}
