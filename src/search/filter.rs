use super::FreelancerSnapshot;
use super::query::ParsedQuery;

/// Predicate built from a parsed query plus the explicit search parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub service_type: Option<String>,
    pub location: Option<String>,
    pub keywords: Vec<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    /// Compared against the stored lowercase availability value.
    pub availability: Option<String>,
    pub min_rating: Option<f64>,
}

/// A zero or negative budget bound means no bound.
fn budget(value: Option<i64>) -> Option<f64> {
    value.filter(|b| *b > 0).map(|b| b as f64)
}

impl SearchFilter {
    pub fn from_parsed(
        parsed: &ParsedQuery,
        availability: Option<&str>,
        min_rating: Option<&str>,
    ) -> Self {
        Self {
            service_type: lowered(parsed.service_type.as_deref()),
            location: lowered(parsed.location.as_deref()),
            keywords: parsed
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            min_budget: budget(parsed.min_budget),
            max_budget: budget(parsed.max_budget),
            availability: lowered(availability),
            // Unparseable ratings are ignored rather than rejected.
            min_rating: min_rating.and_then(|r| r.trim().parse().ok()),
        }
    }

    pub fn matches(&self, s: &FreelancerSnapshot) -> bool {
        let p = &s.profile;
        let display_name = p.display_name.to_lowercase();
        let tagline = p.tagline.to_lowercase();
        let bio = p.bio.to_lowercase();
        let in_text = |needle: &str| {
            display_name.contains(needle) || tagline.contains(needle) || bio.contains(needle)
        };

        if let Some(service) = &self.service_type {
            let in_catalog = s
                .category_names
                .iter()
                .chain(s.skill_names.iter())
                .any(|name| name.to_lowercase().contains(service.as_str()));
            if !in_catalog && !in_text(service) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !p.city.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }

        if !self.keywords.is_empty() && !self.keywords.iter().any(|k| in_text(k)) {
            return false;
        }

        if let Some(max) = self.max_budget {
            if !p.price_max.is_some_and(|price| price <= max) {
                return false;
            }
        }

        if let Some(min) = self.min_budget {
            if !p.price_min.is_some_and(|price| price >= min) {
                return false;
            }
        }

        if let Some(availability) = &self.availability {
            if p.availability.to_string() != *availability {
                return false;
            }
        }

        self.min_rating.is_none_or(|min| s.avg_rating >= min)
    }
}

/// Filters of the freelancer browse listing. Every field narrows independently.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    /// Only set when the slug names a known category.
    pub category_slug: Option<String>,
    pub city: Option<String>,
    pub availability: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl BrowseFilter {
    pub fn new(
        category_slug: Option<String>,
        city: Option<&str>,
        availability: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
    ) -> Self {
        Self {
            category_slug,
            city: lowered(city),
            availability: lowered(availability),
            min_price: min_price.and_then(|p| p.trim().parse().ok()),
            max_price: max_price.and_then(|p| p.trim().parse().ok()),
        }
    }

    pub fn matches(&self, s: &FreelancerSnapshot) -> bool {
        let p = &s.profile;

        if let Some(slug) = &self.category_slug {
            if !s.category_slugs.iter().any(|c| c == slug) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !p.city.to_lowercase().contains(city.as_str()) {
                return false;
            }
        }
        if let Some(availability) = &self.availability {
            if p.availability.to_string() != *availability {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if !p.price_min.is_some_and(|price| price >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !p.price_max.is_some_and(|price| price <= max) {
                return false;
            }
        }
        true
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::freelancer_profiles::Availability;
    use crate::search::fixtures::{profile, snapshot};

    fn photographer() -> FreelancerSnapshot {
        let mut p = profile("Ana Lens");
        p.tagline = "Wedding and portrait photographer".into();
        p.city = "Austin".into();
        p.price_min = Some(100.0);
        p.price_max = Some(250.0);
        let mut s = snapshot(p);
        s.category_names = vec!["Photography".into()];
        s.avg_rating = 4.5;
        s
    }

    fn parsed(service: Option<&str>, keywords: &[&str]) -> ParsedQuery {
        ParsedQuery {
            service_type: service.map(str::to_string),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn service_type_matches_category_or_text() {
        let s = photographer();
        assert!(SearchFilter::from_parsed(&parsed(Some("photography"), &[]), None, None).matches(&s));
        assert!(SearchFilter::from_parsed(&parsed(Some("portrait"), &[]), None, None).matches(&s));
        assert!(!SearchFilter::from_parsed(&parsed(Some("tutoring"), &[]), None, None).matches(&s));
    }

    #[test]
    fn keywords_are_an_or_group() {
        let s = photographer();
        let f = SearchFilter::from_parsed(&parsed(None, &["drone", "wedding"]), None, None);
        assert!(f.matches(&s));
        let f = SearchFilter::from_parsed(&parsed(None, &["drone", "plumbing"]), None, None);
        assert!(!f.matches(&s));
    }

    #[test]
    fn budget_bounds_require_prices() {
        let s = photographer();
        let mut q = parsed(None, &[]);
        q.max_budget = Some(300);
        assert!(SearchFilter::from_parsed(&q, None, None).matches(&s));
        q.max_budget = Some(200);
        assert!(!SearchFilter::from_parsed(&q, None, None).matches(&s));

        let mut unpriced = photographer();
        unpriced.profile.price_max = None;
        q.max_budget = Some(10_000);
        assert!(!SearchFilter::from_parsed(&q, None, None).matches(&unpriced));

        let mut q = parsed(None, &[]);
        q.min_budget = Some(100);
        assert!(SearchFilter::from_parsed(&q, None, None).matches(&s));
        q.min_budget = Some(150);
        assert!(!SearchFilter::from_parsed(&q, None, None).matches(&s));
    }

    #[test]
    fn zero_budgets_are_not_bounds() {
        let s = photographer();
        let mut q = parsed(None, &[]);
        q.max_budget = Some(0);
        q.min_budget = Some(0);
        let f = SearchFilter::from_parsed(&q, None, None);
        assert!(f.max_budget.is_none());
        assert!(f.min_budget.is_none());
        assert!(f.matches(&s));

        q.max_budget = Some(-5);
        assert!(SearchFilter::from_parsed(&q, None, None).max_budget.is_none());
    }

    #[test]
    fn location_availability_and_rating() {
        let s = photographer();
        let mut q = parsed(None, &[]);
        q.location = Some("austin".into());
        assert!(SearchFilter::from_parsed(&q, Some("available"), Some("4")).matches(&s));
        assert!(!SearchFilter::from_parsed(&q, Some("busy"), None).matches(&s));
        assert!(!SearchFilter::from_parsed(&q, None, Some("4.8")).matches(&s));

        q.location = Some("Boston".into());
        assert!(!SearchFilter::from_parsed(&q, None, None).matches(&s));
    }

    #[test]
    fn unparseable_min_rating_is_ignored() {
        let mut s = photographer();
        s.avg_rating = 0.0;
        s.profile.availability = Availability::Busy;
        let f = SearchFilter::from_parsed(&parsed(None, &[]), None, Some("great"));
        assert!(f.min_rating.is_none());
        assert!(f.matches(&s));
    }

    #[test]
    fn browse_filters_by_slug_city_and_price() {
        let mut s = photographer();
        s.category_slugs = vec!["photography".into()];

        let f = BrowseFilter::new(Some("photography".into()), Some("aus"), None, Some("50"), Some("300"));
        assert!(f.matches(&s));

        let f = BrowseFilter::new(Some("tutoring".into()), None, None, None, None);
        assert!(!f.matches(&s));

        let f = BrowseFilter::new(None, None, Some("Busy"), None, None);
        assert!(!f.matches(&s));

        let f = BrowseFilter::new(None, None, None, Some("cheap"), Some("200"));
        assert!(f.min_price.is_none());
        assert!(!f.matches(&s));
    }
}
