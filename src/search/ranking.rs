//! Activity score and portfolio completeness.
//!
//! Everything here is pure: callers pass the stored state and the current time.

use chrono::{DateTime, Utc};

pub const WEIGHT_COMPLETENESS: f64 = 30.0;
pub const WEIGHT_RATING: f64 = 25.0;
pub const WEIGHT_RECENCY: f64 = 20.0;
pub const WEIGHT_VIEWS: f64 = 15.0;
pub const WEIGHT_REVIEWS: f64 = 10.0;

/// The five stored facts the activity score is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInputs {
    /// `None` when the freelancer has no portfolio.
    pub completeness: Option<i32>,
    pub avg_rating: f64,
    /// Later of the portfolio and profile update times.
    pub last_updated: DateTime<Utc>,
    pub profile_views: i64,
    pub review_count: u64,
}

pub fn recency_bucket(days_since_update: i64) -> f64 {
    match days_since_update {
        d if d <= 7 => 1.0,
        d if d <= 30 => 0.7,
        d if d <= 90 => 0.4,
        _ => 0.1,
    }
}

pub fn views_bucket(views: i64) -> f64 {
    match views {
        v if v >= 100 => 1.0,
        v if v >= 50 => 0.8,
        v if v >= 20 => 0.6,
        v if v >= 10 => 0.4,
        v if v >= 1 => 0.2,
        _ => 0.0,
    }
}

/// Composite discoverability score in [0, 100], rounded to 2 decimals.
pub fn compute_activity_score(inputs: &ScoreInputs, now: DateTime<Utc>) -> f64 {
    let completeness = inputs
        .completeness
        .map(|c| (c.clamp(0, 100) as f64 / 100.0) * WEIGHT_COMPLETENESS)
        .unwrap_or(0.0);

    let rating = (inputs.avg_rating.clamp(0.0, 5.0) / 5.0) * WEIGHT_RATING;

    let days = (now - inputs.last_updated).num_days();
    let recency = recency_bucket(days) * WEIGHT_RECENCY;

    let views = views_bucket(inputs.profile_views) * WEIGHT_VIEWS;

    let reviews = (inputs.review_count as f64 / 10.0).min(1.0) * WEIGHT_REVIEWS;

    let total = completeness + rating + recency + views + reviews;
    round2(total.clamp(0.0, 100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sort descending by score. Stable: equal scores keep their input order.
pub fn rank_freelancers<T>(items: Vec<T>, score: impl Fn(&T) -> f64) -> Vec<(T, f64)> {
    let mut scored: Vec<(T, f64)> = items
        .into_iter()
        .map(|item| {
            let s = score(&item);
            (item, s)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

#[derive(Debug, Clone, Default)]
pub struct CompletenessInputs {
    pub has_title: bool,
    /// Length of the description in characters.
    pub description_chars: usize,
    pub category_count: usize,
    pub skill_count: usize,
    pub item_count: usize,
    pub has_featured_item: bool,
}

/// Portfolio completeness in [0, 100].
pub fn portfolio_completeness(inputs: &CompletenessInputs) -> i32 {
    let mut score = 0;

    if inputs.has_title {
        score += 10;
    }
    if inputs.description_chars > 50 {
        score += 15;
    }
    if inputs.category_count > 0 {
        score += 15;
    }
    if inputs.skill_count > 0 {
        score += 15;
    }
    if inputs.item_count > 0 {
        score += 25;
        if inputs.has_featured_item {
            score += 20;
        }
    }

    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn inputs(days_ago: i64) -> ScoreInputs {
        ScoreInputs {
            completeness: Some(80),
            avg_rating: 4.5,
            last_updated: now() - Duration::days(days_ago),
            profile_views: 25,
            review_count: 4,
        }
    }

    #[test]
    fn weighted_sum_matches_components() {
        // 24 + 22.5 + 20 + 9 + 4
        assert_eq!(compute_activity_score(&inputs(2), now()), 79.5);
    }

    #[test]
    fn missing_portfolio_contributes_nothing() {
        let mut i = inputs(2);
        i.completeness = None;
        assert_eq!(compute_activity_score(&i, now()), 55.5);
    }

    #[test]
    fn recency_buckets_use_whole_days() {
        assert_eq!(recency_bucket(0), 1.0);
        assert_eq!(recency_bucket(7), 1.0);
        assert_eq!(recency_bucket(8), 0.7);
        assert_eq!(recency_bucket(30), 0.7);
        assert_eq!(recency_bucket(90), 0.4);
        assert_eq!(recency_bucket(91), 0.1);
        // 7 days and 23 hours is still 7 whole days.
        let mut i = inputs(0);
        i.last_updated = now() - Duration::hours(7 * 24 + 23);
        assert_eq!(compute_activity_score(&i, now()), 79.5);
    }

    #[test]
    fn views_buckets() {
        assert_eq!(views_bucket(0), 0.0);
        assert_eq!(views_bucket(1), 0.2);
        assert_eq!(views_bucket(10), 0.4);
        assert_eq!(views_bucket(20), 0.6);
        assert_eq!(views_bucket(50), 0.8);
        assert_eq!(views_bucket(100), 1.0);
        assert_eq!(views_bucket(10_000), 1.0);
    }

    #[test]
    fn score_is_bounded_and_pure() {
        let best = ScoreInputs {
            completeness: Some(100),
            avg_rating: 5.0,
            last_updated: now(),
            profile_views: 1_000,
            review_count: 500,
        };
        assert_eq!(compute_activity_score(&best, now()), 100.0);

        let worst = ScoreInputs {
            completeness: None,
            avg_rating: 0.0,
            last_updated: now() - Duration::days(365),
            profile_views: 0,
            review_count: 0,
        };
        assert_eq!(compute_activity_score(&worst, now()), 2.0);

        let i = inputs(40);
        assert_eq!(
            compute_activity_score(&i, now()),
            compute_activity_score(&i, now())
        );
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let ranked = rank_freelancers(vec![("a", 10.0), ("b", 50.0), ("c", 10.0), ("d", 50.0)], |x| x.1);
        let order: Vec<&str> = ranked.iter().map(|(x, _)| x.0).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn completeness_example() {
        let c = CompletenessInputs {
            has_title: true,
            description_chars: 60,
            category_count: 1,
            skill_count: 0,
            item_count: 2,
            has_featured_item: true,
        };
        assert_eq!(portfolio_completeness(&c), 85);
    }

    #[test]
    fn completeness_caps_at_100_and_needs_items_for_featured_bonus() {
        let full = CompletenessInputs {
            has_title: true,
            description_chars: 51,
            category_count: 3,
            skill_count: 2,
            item_count: 5,
            has_featured_item: true,
        };
        assert_eq!(portfolio_completeness(&full), 100);

        let no_items = CompletenessInputs {
            has_title: true,
            description_chars: 50,
            has_featured_item: true,
            ..Default::default()
        };
        assert_eq!(portfolio_completeness(&no_items), 10);
    }
}
