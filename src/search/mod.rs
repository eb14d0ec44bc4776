pub mod filter;
pub mod matching;
pub mod message;
pub mod query;
pub mod ranking;

use chrono::{DateTime, Utc};

use crate::models::freelancer_profiles::{self, FreelancerPublic};
use crate::models::portfolios;
use ranking::ScoreInputs;

/// A freelancer with everything search, ranking and matching read about them.
#[derive(Debug, Clone)]
pub struct FreelancerSnapshot {
    pub profile: freelancer_profiles::Model,
    pub username: String,
    pub portfolio: Option<portfolios::Model>,
    pub category_names: Vec<String>,
    pub category_slugs: Vec<String>,
    pub skill_names: Vec<String>,
    pub avg_rating: f64,
    pub review_count: u64,
}

impl FreelancerSnapshot {
    pub fn score_inputs(&self) -> ScoreInputs {
        let last_updated = match &self.portfolio {
            Some(p) if p.updated_at > self.profile.updated_at => p.updated_at,
            _ => self.profile.updated_at,
        };

        ScoreInputs {
            completeness: self.portfolio.as_ref().map(|p| p.completeness),
            avg_rating: self.avg_rating,
            last_updated,
            profile_views: i64::from(self.profile.profile_views),
            review_count: self.review_count,
        }
    }

    pub fn activity_score(&self, now: DateTime<Utc>) -> f64 {
        ranking::compute_activity_score(&self.score_inputs(), now)
    }

    pub fn to_public(&self) -> FreelancerPublic {
        FreelancerPublic::new(
            &self.profile,
            &self.username,
            self.avg_rating,
            self.review_count,
        )
    }
}

/// Rank snapshots by live activity score and return their public views.
pub fn rank_public(snapshots: Vec<FreelancerSnapshot>, now: DateTime<Utc>) -> Vec<FreelancerPublic> {
    ranking::rank_freelancers(snapshots, |s| s.activity_score(now))
        .into_iter()
        .map(|(s, score)| {
            let mut public = s.to_public();
            public.activity_score = score;
            public
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use uuid::Uuid;

    use super::FreelancerSnapshot;
    use crate::models::freelancer_profiles::{self, Availability};
    use crate::models::works::{self, DurationUnit, WorkStatus};

    pub fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    pub fn profile(display_name: &str) -> freelancer_profiles::Model {
        freelancer_profiles::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            tagline: String::new(),
            bio: String::new(),
            profile_photo: String::new(),
            cover_photo: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            latitude: None,
            longitude: None,
            address: String::new(),
            phone: String::new(),
            hourly_rate: None,
            price_min: None,
            price_max: None,
            availability: Availability::Available,
            response_time_hours: None,
            years_experience: None,
            languages: json!([]),
            linkedin_url: String::new(),
            website_url: String::new(),
            github_url: String::new(),
            twitter_url: String::new(),
            instagram_url: String::new(),
            education: json!([]),
            work_experience: json!([]),
            certifications: json!([]),
            ai_tags: json!([]),
            activity_score: 0.0,
            profile_views: 0,
            is_profile_complete: false,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn snapshot(profile: freelancer_profiles::Model) -> FreelancerSnapshot {
        FreelancerSnapshot {
            username: profile.display_name.to_lowercase().replace(' ', "_"),
            profile,
            portfolio: None,
            category_names: Vec::new(),
            category_slugs: Vec::new(),
            skill_names: Vec::new(),
            avg_rating: 0.0,
            review_count: 0,
        }
    }

    pub fn work(title: &str, description: &str, category: &str, skills: &[&str]) -> works::Model {
        works::Model {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            pay_per_hour: 40.0,
            duration_value: 1,
            duration_unit: DurationUnit::Days,
            location: String::new(),
            status: WorkStatus::Open,
            skills: json!(skills),
            show_contact_info: false,
            created_at: now(),
            updated_at: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use chrono::Duration;

    #[test]
    fn recency_uses_later_of_profile_and_portfolio() {
        let mut p = profile("Ana");
        p.updated_at = now() - Duration::days(200);
        let mut snap = snapshot(p);
        assert_eq!(snap.score_inputs().last_updated, now() - Duration::days(200));

        snap.portfolio = Some(portfolios::Model {
            id: uuid::Uuid::new_v4(),
            freelancer_id: snap.profile.id,
            title: "Work".into(),
            description: String::new(),
            is_published: true,
            completeness: 50,
            created_at: now(),
            updated_at: now() - Duration::days(3),
        });
        let inputs = snap.score_inputs();
        assert_eq!(inputs.last_updated, now() - Duration::days(3));
        assert_eq!(inputs.completeness, Some(50));
    }

    #[test]
    fn rank_public_orders_by_live_score() {
        let mut quiet = profile("Quiet");
        quiet.updated_at = now() - Duration::days(365);
        let mut busy = profile("Busy");
        busy.profile_views = 150;

        let ranked = rank_public(vec![snapshot(quiet), snapshot(busy)], now());
        assert_eq!(ranked[0].display_name, "Busy");
        assert_eq!(ranked[0].activity_score, 35.0);
        assert_eq!(ranked[1].activity_score, 2.0);
    }
}
