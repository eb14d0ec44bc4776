//! Client recommendations and freelancer work suggestions.
//!
//! Both start from a deterministic ordering and only let the AI backend
//! narrow or reorder it: ids the model invents are dropped, and a failed call
//! falls back to the deterministic result.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::FreelancerSnapshot;
use super::ranking::rank_freelancers;
use crate::ai::{AiEngine, response};
use crate::models::{freelancer_profiles, works};

pub const FALLBACK_SUGGESTION_MESSAGE: &str = "These jobs match your profile and skills.";
pub const FALLBACK_MATCH_REASON: &str = "Matches your profile.";

/// What the recommender knows about a client.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub city: String,
    /// Titles and categories of the client's posted works.
    pub work_summaries: Vec<String>,
}

impl ClientContext {
    fn describe(&self) -> String {
        let mut out = String::new();
        if !self.city.trim().is_empty() {
            out.push_str(&format!("Located in {}. ", self.city.trim()));
        }
        if !self.work_summaries.is_empty() {
            out.push_str(&format!(
                "Has posted jobs: {}. ",
                self.work_summaries.join("; ")
            ));
        }
        out
    }
}

/// Recommended freelancer ids for a client, best first.
///
/// `candidates` is the pool of available freelancers; the result never
/// contains an id outside it.
pub async fn get_recommendations(
    context: &ClientContext,
    candidates: &[FreelancerSnapshot],
    ai: &AiEngine,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let by_activity = || -> Vec<Uuid> {
        rank_freelancers(candidates.iter().collect(), |s| s.activity_score(now))
            .into_iter()
            .take(limit)
            .map(|(s, _)| s.profile.id)
            .collect()
    };

    if !ai.is_enabled() {
        return by_activity();
    }

    let answer = match ai.generate(&recommendation_prompt(context, candidates, limit)).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("AI recommendations failed: {}", e);
            return by_activity();
        }
    };

    let pool: HashSet<Uuid> = candidates.iter().map(|s| s.profile.id).collect();
    let chosen: Vec<Uuid> = response::parse_id_list(&answer)
        .unwrap_or_default()
        .into_iter()
        .filter(|id| pool.contains(id))
        .take(limit)
        .collect();

    if chosen.is_empty() {
        info!("AI recommendations named no known freelancers, using activity order");
        return by_activity();
    }
    chosen
}

fn recommendation_prompt(
    context: &ClientContext,
    candidates: &[FreelancerSnapshot],
    limit: usize,
) -> String {
    let profiles = candidates
        .iter()
        .map(|s| {
            let p = &s.profile;
            let mut skills = s.skill_names.clone();
            skills.extend(p.ai_tags());
            format!(
                "ID:{} - Freelancer {}: {}. Skills: {}. Experience: {} years. Rating: {:.1}/5. \
                 Price range: ${}-${}. Location: {}. Availability: {}.",
                p.id,
                s.username,
                or_default(&p.tagline, "No title"),
                if skills.is_empty() {
                    "Not specified".to_string()
                } else {
                    skills.join(", ")
                },
                p.years_experience.unwrap_or(0),
                s.avg_rating,
                p.price_min.unwrap_or(0.0),
                p.price_max.unwrap_or(0.0),
                or_default(&p.city, "Remote"),
                p.availability,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a recommendation engine for a freelancer platform.\n\
         Given a client's background: \"{}\"\n\
         And the following available freelancers:\n{profiles}\n\n\
         Select the top {limit} freelancer IDs that best match the client's needs.\n\
         Consider skills match, price range fit, location, availability, and ratings.\n\
         Return ONLY a JSON list of freelancer IDs, nothing else.\n\
         Example: [\"3f2b8c1e-0d5a-4e7b-9c61-2a4d8e9f0b11\", \"8a7d6c5b-4e3f-4a2b-8c1d-0e9f8a7b6c5d\"]",
        context.describe()
    )
}

/// Lowercased words describing what a freelancer does.
pub fn profile_keywords(profile: &freelancer_profiles::Model) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();
    keywords.extend(profile.tagline.to_lowercase().split_whitespace().map(str::to_string));
    keywords.extend(
        profile
            .bio
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .map(str::to_string),
    );
    keywords.extend(profile.ai_tags().iter().map(|t| t.to_lowercase()));
    keywords.extend(
        profile
            .display_name
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string),
    );
    keywords
}

fn has_describing_fields(profile: &freelancer_profiles::Model) -> bool {
    !profile.tagline.trim().is_empty()
        || !profile.bio.trim().is_empty()
        || !profile.ai_tags().is_empty()
}

fn work_text(work: &works::Model) -> String {
    format!(
        "{} {} {} {}",
        work.title,
        work.description,
        work.skills().join(" "),
        work.category
    )
    .to_lowercase()
}

/// Open works sharing at least one keyword with the profile, most shared first.
///
/// Never returns an unrelated work: a profile with nothing to match on gets
/// an empty list.
pub fn keyword_matches<'a>(
    profile: &freelancer_profiles::Model,
    open_works: &'a [works::Model],
    limit: usize,
) -> Vec<&'a works::Model> {
    if !has_describing_fields(profile) {
        return Vec::new();
    }

    let keywords: Vec<String> = profile_keywords(profile)
        .into_iter()
        .filter(|k| k.chars().count() > 2)
        .collect();

    let mut scored: Vec<(&works::Model, usize)> = open_works
        .iter()
        .filter_map(|work| {
            let text = work_text(work);
            let hits = keywords.iter().filter(|k| text.contains(k.as_str())).count();
            (hits > 0).then_some((work, hits))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().take(limit).map(|(w, _)| w).collect()
}

/// Work ids to suggest to a freelancer. Empty is a valid answer.
pub async fn get_work_suggestions(
    profile: &freelancer_profiles::Model,
    open_works: &[works::Model],
    ai: &AiEngine,
    limit: usize,
) -> Vec<Uuid> {
    let matched = keyword_matches(profile, open_works, limit);
    if matched.is_empty() {
        info!("No keyword matches for freelancer {}", profile.id);
        return Vec::new();
    }
    let matched_ids: Vec<Uuid> = matched.iter().map(|w| w.id).collect();

    if !ai.is_enabled() {
        return matched_ids;
    }

    let answer = match ai.generate(&work_filter_prompt(profile, &matched)).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("AI work filtering failed: {}", e);
            return matched_ids;
        }
    };

    match response::parse_id_list(&answer) {
        Some(ids) => {
            let allowed: HashSet<Uuid> = matched_ids.iter().copied().collect();
            ids.into_iter()
                .filter(|id| allowed.contains(id))
                .take(limit)
                .collect()
        }
        None => {
            warn!("AI work filtering returned no id list, keeping keyword matches");
            matched_ids
        }
    }
}

fn freelancer_context(profile: &freelancer_profiles::Model) -> String {
    let tags = profile.ai_tags();
    let price_range = if profile.price_min.is_some() || profile.price_max.is_some() {
        format!(
            "${}-${}",
            profile.price_min.unwrap_or(0.0),
            profile.price_max.unwrap_or(0.0)
        )
    } else {
        "Flexible".to_string()
    };
    let hourly = profile
        .hourly_rate
        .map(|r| format!("${r}/hr"))
        .unwrap_or_else(|| "Negotiable".to_string());

    format!(
        "Freelancer Name: {}. Tagline: {}. Bio/Description: {}. AI Tags/Skills: {}. \
         Experience: {} years. Location: {}. Hourly Rate: {}. Price Range: {}.",
        profile.display_name,
        or_default(&profile.tagline, "Not specified"),
        or_default(&profile.bio, "Not specified"),
        if tags.is_empty() {
            "Not specified".to_string()
        } else {
            tags.join(", ")
        },
        profile.years_experience.unwrap_or(0),
        or_default(&profile.city, "Remote"),
        hourly,
        price_range,
    )
}

fn work_filter_prompt(profile: &freelancer_profiles::Model, matched: &[&works::Model]) -> String {
    let keyword_list: Vec<String> = profile_keywords(profile).into_iter().take(15).collect();
    let jobs = matched
        .iter()
        .map(|w| {
            let skills = w.skills();
            format!(
                "Work ID {}: {}. Description: {} Category: {}. Required skills: {}. Pay: ${}/hr.",
                w.id,
                w.title,
                truncate_chars(&w.description, 300),
                or_default(&w.category, "Not specified"),
                if skills.is_empty() {
                    "Not specified".to_string()
                } else {
                    skills.join(", ")
                },
                w.pay_per_hour,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a STRICT job matching engine. Your job is to filter jobs to only those that HIGHLY MATCH the freelancer.\n\n\
         Freelancer Profile:\n\"{}\"\n\n\
         Matching Keywords from Profile: {:?}\n\n\
         Jobs to Filter (already pre-scored by keyword matching):\n{jobs}\n\n\
         STRICT INSTRUCTIONS:\n\
         - ONLY include jobs where there is CLEAR relevance between the freelancer's profile and the job\n\
         - A developer should ONLY see development/programming jobs\n\
         - A videographer should ONLY see video/filmmaking jobs\n\
         - Compare: Tagline, Bio, AI Tags with Job Title, Description, Category, Skills\n\
         - If a job is not directly related, EXCLUDE it\n\
         - Return ONLY IDs of HIGHLY RELEVANT jobs\n\
         - If NONE are relevant, return empty list: []\n\n\
         Return ONLY a JSON list of work IDs, nothing else.\n\
         Example: [\"3f2b8c1e-0d5a-4e7b-9c61-2a4d8e9f0b11\"] or []",
        freelancer_context(profile),
        keyword_list,
    )
}

fn profile_brief(profile: &freelancer_profiles::Model) -> String {
    let tags: Vec<String> = profile.ai_tags().into_iter().take(8).collect();
    format!(
        "Tagline: \"{}\". Bio: \"{}\". Skills/tags: {}.",
        profile.tagline,
        truncate_chars(&profile.bio, 200),
        tags.join(", ")
    )
}

/// One or two sentences telling the freelancer why these works were picked.
pub async fn work_suggestions_message(
    profile: &freelancer_profiles::Model,
    suggested: &[works::Model],
    ai: &AiEngine,
) -> String {
    if suggested.is_empty() {
        return String::new();
    }
    if !ai.is_enabled() {
        return FALLBACK_SUGGESTION_MESSAGE.to_string();
    }

    let works_list = suggested
        .iter()
        .take(10)
        .map(|w| format!("- {} ({})", w.title, or_default(&w.category, "General")))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "You are a helpful assistant for a freelancer platform. In 1-2 short sentences, tell the \
         freelancer why these jobs are recommended for them. Be warm and specific (mention their \
         profile/skills). No bullet points, no markdown.\n\n\
         Freelancer profile: {}\n\n\
         Recommended jobs:\n{works_list}\n\n\
         Write only the message, nothing else.",
        profile_brief(profile)
    );

    match ai.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => FALLBACK_SUGGESTION_MESSAGE.to_string(),
        Err(e) => {
            warn!("Could not generate work suggestions message: {}", e);
            FALLBACK_SUGGESTION_MESSAGE.to_string()
        }
    }
}

/// A short reason per suggested work, in the same order.
pub async fn work_match_reasons(
    profile: &freelancer_profiles::Model,
    suggested: &[works::Model],
    ai: &AiEngine,
) -> Vec<String> {
    let fallback = || vec![FALLBACK_MATCH_REASON.to_string(); suggested.len()];
    if suggested.is_empty() {
        return Vec::new();
    }
    if !ai.is_enabled() {
        return fallback();
    }

    let works_list = suggested
        .iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                "{}. {} ({}): {}...",
                i + 1,
                w.title,
                or_default(&w.category, "General"),
                truncate_chars(&w.description, 150)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "You are a freelancer platform assistant. For each job below, write ONE short phrase \
         (under 15 words) explaining why it fits this freelancer. Return ONLY a JSON list of \
         strings, one per job, in the same order.\n\n\
         Freelancer: {}\n\n\
         Jobs:\n{works_list}\n\n\
         Example: [\"Your photography experience fits this wedding gig\", \"Location and rate match\"]\n\
         Return nothing else, only the JSON list.",
        profile_brief(profile)
    );

    let reasons = match ai.generate(&prompt).await {
        Ok(text) => response::parse_string_list(&text),
        Err(e) => {
            warn!("Could not generate match reasons: {}", e);
            None
        }
    };

    match reasons {
        Some(mut reasons) => {
            reasons.truncate(suggested.len());
            reasons.resize(suggested.len(), FALLBACK_MATCH_REASON.to_string());
            reasons
        }
        None => fallback(),
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing;
    use crate::search::fixtures::{now, profile, snapshot, work};
    use serde_json::json;

    fn videographer() -> freelancer_profiles::Model {
        let mut p = profile("Sam Reel");
        p.tagline = "Wedding videographer".into();
        p.bio = "I film weddings and corporate events with drones".into();
        p.ai_tags = json!(["cinematic"]);
        p
    }

    fn open_works() -> Vec<works::Model> {
        vec![
            work("Fix my sink", "Leaking kitchen sink", "Repair", &["plumbing"]),
            work("Wedding film", "Need a videographer for our wedding", "Videography", &[]),
            work("Drone shots", "Aerial footage of a farm", "Videography", &["drones"]),
        ]
    }

    #[test]
    fn keyword_matching_never_returns_unrelated_works() {
        let works = open_works();
        let matched = keyword_matches(&videographer(), &works, 10);
        let titles: Vec<&str> = matched.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Wedding film", "Drone shots"]);
    }

    #[test]
    fn short_bio_words_are_not_keywords() {
        let mut p = profile("Jo Li");
        p.tagline = "DJ for hire".into();
        p.bio = "I mix and scratch at big parties".into();
        let keywords = profile_keywords(&p);

        for kept in ["jo", "li", "dj", "for", "hire", "scratch", "parties"] {
            assert!(keywords.contains(kept), "missing {kept}");
        }
        for dropped in ["i", "mix", "and", "at", "big"] {
            assert!(!keywords.contains(dropped), "unexpected {dropped}");
        }
    }

    #[test]
    fn empty_profile_gets_no_suggestions() {
        let works = open_works();
        assert!(keyword_matches(&profile("Wedding"), &works, 10).is_empty());
    }

    #[test]
    fn keyword_ties_keep_input_order_and_limit_applies() {
        let mut p = profile("Kim");
        p.tagline = "tutor".into();
        let works = vec![
            work("Math tutor", "", "", &[]),
            work("Piano tutor", "", "", &[]),
            work("Chess tutor", "", "", &[]),
        ];
        let matched = keyword_matches(&p, &works, 2);
        let titles: Vec<&str> = matched.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Math tutor", "Piano tutor"]);
    }

    #[tokio::test]
    async fn ai_can_only_narrow_the_keyword_matches() {
        let works = open_works();
        let unrelated = works[0].id;
        let drone = works[2].id;
        let answer = format!("[\"{unrelated}\", \"{drone}\", \"{}\"]", Uuid::new_v4());
        let ai = testing::engine(vec![Ok(answer.as_str())]);
        let ids = get_work_suggestions(&videographer(), &works, &ai, 10).await;
        assert_eq!(ids, vec![drone]);
    }

    #[tokio::test]
    async fn ai_empty_list_means_no_suggestions() {
        let works = open_works();
        let ai = testing::engine(vec![Ok("[]")]);
        assert!(get_work_suggestions(&videographer(), &works, &ai, 10).await.is_empty());
    }

    #[tokio::test]
    async fn bracketed_prose_does_not_empty_the_suggestions() {
        let works = open_works();
        let drone = works[2].id;
        let answer = format!("[Note] after review: [\"{drone}\"]");
        let ai = testing::engine(vec![Ok(answer.as_str())]);
        assert_eq!(get_work_suggestions(&videographer(), &works, &ai, 10).await, vec![drone]);

        let ai = testing::engine(vec![Ok("[Note] nothing obvious stands out.")]);
        let ids = get_work_suggestions(&videographer(), &works, &ai, 10).await;
        assert_eq!(ids, vec![works[1].id, works[2].id]);
    }

    #[tokio::test]
    async fn ai_failure_keeps_keyword_matches() {
        let works = open_works();
        let ai = testing::engine(vec![Ok("I could not decide.")]);
        let ids = get_work_suggestions(&videographer(), &works, &ai, 10).await;
        assert_eq!(ids, vec![works[1].id, works[2].id]);

        let ai = testing::engine(vec![Err("timeout")]);
        let ids = get_work_suggestions(&videographer(), &works, &ai, 10).await;
        assert_eq!(ids.len(), 2);
    }

    fn pool() -> Vec<FreelancerSnapshot> {
        let mut low = snapshot(profile("Low"));
        low.profile.updated_at = now() - chrono::Duration::days(400);
        let mut high = snapshot(profile("High"));
        high.avg_rating = 5.0;
        high.review_count = 12;
        let mid = snapshot(profile("Mid"));
        vec![low, high, mid]
    }

    #[tokio::test]
    async fn recommendations_without_ai_follow_activity() {
        let pool = pool();
        let ids = get_recommendations(&ClientContext::default(), &pool, &AiEngine::disabled(), 2, now()).await;
        assert_eq!(ids, vec![pool[1].profile.id, pool[2].profile.id]);
    }

    #[tokio::test]
    async fn recommendations_keep_ai_order_within_pool() {
        let pool = pool();
        let answer = format!("[\"{}\", \"{}\", \"{}\"]", pool[0].profile.id, Uuid::new_v4(), pool[2].profile.id);
        let ai = testing::engine(vec![Ok(answer.as_str())]);
        let ids = get_recommendations(&ClientContext::default(), &pool, &ai, 5, now()).await;
        assert_eq!(ids, vec![pool[0].profile.id, pool[2].profile.id]);
    }

    #[tokio::test]
    async fn recommendations_fall_back_when_ai_names_nobody() {
        let pool = pool();
        let ai = testing::engine(vec![Ok("[]")]);
        let ids = get_recommendations(&ClientContext::default(), &pool, &ai, 1, now()).await;
        assert_eq!(ids, vec![pool[1].profile.id]);
    }

    #[tokio::test]
    async fn message_and_reasons_fall_back() {
        let works = open_works();
        let p = videographer();
        let disabled = AiEngine::disabled();
        assert_eq!(work_suggestions_message(&p, &[], &disabled).await, "");
        assert_eq!(
            work_suggestions_message(&p, &works, &disabled).await,
            FALLBACK_SUGGESTION_MESSAGE
        );
        assert_eq!(
            work_match_reasons(&p, &works, &disabled).await,
            vec![FALLBACK_MATCH_REASON; 3]
        );
    }

    #[tokio::test]
    async fn short_reason_lists_are_padded_and_long_ones_cut() {
        let works = open_works();
        let p = videographer();

        let ai = testing::engine(vec![Ok("```json\n[\"Plumbing is a stretch\"]\n```")]);
        let reasons = work_match_reasons(&p, &works, &ai).await;
        assert_eq!(
            reasons,
            vec!["Plumbing is a stretch", FALLBACK_MATCH_REASON, FALLBACK_MATCH_REASON]
        );

        let ai = testing::engine(vec![Ok("[\"a\", \"b\", \"c\", \"d\"]")]);
        assert_eq!(work_match_reasons(&p, &works, &ai).await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn ai_message_is_trimmed() {
        let works = open_works();
        let ai = testing::engine(vec![Ok("  Your wedding films fit these gigs.  ")]);
        assert_eq!(
            work_suggestions_message(&videographer(), &works, &ai).await,
            "Your wedding films fit these gigs."
        );
    }
}
