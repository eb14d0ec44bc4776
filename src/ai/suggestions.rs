use serde::Serialize;
use tracing::warn;

use super::{AiEngine, response};

/// What the model is told about a freelancer's profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileStatus {
    pub has_bio: bool,
    pub bio_length: usize,
    pub portfolio_items: usize,
    pub has_photo: bool,
    pub skills_count: usize,
    pub avg_rating: f64,
    pub completeness: i32,
}

/// Most suggestions returned to the caller.
const MAX_SUGGESTIONS: usize = 3;

/// Up to three short tips for improving discoverability.
///
/// Empty when the AI backend is off or its answer is not a JSON list.
pub async fn profile_suggestions(status: &ProfileStatus, ai: &AiEngine) -> Vec<String> {
    if !ai.is_enabled() {
        return Vec::new();
    }

    let status_json = match serde_json::to_string(status) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not serialize profile status: {}", e);
            return Vec::new();
        }
    };

    let prompt = format!(
        "A local freelancer has this profile status: {status_json}\n\n\
         Give 3 short, specific, actionable suggestions to improve their discoverability.\n\
         Return as a JSON list of strings. No explanation, no markdown."
    );

    match ai.generate(&prompt).await {
        Ok(text) => match response::parse_string_list(&text) {
            Some(mut tips) => {
                tips.truncate(MAX_SUGGESTIONS);
                tips
            }
            None => {
                warn!("Profile suggestions were not a JSON list");
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Could not generate profile suggestions: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::engine;

    #[tokio::test]
    async fn disabled_engine_gives_no_tips() {
        let tips = profile_suggestions(&ProfileStatus::default(), &AiEngine::disabled()).await;
        assert!(tips.is_empty());
    }

    #[tokio::test]
    async fn fenced_list_is_parsed_and_capped() {
        let ai = engine(vec![Ok(
            "```json\n[\"Add a profile photo\", \"Write a longer bio\", \"Feature your best shot\", \"Extra\"]\n```",
        )]);

        let tips = profile_suggestions(&ProfileStatus::default(), &ai).await;

        assert_eq!(
            tips,
            vec!["Add a profile photo", "Write a longer bio", "Feature your best shot"]
        );
    }

    #[tokio::test]
    async fn prose_answer_gives_no_tips() {
        let ai = engine(vec![Ok("You should add a photo.")]);
        assert!(profile_suggestions(&ProfileStatus::default(), &ai).await.is_empty());
    }
}
