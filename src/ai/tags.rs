use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use super::{AiEngine, AiError, response};

const TAG_TTL: Duration = Duration::from_secs(7 * 24 * 3600);
const MAX_TAGS: usize = 10;

const TAG_PROMPT: &str = "Analyze this portfolio image from a freelancer. \
Identify the type of work, style, subject, and skills it demonstrates. \
Return ONLY a JSON list of 5-10 descriptive tags (lowercase, one or two words each), nothing else. \
Example: [\"wedding photography\", \"outdoor\", \"portrait\", \"natural light\"]";

/// AI tags for portfolio images, cached in-process by a hash of the image URL.
#[derive(Clone)]
pub struct ImageTagger {
    cache: Arc<Cache<u64, Vec<String>>>,
    client: reqwest::Client,
}

impl ImageTagger {
    pub fn new(timeout: Duration) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(TAG_TTL)
                .max_capacity(10_000)
                .build(),
        );
        Ok(Self { cache, client })
    }

    /// Tags for the image at `url`, or an empty list when tagging is unavailable.
    pub async fn tag_image(&self, ai: &AiEngine, url: &str) -> Vec<String> {
        let key = url_key(url);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Image tag cache hit for {}", url);
            return cached;
        }

        if !ai.is_enabled() {
            return Vec::new();
        }

        match self.fetch_and_tag(ai, url).await {
            Ok(tags) => {
                if !tags.is_empty() {
                    self.cache.insert(key, tags.clone()).await;
                }
                tags
            }
            Err(e) => {
                warn!("Could not tag portfolio image {}: {}", url, e);
                Vec::new()
            }
        }
    }

    async fn fetch_and_tag(&self, ai: &AiEngine, url: &str) -> Result<Vec<String>, AiError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AiError::Provider(format!(
                "image download failed: HTTP {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await?;

        let answer = ai.generate_with_image(TAG_PROMPT, &bytes, "image/jpeg").await?;
        let tags = response::parse_string_list(&answer)
            .ok_or_else(|| AiError::Parse("expected a JSON list of tags".to_string()))?;
        Ok(normalize_tags(tags))
    }

    #[cfg(test)]
    pub(crate) async fn seed(&self, url: &str, tags: Vec<String>) {
        self.cache.insert(url_key(url), tags).await;
    }
}

fn url_key(url: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    url.trim().hash(&mut hasher);
    hasher.finish()
}

/// Lowercase, trim, drop duplicates, keep at most ten.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
        if out.len() == MAX_TAGS {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_ai_yields_no_tags() {
        let tagger = ImageTagger::new(Duration::from_secs(1)).unwrap();
        let tags = tagger
            .tag_image(&AiEngine::disabled(), "https://cdn.test/a.jpg")
            .await;
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn cached_tags_are_reused() {
        let tagger = ImageTagger::new(Duration::from_secs(1)).unwrap();
        tagger
            .seed("https://cdn.test/a.jpg", vec!["portrait".to_string()])
            .await;
        let tags = tagger
            .tag_image(&AiEngine::disabled(), "https://cdn.test/a.jpg")
            .await;
        assert_eq!(tags, vec!["portrait"]);
    }

    #[test]
    fn tags_are_normalized() {
        let raw = vec![" Wedding ".into(), "wedding".into(), "".into(), "Outdoor".into()];
        assert_eq!(normalize_tags(raw), vec!["wedding", "outdoor"]);

        let many: Vec<String> = (0..20).map(|i| format!("tag{i}")).collect();
        assert_eq!(normalize_tags(many).len(), MAX_TAGS);
    }
}
