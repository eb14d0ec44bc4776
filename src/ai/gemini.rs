use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use super::{AiError, TextGenerator};

/// Google Gemini `generateContent` over plain REST.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            model,
            endpoint,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }

    async fn send(&self, parts: Value) -> Result<String, AiError> {
        let body = json!({ "contents": [{ "parts": parts }] });

        tracing::debug!("Sending prompt to Gemini model {}", self.model);
        let response = self.http.post(self.url()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(AiError::Provider(format!("{status}: {error}")));
        }

        let body: Value = response.json().await?;
        extract_text(&body)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a `generateContent` reply.
pub fn extract_text(body: &Value) -> Result<String, AiError> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AiError::EmptyResponse)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.send(json!([{ "text": prompt }])).await
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, AiError> {
        self.send(json!([
            { "text": prompt },
            { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } }
        ]))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "  [\"a\"]\n" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });
        assert_eq!(extract_text(&body).unwrap(), "[\"a\"]");
    }

    #[test]
    fn blocked_or_empty_replies_are_errors() {
        let blocked = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(extract_text(&blocked), Err(AiError::EmptyResponse)));

        let blank = json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] });
        assert!(matches!(extract_text(&blank), Err(AiError::EmptyResponse)));
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let client = GeminiClient::new(
            "k".into(),
            "gemini-1.5-flash".into(),
            "https://example.test/v1beta/models/".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent?key=k"
        );
    }
}
