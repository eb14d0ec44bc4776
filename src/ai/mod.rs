pub mod gemini;
pub mod response;
pub mod suggestions;
pub mod tags;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI backend is not configured")]
    NotConfigured,

    #[error("AI call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider returned an error: {0}")]
    Provider(String),

    #[error("AI response had no text")]
    EmptyResponse,

    #[error("Could not parse AI response: {0}")]
    Parse(String),
}

/// The one capability the rest of the crate needs from a generative model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, AiError>;
}

/// Optional, time-bounded access to a [`TextGenerator`].
///
/// Every call either returns text within `timeout` or an [`AiError`]; callers
/// treat any error as "use the deterministic path".
#[derive(Clone)]
pub struct AiEngine {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
}

impl AiEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
        }
    }

    pub fn disabled() -> Self {
        Self {
            generator: None,
            timeout: Duration::from_secs(0),
        }
    }

    /// Gemini when an API key is configured, otherwise disabled.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        match &config.api_key {
            Some(key) => {
                let client = gemini::GeminiClient::new(
                    key.clone(),
                    config.model.clone(),
                    config.endpoint.clone(),
                    config.timeout,
                )?;
                tracing::info!("AI backend enabled (model {})", config.model);
                Ok(Self::new(Arc::new(client), config.timeout))
            }
            None => {
                tracing::info!("GEMINI_API_KEY not set, AI features use local fallbacks");
                Ok(Self::disabled())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let generator = self.generator.as_ref().ok_or(AiError::NotConfigured)?;
        tokio::time::timeout(self.timeout, generator.generate(prompt))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))?
    }

    pub async fn generate_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, AiError> {
        let generator = self.generator.as_ref().ok_or(AiError::NotConfigured)?;
        tokio::time::timeout(
            self.timeout,
            generator.generate_with_image(prompt, image, mime_type),
        )
        .await
        .map_err(|_| AiError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned answers in order and records the prompts it saw.
    pub struct ScriptedGenerator {
        answers: Mutex<Vec<Result<String, String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(answers: Vec<Result<&str, &str>>) -> Self {
            Self {
                answers: Mutex::new(
                    answers
                        .into_iter()
                        .rev()
                        .map(|a| a.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn next(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.answers.lock().unwrap().pop() {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(AiError::Provider(e)),
                None => Err(AiError::EmptyResponse),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.next(prompt)
        }

        async fn generate_with_image(
            &self,
            prompt: &str,
            _image: &[u8],
            _mime_type: &str,
        ) -> Result<String, AiError> {
            self.next(prompt)
        }
    }

    pub fn engine(answers: Vec<Result<&str, &str>>) -> AiEngine {
        AiEngine::new(
            Arc::new(ScriptedGenerator::new(answers)),
            Duration::from_secs(5),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }

        async fn generate_with_image(
            &self,
            prompt: &str,
            _image: &[u8],
            _mime_type: &str,
        ) -> Result<String, AiError> {
            self.generate(prompt).await
        }
    }

    #[tokio::test]
    async fn disabled_engine_reports_not_configured() {
        let engine = AiEngine::disabled();
        assert!(!engine.is_enabled());
        assert!(matches!(
            engine.generate("hi").await,
            Err(AiError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let engine = AiEngine::new(Arc::new(SlowGenerator), Duration::from_millis(20));
        let result = engine.generate("hi").await;
        assert!(matches!(result, Err(AiError::Timeout(_))));
    }

    #[tokio::test]
    async fn scripted_answers_come_back_in_order() {
        let engine = testing::engine(vec![Ok("one"), Err("boom")]);
        assert_eq!(engine.generate("a").await.unwrap(), "one");
        assert!(matches!(engine.generate("b").await, Err(AiError::Provider(_))));
    }

    #[test]
    fn missing_key_disables_engine() {
        let engine = AiEngine::from_config(&AiConfig::default()).unwrap();
        assert!(!engine.is_enabled());
    }
}
