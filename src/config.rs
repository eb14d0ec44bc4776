use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the optional generative-AI backend.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// `None` disables every AI call; the deterministic paths are used instead.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            timeout: Duration::from_secs(8),
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub run_migrations: bool,
    pub cors_allowed_origin: Option<String>,
    pub profile_cache_ttl: Duration,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment (`.env` is loaded by `main`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = AiConfig::default();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            port,
            run_migrations: parse_bool("RUN_MIGRATIONS", true),
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
            profile_cache_ttl: parse_duration_secs("CACHE_TTL_PROFILE", 300),
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                access_ttl: parse_duration_secs("JWT_ACCESS_TTL_SECS", 3600),
                refresh_ttl: parse_duration_secs("JWT_REFRESH_TTL_SECS", 7 * 24 * 3600),
            },
            ai: AiConfig {
                api_key: optional("GEMINI_API_KEY"),
                model: optional("GEMINI_MODEL").unwrap_or(defaults.model),
                endpoint: optional("GEMINI_ENDPOINT").unwrap_or(defaults.endpoint),
                timeout: parse_duration_secs("AI_TIMEOUT_SECS", defaults.timeout.as_secs()),
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, default: bool) -> bool {
    match std::env::var(name).ok().as_deref().map(str::trim) {
        Some("0") | Some("false") | Some("no") => false,
        Some("1") | Some("true") | Some("yes") => true,
        _ => default,
    }
}

pub(crate) fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}
