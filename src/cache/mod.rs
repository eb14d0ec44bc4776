use redis::{Client, ErrorKind, RedisError, RedisResult, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;

/// Keys scanned per `SCAN` round trip during invalidation.
const SCAN_BATCH: usize = 200;

/// Redis-backed storage for public profile pages and revoked refresh tokens.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

fn codec_error(action: &'static str, err: serde_json::Error) -> RedisError {
    RedisError::from((ErrorKind::TypeError, action, err.to_string()))
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// A cached JSON document, `None` on a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<T>> {
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        raw.map(|v| serde_json::from_str(&v).map_err(|e| codec_error("Deserialization error", e)))
            .transpose()
    }

    /// Store a JSON document for `ttl`.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> RedisResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| codec_error("Serialization error", e))?;

        redis::cmd("SET")
            .arg(key)
            .arg(raw)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Delete every key matching a glob pattern.
    ///
    /// Walks the keyspace with `SCAN` so a large cache never blocks the server.
    pub async fn delete_pattern(&self, pattern: &str) -> RedisResult<u64> {
        let mut conn = self.connection.clone();
        let mut cursor: u64 = 0;
        let mut deleted = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !batch.is_empty() {
                let removed: u64 = redis::cmd("DEL").arg(&batch).query_async(&mut conn).await?;
                deleted += removed;
            }

            if next == 0 {
                return Ok(deleted);
            }
            cursor = next;
        }
    }

    /// Remember a refresh token as revoked until it would have expired anyway.
    pub async fn revoke_token(&self, jti: &str, remaining_secs: u64) -> RedisResult<()> {
        redis::cmd("SET")
            .arg(keys::revoked_token(jti))
            .arg(1)
            .arg("EX")
            .arg(remaining_secs.max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    pub async fn is_revoked(&self, jti: &str) -> RedisResult<bool> {
        redis::cmd("EXISTS")
            .arg(keys::revoked_token(jti))
            .query_async(&mut self.connection.clone())
            .await
    }
}

/// Cache key generators
pub mod keys {
    /// Public freelancer profile, keyed by username.
    pub fn freelancer_public(username: &str) -> String {
        format!("freelancer:{}:profile", username.to_lowercase())
    }

    /// Public portfolio page, keyed by username.
    pub fn freelancer_portfolio(username: &str) -> String {
        format!("freelancer:{}:portfolio", username.to_lowercase())
    }

    /// Every cached page for one freelancer.
    pub fn freelancer_pattern(username: &str) -> String {
        format!("freelancer:{}:*", username.to_lowercase())
    }

    /// Marker for a refresh token revoked on logout, keyed by its `jti`.
    pub fn revoked_token(jti: &str) -> String {
        format!("revoked:{jti}")
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub profile_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            profile_ttl: config.profile_cache_ttl,
        }
    }
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<RedisCache>;

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn profile_keys_share_a_prefix() {
        let pattern = keys::freelancer_pattern("Ana");
        let prefix = pattern.trim_end_matches('*');
        assert!(keys::freelancer_public("ana").starts_with(prefix));
        assert!(keys::freelancer_portfolio("ANA").starts_with(prefix));
        assert_eq!(keys::revoked_token("abc"), "revoked:abc");
    }
}
