//! Redis-backed feature cache for multi-process deployments.
//!
//! Values are stored as JSON strings under `{namespace}{key}`. Pattern
//! deletes walk the keyspace with `SCAN MATCH` and remove hits in batches,
//! so a flush never blocks the server the way `KEYS` would.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::feature::FeatureValue;
use crate::domain::foundation::DomainError;
use crate::ports::FeatureCache;

const SCAN_BATCH: usize = 100;

/// Redis [`FeatureCache`].
#[derive(Clone)]
pub struct RedisFeatureCache {
    conn: MultiplexedConnection,
    namespace: String,
    ttl_secs: Option<u64>,
}

impl RedisFeatureCache {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            namespace: String::new(),
            ttl_secs: None,
        }
    }

    /// Prefix prepended to every key this cache touches.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Expire entries after `ttl_secs`. Zero disables expiry.
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = (ttl_secs > 0).then_some(ttl_secs);
        self
    }

    fn redis_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// Translates a `prefix*` pattern into a SCAN glob, escaping glob
    /// metacharacters in the literal part.
    fn scan_pattern(&self, key_or_pattern: &str) -> Option<String> {
        let prefix = key_or_pattern.strip_suffix('*')?;
        Some(format!(
            "{}{}*",
            escape_glob(&self.namespace),
            escape_glob(prefix)
        ))
    }

    async fn delete_matching(&self, pattern: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e: redis::RedisError| DomainError::cache(e.to_string()))?;

            if !keys.is_empty() {
                conn.del::<_, ()>(&keys)
                    .await
                    .map_err(|e: redis::RedisError| DomainError::cache(e.to_string()))?;
            }

            if next == 0 {
                return Ok(());
            }
            cursor = next;
        }
    }
}

fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl FeatureCache for RedisFeatureCache {
    async fn get(&self, key: &str) -> Result<Option<FeatureValue>, DomainError> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(self.redis_key(key))
            .await
            .map_err(|e: redis::RedisError| DomainError::cache(e.to_string()))?;

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // Stale shape from an older release; treat as a miss.
                    tracing::warn!(key, error = %e, "Discarding unreadable cached feature value");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &FeatureValue) -> Result<(), DomainError> {
        let json = serde_json::to_string(value)
            .map_err(|e| DomainError::cache(format!("Failed to encode feature value: {}", e)))?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(self.redis_key(key)).arg(json);
        if let Some(ttl) = self.ttl_secs {
            cmd.arg("EX").arg(ttl);
        }

        let mut conn = self.conn.clone();
        cmd.query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e: redis::RedisError| DomainError::cache(e.to_string()))
    }

    async fn delete(&self, key_or_pattern: &str) -> Result<(), DomainError> {
        if let Some(pattern) = self.scan_pattern(key_or_pattern) {
            return self.delete_matching(&pattern).await;
        }

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.redis_key(key_or_pattern))
            .await
            .map_err(|e: redis::RedisError| DomainError::cache(e.to_string()))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let pattern = format!("{}feature:*", escape_glob(&self.namespace));
        self.delete_matching(&pattern).await
    }
}

impl std::fmt::Debug for RedisFeatureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFeatureCache")
            .field("namespace", &self.namespace)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
