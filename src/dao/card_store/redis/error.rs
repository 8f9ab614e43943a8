//! Error types shared by the Redis storage implementation.

use redis::RedisError;
use thiserror::Error;

/// Convenient result alias returning [`RedisDaoError`] failures.
pub type RedisResult<T> = Result<T, RedisDaoError>;

/// Failures that can occur while interacting with Redis.
#[derive(Debug, Error)]
pub enum RedisDaoError {
    /// The connection settings (or the explicit URL) were rejected by the client.
    #[error("invalid Redis connection settings for `{url}`")]
    InvalidConfig {
        url: String,
        #[source]
        source: RedisError,
    },
    /// The connection manager could not reach the server.
    #[error("failed to connect to Redis at `{url}`")]
    Connect {
        url: String,
        #[source]
        source: RedisError,
    },
    /// A command against a single key failed.
    #[error("Redis `{command}` on `{key}` failed")]
    Command {
        command: &'static str,
        key: String,
        #[source]
        source: RedisError,
    },
    /// Scanning the keyspace failed.
    #[error("failed to scan Redis keys matching `{pattern}`")]
    Scan {
        pattern: String,
        #[source]
        source: RedisError,
    },
    /// `PING` did not answer.
    #[error("Redis ping health check failed")]
    HealthPing {
        #[source]
        source: RedisError,
    },
}

impl RedisDaoError {
    pub(super) fn command(command: &'static str, key: &str) -> impl FnOnce(RedisError) -> Self {
        let key = key.to_owned();
        move |source| RedisDaoError::Command {
            command,
            key,
            source,
        }
    }
}
