use std::fmt;

use redis::{ConnectionAddr, ConnectionInfo, IntoConnectionInfo, RedisConnectionInfo, RedisResult};

/// Runtime configuration describing how to reach Redis.
#[derive(Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub database: i64,
    /// Full connection URL taking precedence over the individual fields.
    pub url: Option<String>,
}

impl RedisConfig {
    /// Construct a configuration from an explicit host and port, with no password and
    /// database `0`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            password: None,
            database: 0,
            url: None,
        }
    }

    /// Attach a password to the configuration.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Select the logical database index.
    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    /// Connection settings handed to [`redis::Client::open`].
    ///
    /// The password travels as a field rather than inside a URL, so it may contain any
    /// character. An explicit [`url`](Self::url) is parsed as-is.
    pub fn connection_info(&self) -> RedisResult<ConnectionInfo> {
        if let Some(url) = &self.url {
            return url.as_str().into_connection_info();
        }
        let mut redis = RedisConnectionInfo::default().set_db(self.database);
        if let Some(password) = &self.password {
            redis = redis.set_password(password);
        }
        Ok(ConnectionAddr::Tcp(self.host.clone(), self.port)
            .into_connection_info()?
            .set_redis_settings(redis))
    }

    /// Connection URL safe to print in logs.
    pub fn redacted_url(&self) -> String {
        if self.url.is_some() {
            return "redis://<from REDIS_URL>".to_owned();
        }
        let auth = if self.password.is_some() { ":***@" } else { "" };
        format!(
            "redis://{auth}{}:{}/{}",
            self.host, self.port, self.database
        )
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new("localhost", 6379)
    }
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConfig")
            .field("url", &self.redacted_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp_addr(info: &ConnectionInfo) -> (String, u16) {
        match info.addr() {
            ConnectionAddr::Tcp(host, port) => (host.clone(), *port),
            other => panic!("unexpected address {other:?}"),
        }
    }

    #[test]
    fn default_points_at_local_database_zero() {
        let info = RedisConfig::default().connection_info().unwrap();
        assert_eq!(tcp_addr(&info), ("localhost".to_owned(), 6379));
        assert_eq!(info.redis_settings().db(), 0);
        assert_eq!(info.redis_settings().password(), None);
    }

    #[test]
    fn password_and_database_are_carried_verbatim() {
        let config = RedisConfig::new("cache.internal", 6380)
            .with_password("p@ss/w#rd?")
            .with_database(2);
        let info = config.connection_info().unwrap();
        assert_eq!(tcp_addr(&info), ("cache.internal".to_owned(), 6380));
        assert_eq!(info.redis_settings().password(), Some("p@ss/w#rd?"));
        assert_eq!(info.redis_settings().db(), 2);
        assert_eq!(config.redacted_url(), "redis://:***@cache.internal:6380/2");
        assert!(!format!("{config:?}").contains("p@ss"));
    }

    #[test]
    fn explicit_url_wins() {
        let mut config = RedisConfig::default().with_password("ignored");
        config.url = Some("redis://other:1234/5".into());
        let info = config.connection_info().unwrap();
        assert_eq!(tcp_addr(&info), ("other".to_owned(), 1234));
        assert_eq!(info.redis_settings().db(), 5);
        assert_eq!(info.redis_settings().password(), None);
    }

    #[test]
    fn malformed_url_is_rejected() {
        let mut config = RedisConfig::default();
        config.url = Some("not a url".into());
        assert!(config.connection_info().is_err());
    }
}
