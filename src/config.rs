//! Application-level configuration loading: listening port, store backend, and deck size.

use std::{env, fmt::Display, fs, io::ErrorKind, path::PathBuf, str::FromStr, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

#[cfg(feature = "redis-store")]
use crate::dao::card_store::redis::RedisConfig;
use crate::state::deck::bounded_copies;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "EXPLODING_KITTENS_CONFIG_PATH";

const DEFAULT_PORT: u16 = 5173;
const DEFAULT_REDIS_HOST: &str = "localhost";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Which [`CardStore`](crate::dao::card_store::CardStore) implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Remote Redis server.
    Redis,
    /// Process-local store, lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Selected store implementation.
    pub store_backend: StoreBackend,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    pub redis_db: i64,
    /// Complete Redis URL overriding host, port, password and database.
    pub redis_url: Option<String>,
    /// Upper bound for a single store round-trip.
    pub store_timeout: Duration,
    /// How many copies of each card kind a reset deck holds.
    pub deck_copies: usize,
}

impl AppConfig {
    /// Load the configuration file (if any), then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_overrides(|name| env::var(name).ok());
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Override fields from variables returned by `lookup`. Unparsable values are
    /// logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(port) = var("PORT").or_else(|| var("SERVER_PORT")) {
            override_parsed(&mut self.port, "PORT", &port);
        }
        if let Some(backend) = var("STORE_BACKEND") {
            override_parsed(&mut self.store_backend, "STORE_BACKEND", &backend);
        }
        if let Some(host) = var("REDIS_HOST") {
            self.redis_host = host;
        }
        if let Some(port) = var("REDIS_PORT") {
            override_parsed(&mut self.redis_port, "REDIS_PORT", &port);
        }
        if let Some(password) = var("REDIS_PASSWORD") {
            self.redis_password = Some(password);
        }
        if let Some(db) = var("REDIS_DB") {
            override_parsed(&mut self.redis_db, "REDIS_DB", &db);
        }
        if let Some(url) = var("REDIS_URL") {
            self.redis_url = Some(url);
        }
        if let Some(timeout) = var("STORE_TIMEOUT_MS") {
            let mut millis = self.store_timeout.as_millis() as u64;
            override_parsed(&mut millis, "STORE_TIMEOUT_MS", &timeout);
            self.store_timeout = Duration::from_millis(millis.max(1));
        }
        if let Some(copies) = var("DECK_COPIES") {
            override_parsed(&mut self.deck_copies, "DECK_COPIES", &copies);
            self.deck_copies = bounded_copies(self.deck_copies);
        }
    }

    /// Connection settings for the Redis backend.
    #[cfg(feature = "redis-store")]
    pub fn redis_config(&self) -> RedisConfig {
        let mut config =
            RedisConfig::new(self.redis_host.clone(), self.redis_port).with_database(self.redis_db);
        if let Some(password) = &self.redis_password {
            config = config.with_password(password.clone());
        }
        config.url = self.redis_url.clone();
        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store_backend: StoreBackend::Redis,
            redis_host: DEFAULT_REDIS_HOST.to_owned(),
            redis_port: DEFAULT_REDIS_PORT,
            redis_password: None,
            redis_db: 0,
            redis_url: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            deck_copies: 1,
        }
    }
}

fn override_parsed<T>(slot: &mut T, name: &str, raw: &str)
where
    T: FromStr,
    T::Err: Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(err) => warn!(var = name, value = raw, error = %err, "ignoring invalid override"),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: Option<u16>,
    store: RawStore,
    deck: RawDeck,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStore {
    backend: Option<StoreBackend>,
    host: Option<String>,
    port: Option<u16>,
    password: Option<String>,
    database: Option<i64>,
    url: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDeck {
    copies: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let RawConfig { port, store, deck } = value;
        Self {
            port: port.unwrap_or(defaults.port),
            store_backend: store.backend.unwrap_or(defaults.store_backend),
            redis_host: store.host.unwrap_or(defaults.redis_host),
            redis_port: store.port.unwrap_or(defaults.redis_port),
            redis_password: store.password.or(defaults.redis_password),
            redis_db: store.database.unwrap_or(defaults.redis_db),
            redis_url: store.url.or(defaults.redis_url),
            store_timeout: store
                .timeout_ms
                .map(|millis| Duration::from_millis(millis.max(1)))
                .unwrap_or(defaults.store_timeout),
            deck_copies: bounded_copies(deck.copies.unwrap_or(defaults.deck_copies)),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
