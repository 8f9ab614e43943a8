use std::{collections::BTreeSet, sync::Arc};

use futures::future::BoxFuture;
use redis::{AsyncCommands, AsyncIter, Client, ScanOptions, Script, aio::ConnectionManager};

use super::{
    config::RedisConfig,
    error::{RedisDaoError, RedisResult},
};
use crate::dao::{
    card_store::CardStore,
    storage::{StorageError, StorageResult},
};

const SCAN_BATCH: usize = 100;

/// Remove the entry at `floor(ARGV[1] * len)` by trimming the list to its head and
/// pushing the tail back, so no value is ever matched by content. Redis runs the whole
/// script atomically.
const TAKE_AT_SCRIPT: &str = r#"
local len = redis.call('LLEN', KEYS[1])
if len == 0 then
  return false
end
local index = math.floor(tonumber(ARGV[1]) * len)
if index < 0 then index = 0 end
if index >= len then index = len - 1 end
local card = redis.call('LINDEX', KEYS[1], index)
if index == 0 then
  redis.call('LPOP', KEYS[1])
  return card
end
local tail = redis.call('LRANGE', KEYS[1], index + 1, -1)
redis.call('LTRIM', KEYS[1], 0, index - 1)
for first = 1, #tail, 1000 do
  redis.call('RPUSH', KEYS[1], unpack(tail, first, math.min(first + 999, #tail)))
end
return card
"#;

#[derive(Clone)]
pub struct RedisCardStore {
    inner: Arc<RedisInner>,
}

struct RedisInner {
    connection: ConnectionManager,
    take_script: Script,
}

impl RedisCardStore {
    /// Open the shared connection manager and make sure the server answers.
    pub async fn connect(config: RedisConfig) -> RedisResult<Self> {
        let client = config
            .connection_info()
            .and_then(Client::open)
            .map_err(|source| RedisDaoError::InvalidConfig {
                url: config.redacted_url(),
                source,
            })?;
        let connection =
            ConnectionManager::new(client)
                .await
                .map_err(|source| RedisDaoError::Connect {
                    url: config.redacted_url(),
                    source,
                })?;

        let store = Self {
            inner: Arc::new(RedisInner {
                connection,
                take_script: Script::new(TAKE_AT_SCRIPT),
            }),
        };
        store.ping().await?;
        Ok(store)
    }

    fn connection(&self) -> ConnectionManager {
        self.inner.connection.clone()
    }

    async fn ping(&self) -> RedisResult<()> {
        let mut con = self.connection();
        let _: String = redis::cmd("PING")
            .query_async(&mut con)
            .await
            .map_err(|source| RedisDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn replace_list(&self, key: String, values: Vec<String>) -> RedisResult<()> {
        let mut con = self.connection();
        let mut pipe = redis::pipe();
        pipe.atomic().del(&key).ignore();
        if !values.is_empty() {
            pipe.rpush(&key, values).ignore();
        }
        let (): () = pipe
            .query_async(&mut con)
            .await
            .map_err(RedisDaoError::command("MULTI DEL RPUSH", &key))?;
        Ok(())
    }

    async fn take_at(&self, key: String, pick: f64) -> RedisResult<Option<String>> {
        let pick = if pick.is_finite() {
            pick.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut con = self.connection();
        self.inner
            .take_script
            .key(&key)
            .arg(pick)
            .invoke_async(&mut con)
            .await
            .map_err(RedisDaoError::command("EVALSHA take_at", &key))
    }

    async fn scan_prefix(&self, prefix: String) -> RedisResult<Vec<(String, String)>> {
        let pattern = format!("{prefix}*");
        let scan_error = |source| RedisDaoError::Scan {
            pattern: pattern.clone(),
            source,
        };
        let mut con = self.connection();

        // SCAN may report a key more than once; the set keeps each one.
        let mut keys = BTreeSet::new();
        {
            let options = ScanOptions::default()
                .with_pattern(pattern.as_str())
                .with_count(SCAN_BATCH);
            let mut iter: AsyncIter<'_, String> =
                con.scan_options(options).await.map_err(scan_error)?;
            while let Some(key) = iter.next_item().await {
                keys.insert(key.map_err(scan_error)?);
            }
        }

        let keys: Vec<String> = keys.into_iter().collect();
        let mut entries = Vec::with_capacity(keys.len());
        for batch in keys.chunks(SCAN_BATCH) {
            let values: Vec<Option<String>> = con.mget(batch).await.map_err(scan_error)?;
            // Keys can vanish between SCAN and MGET.
            entries.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(values)
                    .filter_map(|(key, value)| value.map(|value| (key, value))),
            );
        }

        Ok(entries)
    }
}

impl CardStore for RedisCardStore {
    fn list_range(&self, key: &str) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let items: Vec<String> = con
                .lrange(&key, 0, -1)
                .await
                .map_err(RedisDaoError::command("LRANGE", &key))?;
            Ok::<_, StorageError>(items)
        })
    }

    fn list_delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let removed: usize = con
                .del(&key)
                .await
                .map_err(RedisDaoError::command("DEL", &key))?;
            Ok::<_, StorageError>(removed > 0)
        })
    }

    fn list_prepend(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<usize>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let len: usize = con
                .lpush(&key, value)
                .await
                .map_err(RedisDaoError::command("LPUSH", &key))?;
            Ok::<_, StorageError>(len)
        })
    }

    fn list_remove_one(
        &self,
        key: &str,
        value: String,
    ) -> BoxFuture<'static, StorageResult<usize>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let removed: usize = con
                .lrem(&key, 1, value)
                .await
                .map_err(RedisDaoError::command("LREM", &key))?;
            Ok::<_, StorageError>(removed)
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let value: Option<String> = con
                .get(&key)
                .await
                .map_err(RedisDaoError::command("GET", &key))?;
            Ok::<_, StorageError>(value)
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let (): () = con
                .set(&key, value)
                .await
                .map_err(RedisDaoError::command("SET", &key))?;
            Ok::<_, StorageError>(())
        })
    }

    fn increment(&self, key: &str) -> BoxFuture<'static, StorageResult<i64>> {
        let mut con = self.connection();
        let key = key.to_owned();
        Box::pin(async move {
            let value: i64 = con
                .incr(&key, 1)
                .await
                .map_err(RedisDaoError::command("INCR", &key))?;
            Ok::<_, StorageError>(value)
        })
    }

    fn replace_list(
        &self,
        key: &str,
        values: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.replace_list(key, values).await.map_err(Into::into) })
    }

    fn take_at(&self, key: &str, pick: f64) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.take_at(key, pick).await.map_err(Into::into) })
    }

    fn scan_prefix(
        &self,
        prefix: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<(String, String)>>> {
        let store = self.clone();
        let prefix = prefix.to_owned();
        Box::pin(async move { store.scan_prefix(prefix).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
