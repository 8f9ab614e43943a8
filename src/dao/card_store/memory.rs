//! In-process [`CardStore`] backend with the same command semantics as Redis.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use thiserror::Error;

use super::{CardStore, pick_index};
use crate::dao::storage::{StorageError, StorageResult};

/// Failures raised by the in-memory backend.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    /// The key holds a value of a different type than the command expects.
    #[error("operation against key `{key}` holding the wrong kind of value")]
    WrongType { key: String },
    /// The value at `key` cannot be incremented.
    #[error("value at `{key}` is not an integer or out of range")]
    NotAnInteger { key: String },
    /// The store was switched offline to simulate an outage.
    #[error("in-memory store is offline")]
    Offline,
}

impl From<MemoryStoreError> for StorageError {
    fn from(err: MemoryStoreError) -> Self {
        let key = match &err {
            MemoryStoreError::WrongType { key } | MemoryStoreError::NotAnInteger { key } => {
                Some(key.clone())
            }
            MemoryStoreError::Offline => None,
        };
        StorageError::unavailable("memory", key, err)
    }
}

type MemoryResult<T> = Result<T, MemoryStoreError>;

#[derive(Debug, Clone)]
enum Value {
    List(VecDeque<String>),
    Text(String),
}

/// Key-value store kept in a [`DashMap`]; each key is mutated under its shard lock, so
/// compound list operations are atomic with respect to each other.
#[derive(Clone, Default)]
pub struct MemoryCardStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    entries: DashMap<String, Value>,
    offline: AtomicBool,
    latency_ms: AtomicU64,
}

impl MemoryCardStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again) until toggled back.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay every reply by `latency`, as a slow network round-trip would. The command
    /// itself still applies immediately.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.inner.latency_ms.store(millis, Ordering::SeqCst);
    }

    fn respond<T: Send + 'static>(
        &self,
        result: MemoryResult<T>,
    ) -> BoxFuture<'static, StorageResult<T>> {
        let latency = Duration::from_millis(self.inner.latency_ms.load(Ordering::SeqCst));
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result.map_err(Into::into)
        })
    }

    fn ensure_online(&self) -> MemoryResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(MemoryStoreError::Offline);
        }
        Ok(())
    }

    fn wrong_type(key: &str) -> MemoryStoreError {
        MemoryStoreError::WrongType {
            key: key.to_owned(),
        }
    }

    fn read_list(&self, key: &str) -> MemoryResult<Vec<String>> {
        self.ensure_online()?;
        match self.inner.entries.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => Ok(items.iter().cloned().collect()),
            Some(Value::Text(_)) => Err(Self::wrong_type(key)),
        }
    }

    fn delete(&self, key: &str) -> MemoryResult<bool> {
        self.ensure_online()?;
        Ok(self.inner.entries.remove(key).is_some())
    }

    fn prepend(&self, key: &str, value: String) -> MemoryResult<usize> {
        self.ensure_online()?;
        match self.inner.entries.entry(key.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(Value::List(VecDeque::from([value])));
                Ok(1)
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::List(items) => {
                    items.push_front(value);
                    Ok(items.len())
                }
                Value::Text(_) => Err(Self::wrong_type(key)),
            },
        }
    }

    fn remove_one(&self, key: &str, value: &str) -> MemoryResult<usize> {
        self.ensure_online()?;
        let Entry::Occupied(mut slot) = self.inner.entries.entry(key.to_owned()) else {
            return Ok(0);
        };
        let Value::List(items) = slot.get_mut() else {
            return Err(Self::wrong_type(key));
        };
        let Some(position) = items.iter().position(|item| item == value) else {
            return Ok(0);
        };
        items.remove(position);
        // Redis drops empty lists.
        if items.is_empty() {
            slot.remove();
        }
        Ok(1)
    }

    fn read(&self, key: &str) -> MemoryResult<Option<String>> {
        self.ensure_online()?;
        match self.inner.entries.get(key).as_deref() {
            None => Ok(None),
            Some(Value::Text(value)) => Ok(Some(value.clone())),
            Some(Value::List(_)) => Err(Self::wrong_type(key)),
        }
    }

    fn write(&self, key: &str, value: String) -> MemoryResult<()> {
        self.ensure_online()?;
        self.inner.entries.insert(key.to_owned(), Value::Text(value));
        Ok(())
    }

    fn incr(&self, key: &str) -> MemoryResult<i64> {
        self.ensure_online()?;
        match self.inner.entries.entry(key.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(Value::Text("1".to_owned()));
                Ok(1)
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Text(current) => {
                    let next = current
                        .parse::<i64>()
                        .ok()
                        .and_then(|value| value.checked_add(1))
                        .ok_or_else(|| MemoryStoreError::NotAnInteger {
                            key: key.to_owned(),
                        })?;
                    *current = next.to_string();
                    Ok(next)
                }
                Value::List(_) => Err(Self::wrong_type(key)),
            },
        }
    }

    fn replace(&self, key: &str, values: Vec<String>) -> MemoryResult<()> {
        self.ensure_online()?;
        if values.is_empty() {
            self.inner.entries.remove(key);
        } else {
            self.inner
                .entries
                .insert(key.to_owned(), Value::List(values.into()));
        }
        Ok(())
    }

    fn take(&self, key: &str, pick: f64) -> MemoryResult<Option<String>> {
        self.ensure_online()?;
        let Entry::Occupied(mut slot) = self.inner.entries.entry(key.to_owned()) else {
            return Ok(None);
        };
        let Value::List(items) = slot.get_mut() else {
            return Err(Self::wrong_type(key));
        };
        let index = pick_index(pick, items.len());
        let taken = items.remove(index);
        if items.is_empty() {
            slot.remove();
        }
        Ok(taken)
    }

    fn scan(&self, prefix: &str) -> MemoryResult<Vec<(String, String)>> {
        self.ensure_online()?;
        Ok(self
            .inner
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .filter_map(|entry| match entry.value() {
                Value::Text(value) => Some((entry.key().clone(), value.clone())),
                Value::List(_) => None,
            })
            .collect())
    }
}

impl CardStore for MemoryCardStore {
    fn list_range(&self, key: &str) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        self.respond(self.read_list(key))
    }

    fn list_delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>> {
        self.respond(self.delete(key))
    }

    fn list_prepend(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<usize>> {
        self.respond(self.prepend(key, value))
    }

    fn list_remove_one(
        &self,
        key: &str,
        value: String,
    ) -> BoxFuture<'static, StorageResult<usize>> {
        self.respond(self.remove_one(key, &value))
    }

    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        self.respond(self.read(key))
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        self.respond(self.write(key, value))
    }

    fn increment(&self, key: &str) -> BoxFuture<'static, StorageResult<i64>> {
        self.respond(self.incr(key))
    }

    fn replace_list(
        &self,
        key: &str,
        values: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.respond(self.replace(key, values))
    }

    fn take_at(&self, key: &str, pick: f64) -> BoxFuture<'static, StorageResult<Option<String>>> {
        self.respond(self.take(key, pick))
    }

    fn scan_prefix(
        &self,
        prefix: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<(String, String)>>> {
        self.respond(self.scan(prefix))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.respond(self.ensure_online())
    }
}
