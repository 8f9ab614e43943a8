pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Key holding the single global deck list.
pub const DECK_KEY: &str = "deck";
/// Prefix shared by every per-user score counter.
pub const SCORE_KEY_PREFIX: &str = "score:";

/// Build the counter key for `username`.
pub fn score_key(username: &str) -> String {
    format!("{SCORE_KEY_PREFIX}{username}")
}

/// Abstraction over the key-value store holding the deck and the score counters.
///
/// List and scalar primitives map one-to-one onto store commands. The compound
/// operations (`replace_list`, `take_at`) must execute atomically on the backend.
pub trait CardStore: Send + Sync {
    /// Every entry of the list at `key`, head first. Missing keys read as empty.
    fn list_range(&self, key: &str) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Delete `key` whatever its type. Returns whether something was removed.
    fn list_delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>>;
    /// Push `value` at the head of the list, returning the new length.
    fn list_prepend(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<usize>>;
    /// Remove the first occurrence of `value`, returning how many entries were removed.
    fn list_remove_one(&self, key: &str, value: String)
    -> BoxFuture<'static, StorageResult<usize>>;
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Atomically add one to the integer at `key`, creating it at 1.
    fn increment(&self, key: &str) -> BoxFuture<'static, StorageResult<i64>>;
    /// Replace the list at `key` with `values` in one transaction. The stored order
    /// matches the order of `values`.
    fn replace_list(&self, key: &str, values: Vec<String>)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Atomically remove and return the entry at position `floor(pick * len)`.
    ///
    /// `pick` is expected in `[0, 1)`; out-of-range values are clamped. Returns
    /// `None` when the list is empty or missing.
    fn take_at(&self, key: &str, pick: f64) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// All scalar keys starting with `prefix` together with their values.
    fn scan_prefix(&self, prefix: &str)
    -> BoxFuture<'static, StorageResult<Vec<(String, String)>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Map a `[0, 1)` pick onto a list index, clamping stray values.
pub(crate) fn pick_index(pick: f64, len: usize) -> usize {
    if len == 0 || !pick.is_finite() || pick <= 0.0 {
        return 0;
    }
    ((pick * len as f64).floor() as usize).min(len - 1)
}
