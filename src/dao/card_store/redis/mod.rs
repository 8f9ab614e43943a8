mod config;
mod error;
pub mod store;

pub use config::RedisConfig;
pub use error::RedisDaoError;
pub use store::RedisCardStore;

use crate::dao::storage::StorageError;

impl From<RedisDaoError> for StorageError {
    fn from(err: RedisDaoError) -> Self {
        let key = match &err {
            RedisDaoError::Command { key, .. } => Some(key.clone()),
            RedisDaoError::Scan { pattern, .. } => Some(pattern.clone()),
            _ => None,
        };
        StorageError::unavailable("redis", key, err)
    }
}
