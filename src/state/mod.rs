pub mod deck;

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::timeout;

use crate::{
    config::AppConfig,
    dao::{card_store::CardStore, storage::StorageResult},
    error::ServiceError,
};

pub type SharedState = Arc<AppState>;

/// Central application state: the injected store handle and the runtime configuration.
pub struct AppState {
    store: Arc<dyn CardStore>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Arc<dyn CardStore>, config: AppConfig) -> SharedState {
        Arc::new(Self { store, config })
    }

    /// Handle to the key-value store shared by every request.
    pub fn store(&self) -> &dyn CardStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Maximum time a single store round-trip may take.
    pub fn store_timeout(&self) -> Duration {
        self.config.store_timeout
    }

    /// Await a store operation, failing with [`ServiceError::Timeout`] once the
    /// configured deadline passes.
    pub async fn run_store_op<T, Fut>(&self, operation: Fut) -> Result<T, ServiceError>
    where
        Fut: Future<Output = StorageResult<T>>,
    {
        match timeout(self.store_timeout(), operation).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout),
        }
    }
}
