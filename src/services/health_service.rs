use tracing::warn;

use crate::{config::StoreBackend, dto::health::HealthResponse, state::SharedState};

/// Ping the store and report whether it answered within the store timeout.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let backend = match state.config().store_backend {
        StoreBackend::Redis => "redis",
        StoreBackend::Memory => "memory",
    };

    match state.run_store_op(state.store().health_check()).await {
        Ok(()) => HealthResponse::ok(backend),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded(backend)
        }
    }
}
