use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Store backend serving the deck and scores ("redis" or "memory").
    pub store: String,
}

impl HealthResponse {
    /// Create a health response indicating the store answered.
    pub fn ok(store: &str) -> Self {
        Self {
            status: "ok".to_string(),
            store: store.to_string(),
        }
    }

    /// Create a health response indicating the store could not be reached.
    pub fn degraded(store: &str) -> Self {
        Self {
            status: "degraded".to_string(),
            store: store.to_string(),
        }
    }
}
