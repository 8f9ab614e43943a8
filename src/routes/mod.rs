use axum::Router;

use crate::state::SharedState;

pub mod deck;
pub mod docs;
pub mod health;
pub mod score;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(deck::router())
        .merge(score::router());

    api_router.merge(docs::router()).with_state(state)
}
