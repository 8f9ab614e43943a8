use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;

use crate::{
    dto::deck::{DeckResponse, DrawCardResponse, MessageResponse},
    error::AppError,
    services::deck_service,
    state::SharedState,
};

/// Routes operating on the shared deck.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/drawCard", post(draw_card))
        .route("/api/shuffleDeck", post(shuffle_deck))
        .route("/api/defuseBomb", post(defuse_bomb))
        .route("/api/deck", get(get_deck))
}

/// Draw one random card, removing it from the deck.
#[utoipa::path(
    post,
    path = "/api/drawCard",
    tag = "deck",
    responses(
        (status = 200, description = "Card drawn", body = DrawCardResponse),
        (status = 500, description = "Deck empty or store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn draw_card(
    State(state): State<SharedState>,
) -> Result<Json<DrawCardResponse>, AppError> {
    let card = deck_service::draw_card(&state).await?;
    Ok(Json(card.into()))
}

/// Rebuild the deck from the canonical card set in a new random order.
#[utoipa::path(
    post,
    path = "/api/shuffleDeck",
    tag = "deck",
    responses(
        (status = 200, description = "Deck rebuilt and shuffled"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn shuffle_deck(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    deck_service::reset_deck(&state).await?;
    Ok(StatusCode::OK)
}

/// Cards still waiting in the deck.
#[utoipa::path(
    get,
    path = "/api/deck",
    tag = "deck",
    responses(
        (status = 200, description = "Remaining cards", body = DeckResponse),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn get_deck(State(state): State<SharedState>) -> Result<Json<DeckResponse>, AppError> {
    let cards = deck_service::remaining_cards(&state).await?;
    Ok(Json(cards.into()))
}

/// Defuse an exploding kitten. Nothing is persisted.
#[utoipa::path(
    post,
    path = "/api/defuseBomb",
    tag = "deck",
    responses((status = 200, description = "Bomb defused", body = MessageResponse))
)]
pub async fn defuse_bomb() -> Json<MessageResponse> {
    info!("bomb defused");
    Json(MessageResponse::new("Bomb defused successfully!"))
}
