use rand::Rng;
use tracing::{debug, info};

use crate::{
    dao::card_store::DECK_KEY,
    error::ServiceError,
    state::{
        SharedState,
        deck::{Card, shuffled_deck},
    },
};

/// Rebuild the shared deck in a fresh random order, replacing whatever it held.
///
/// The delete and the repopulation run in one store transaction, so readers see
/// either the old deck or the complete new one. Returns the number of cards written.
pub async fn reset_deck(state: &SharedState) -> Result<usize, ServiceError> {
    let cards = shuffled_deck(state.config().deck_copies);
    let tokens: Vec<String> = cards.iter().map(|card| card.token().to_owned()).collect();
    let count = tokens.len();

    state
        .run_store_op(state.store().replace_list(DECK_KEY, tokens))
        .await?;

    info!(cards = count, "deck reset");
    Ok(count)
}

/// Remove one uniformly random card from the shared deck and return it.
pub async fn draw_card(state: &SharedState) -> Result<Card, ServiceError> {
    let pick: f64 = rand::rng().random();
    let token = state
        .run_store_op(state.store().take_at(DECK_KEY, pick))
        .await?
        .ok_or(ServiceError::EmptyDeck)?;

    let card = token.parse::<Card>()?;
    debug!(card = card.kind(), "card drawn");
    Ok(card)
}

/// Cards currently left in the shared deck, head first.
pub async fn remaining_cards(state: &SharedState) -> Result<Vec<Card>, ServiceError> {
    let tokens = state
        .run_store_op(state.store().list_range(DECK_KEY))
        .await?;

    tokens
        .iter()
        .map(|token| token.parse::<Card>().map_err(ServiceError::from))
        .collect()
}
