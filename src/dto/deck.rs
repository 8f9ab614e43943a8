//! DTO definitions for the deck endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::deck::Card;

/// Card returned by `/api/drawCard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DrawCardResponse {
    /// Token of the drawn card.
    #[serde(rename = "drawnCard")]
    pub drawn_card: String,
}

impl From<Card> for DrawCardResponse {
    fn from(card: Card) -> Self {
        Self {
            drawn_card: card.token().to_owned(),
        }
    }
}

/// A card still waiting in the deck.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeckCard {
    pub token: String,
    pub kind: String,
}

impl From<Card> for DeckCard {
    fn from(card: Card) -> Self {
        Self {
            token: card.token().to_owned(),
            kind: card.kind().to_owned(),
        }
    }
}

/// Current content of the shared deck, head first.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeckResponse {
    pub remaining: usize,
    pub cards: Vec<DeckCard>,
}

impl From<Vec<Card>> for DeckResponse {
    fn from(cards: Vec<Card>) -> Self {
        Self {
            remaining: cards.len(),
            cards: cards.into_iter().map(DeckCard::from).collect(),
        }
    }
}

/// Plain confirmation payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
