use std::{fmt, str::FromStr};

use rand::seq::SliceRandom;
use thiserror::Error;

/// Card kinds that make up the shared deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Card {
    Cat,
    SkipTurn,
    Shuffle,
    ExplodingKitten,
}

impl Card {
    /// Every card kind, in canonical deck order.
    pub const ALL: [Card; 4] = [
        Card::Cat,
        Card::SkipTurn,
        Card::Shuffle,
        Card::ExplodingKitten,
    ];

    /// Token persisted in the store and sent to clients.
    pub fn token(self) -> &'static str {
        match self {
            Card::Cat => "😼",
            Card::SkipTurn => "🙅‍♂️",
            Card::Shuffle => "🔀",
            Card::ExplodingKitten => "💣",
        }
    }

    /// Stable snake_case name of the card kind.
    pub fn kind(self) -> &'static str {
        match self {
            Card::Cat => "cat",
            Card::SkipTurn => "skip_turn",
            Card::Shuffle => "shuffle",
            Card::ExplodingKitten => "exploding_kitten",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A stored token that does not name any card kind.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown card token `{0}`")]
pub struct UnknownCard(pub String);

impl FromStr for Card {
    type Err = UnknownCard;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Card::ALL
            .into_iter()
            .find(|card| card.token() == token)
            .ok_or_else(|| UnknownCard(token.to_owned()))
    }
}

/// Upper bound on how many copies of each card kind a deck may hold.
pub const MAX_DECK_COPIES: usize = 1024;

/// Clamp a configured copy count into `1..=MAX_DECK_COPIES`.
pub fn bounded_copies(copies: usize) -> usize {
    copies.clamp(1, MAX_DECK_COPIES)
}

/// The canonical deck: one card of each kind, repeated `copies` times.
pub fn canonical_deck(copies: usize) -> Vec<Card> {
    std::iter::repeat_n(Card::ALL, bounded_copies(copies))
        .flatten()
        .collect()
}

/// Canonical deck in a fresh random order.
pub fn shuffled_deck(copies: usize) -> Vec<Card> {
    let mut cards = canonical_deck(copies);
    cards.shuffle(&mut rand::rng());
    cards
}
