/// Deck and score persistence operations.
pub mod card_store;
/// Storage abstraction layer for key-value operations.
pub mod storage;
