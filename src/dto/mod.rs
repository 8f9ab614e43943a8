pub mod deck;
pub mod health;
pub mod score;
pub mod validation;
