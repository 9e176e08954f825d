use thiserror::Error;

use crate::cards::Card;

#[derive(Error, Debug)]
pub enum NashError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid card id: {0} (must be 1-52)")]
    InvalidCardId(u8),

    #[error("Card {0} appears more than once")]
    DuplicateCard(Card),

    #[error("Invalid hand category: {0}")]
    InvalidCategory(String),

    #[error("A hand must have 5 to 7 cards, got {got}")]
    InvalidHand { got: usize },

    #[error("A board must have 0 to 5 cards, got {got}")]
    InvalidBoard { got: usize },

    #[error("Hole cards must be exactly 2 cards, got {got}")]
    InvalidHoleSize { got: usize },

    #[error("Expected {expected} values, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Undefined: {0}")]
    Undefined(&'static str),

    #[error("Corrupt hand rank table: expected {expected} bytes, got {got}")]
    CorruptTable { expected: usize, got: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NashResult<T> = Result<T, NashError>;
