use crate::round::RoundPhase;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("a table seats 1 to {max} players, got {got}")]
    InvalidSeatCount { got: usize, max: usize },
    #[error("a shoe holds 1 to {max} decks, got {got}")]
    InvalidDeckCount { got: usize, max: usize },
    #[error("shoe built with {found} cards, expected {expected}")]
    MisbuiltShoe { expected: usize, found: usize },
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("no hand at index {0}")]
    NoSuchHand(usize),
    #[error("no player in seat {0}")]
    NoSuchSeat(usize),
    #[error("hand {0} cannot be split")]
    NotSplittable(usize),
    #[error("the dealer cannot {0}")]
    DealerRestricted(&'static str),
    #[error("round is in phase {actual:?}, expected {expected:?}")]
    OutOfPhase {
        expected: RoundPhase,
        actual: RoundPhase,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
