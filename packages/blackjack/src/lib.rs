mod card;
mod error;
mod hand;
mod participant;
mod round;
mod rules;
mod settlement;
mod shoe;

pub use card::{AceValue, Card, Rank, Suit};
pub use error::{GameError, Result};
pub use hand::{Hand, HandStatus, BLACKJACK};
pub use participant::{Participant, Role};
pub use round::{
    legal_actions, Action, PlayerInput, Question, RoundPhase, RoundSummary, Seat, Table,
    TableEvent,
};
pub use rules::{PayoutRatio, TableRules, DEALER_STANDS_ON, MAX_DECKS, MAX_SEATS};
pub use settlement::{settle_hand, HandOutcome, Settlement};
pub use shoe::{fisher_yates, Shoe, CARDS_PER_DECK};
