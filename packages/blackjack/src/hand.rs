use crate::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BLACKJACK: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Active,
    Standing,
    Bust,
    Surrendered,
}

impl fmt::Display for HandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandStatus::Active => "active",
            HandStatus::Standing => "standing",
            HandStatus::Bust => "bust",
            HandStatus::Surrendered => "surrendered",
        };
        f.write_str(s)
    }
}

/// One betting unit: its cards, the amount riding on it and how its turn ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    pub(crate) bet: u64,
    pub(crate) stood: bool,
    pub(crate) doubled: bool,
    pub(crate) surrendered: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hand from cards as dealt, adjusting aces after each one.
    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        let mut hand = Self::new();
        for card in cards {
            hand.push(card);
            hand.adjust_aces();
        }
        hand
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn is_doubled(&self) -> bool {
        self.doubled
    }

    /// Appends a card without touching aces; see `adjust_aces`.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn count(&self) -> u32 {
        self.cards.iter().map(Card::value).sum()
    }

    pub fn is_busted(&self) -> bool {
        self.count() > BLACKJACK
    }

    /// A natural: exactly two cards totalling 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.count() == BLACKJACK
    }

    /// Two cards of equal point value. Whether the owner can fund the
    /// second bet is checked by the participant.
    pub fn is_splittable(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].pair_value() == self.cards[1].pair_value()
    }

    pub fn first_ace_high_index(&self) -> Option<usize> {
        self.cards.iter().position(Card::is_ace_high)
    }

    /// While the hand is over 21, lowers the first remaining ace high.
    /// Each ace is lowered at most once. Returns the new count.
    ///
    /// One call may lower more than one ace: [A, K] + A lowers both aces
    /// and counts 12, where lowering only the first ace high would leave
    /// the hand bust on 22.
    pub fn adjust_aces(&mut self) -> u32 {
        while self.count() > BLACKJACK {
            match self.first_ace_high_index() {
                Some(idx) => {
                    self.cards[idx].lower_ace();
                }
                None => break,
            }
        }
        self.count()
    }

    /// Raises lowered aces again as long as the hand stays at 21 or under.
    pub fn restore_aces(&mut self) -> u32 {
        for idx in 0..self.cards.len() {
            let lowered = self.cards[idx].is_ace() && !self.cards[idx].is_ace_high();
            if lowered && self.count() + 10 <= BLACKJACK {
                self.cards[idx].raise_ace();
            }
        }
        self.count()
    }

    /// Moves the second card into a new hand carrying the same bet. Returns
    /// `None` and leaves the hand untouched if it is not a splittable pair.
    pub fn split(&mut self) -> Option<Hand> {
        if !self.is_splittable() {
            return None;
        }
        let second = self.cards.pop()?;
        self.restore_aces();

        let mut new_hand = Hand::new();
        new_hand.bet = self.bet;
        new_hand.push(second);
        new_hand.restore_aces();
        Some(new_hand)
    }

    pub fn status(&self) -> HandStatus {
        if self.surrendered {
            HandStatus::Surrendered
        } else if self.is_busted() {
            HandStatus::Bust
        } else if self.stood {
            HandStatus::Standing
        } else {
            HandStatus::Active
        }
    }

    /// True once the hand takes no further actions this round.
    pub fn is_finished(&self) -> bool {
        self.status() != HandStatus::Active
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "[{}] ({})", cards.join(" "), self.count())
    }
}
