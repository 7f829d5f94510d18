use crate::{Card, GameError, Rank, Result, Suit, MAX_DECKS};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

pub const CARDS_PER_DECK: usize = 52;

/// Fisher-Yates (Knuth) pass: every position i takes a uniformly chosen
/// card from positions i..n, so each of the n! orderings is equally likely.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let n = items.len();
    for i in 0..n {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}

fn check_deck_count(num_decks: usize) -> Result<()> {
    if num_decks == 0 || num_decks > MAX_DECKS {
        return Err(GameError::InvalidDeckCount {
            got: num_decks,
            max: MAX_DECKS,
        });
    }
    Ok(())
}

/// The drawable card source for a round, spanning one or more decks.
/// Rebuilt and reshuffled from scratch at the start of every round.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: usize,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates an empty shoe seeded from OS entropy. Call `build` before drawing.
    pub fn new(num_decks: usize) -> Result<Self> {
        Self::with_rng(num_decks, ChaCha8Rng::from_entropy())
    }

    /// Creates an empty shoe whose shuffles are reproducible from `seed`.
    pub fn seeded(num_decks: usize, seed: u64) -> Result<Self> {
        Self::with_rng(num_decks, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(num_decks: usize, rng: ChaCha8Rng) -> Result<Self> {
        check_deck_count(num_decks)?;
        Ok(Self {
            cards: Vec::with_capacity(num_decks * CARDS_PER_DECK),
            num_decks,
            rng,
        })
    }

    /// Discards whatever is left, repopulates `num_decks` decks in canonical
    /// suit/rank order and shuffles.
    pub fn build(&mut self, num_decks: usize) -> Result<()> {
        check_deck_count(num_decks)?;
        self.num_decks = num_decks;
        self.cards.clear();
        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    self.cards.push(Card::new(suit, rank));
                }
            }
        }

        let expected = CARDS_PER_DECK * num_decks;
        if self.cards.len() != expected {
            return Err(GameError::MisbuiltShoe {
                expected,
                found: self.cards.len(),
            });
        }

        self.shuffle();
        log::debug!("built shoe of {} deck(s), {} cards", num_decks, expected);
        Ok(())
    }

    pub fn shuffle(&mut self) {
        fisher_yates(&mut self.cards, &mut self.rng);
    }

    /// Removes the next card. `None` once the shoe is exhausted.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Replaces the contents so that `cards` come out of `draw` in order.
    /// Used to script a round; the next `build` discards the stack.
    pub fn stack(&mut self, cards: Vec<Card>) {
        self.cards = cards.into_iter().rev().collect();
    }
}
