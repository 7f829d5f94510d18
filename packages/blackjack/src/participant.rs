use crate::{Card, GameError, Hand, Result, DEALER_STANDS_ON};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gates which operations a participant may perform. The dealer never
/// bets, splits, doubles or surrenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Dealer,
}

/// A seat at the table: the dealer or a player with cash and one or more hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    role: Role,
    cash: u64,
    hands: Vec<Hand>,
}

impl Participant {
    pub fn player(cash: u64) -> Self {
        Self {
            role: Role::Player,
            cash,
            hands: vec![Hand::new()],
        }
    }

    pub fn dealer() -> Self {
        Self {
            role: Role::Dealer,
            cash: 0,
            hands: vec![Hand::new()],
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_dealer(&self) -> bool {
        self.role == Role::Dealer
    }

    pub fn cash(&self) -> u64 {
        self.cash
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hand_at(&self, index: usize) -> Result<&Hand> {
        self.hands.get(index).ok_or(GameError::NoSuchHand(index))
    }

    fn hand_at_mut(&mut self, index: usize) -> Result<&mut Hand> {
        self.hands.get_mut(index).ok_or(GameError::NoSuchHand(index))
    }

    fn require_player(&self, operation: &'static str) -> Result<()> {
        match self.role {
            Role::Player => Ok(()),
            Role::Dealer => Err(GameError::DealerRestricted(operation)),
        }
    }

    /// Back to a single empty hand with no bet. Cash carries over.
    pub fn reset(&mut self) {
        self.hands = vec![Hand::new()];
    }

    /// Adds a card to a hand and runs ace adjustment. Returns the new count.
    pub fn take(&mut self, card: Card, hand_index: usize) -> Result<u32> {
        let hand = self.hand_at_mut(hand_index)?;
        hand.push(card);
        Ok(hand.adjust_aces())
    }

    /// Moves `amount` from cash onto a hand. Refused without any change when
    /// `amount` times the number of held hands exceeds cash.
    pub fn bet(&mut self, amount: u64, hand_index: usize) -> Result<()> {
        self.require_player("bet")?;
        self.hand_at(hand_index)?;
        let exposure = amount.saturating_mul(self.hands.len() as u64);
        if exposure > self.cash {
            return Err(GameError::InsufficientFunds {
                needed: exposure,
                available: self.cash,
            });
        }
        self.cash -= amount;
        self.hands[hand_index].bet += amount;
        Ok(())
    }

    pub fn can_split(&self, hand_index: usize) -> bool {
        match self.hands.get(hand_index) {
            Some(hand) => {
                self.role == Role::Player && hand.is_splittable() && self.cash >= hand.bet
            }
            None => false,
        }
    }

    /// Splits a pair into two one-card hands, funding the new hand's bet from
    /// cash. The new hand is appended; its index is returned.
    pub fn split(&mut self, hand_index: usize) -> Result<usize> {
        self.require_player("split")?;
        let cash = self.cash;
        let hand = self.hand_at_mut(hand_index)?;
        if !hand.is_splittable() {
            return Err(GameError::NotSplittable(hand_index));
        }
        if cash < hand.bet {
            return Err(GameError::InsufficientFunds {
                needed: hand.bet,
                available: cash,
            });
        }
        let new_hand = hand.split().ok_or(GameError::NotSplittable(hand_index))?;
        self.cash -= new_hand.bet;
        self.hands.push(new_hand);
        Ok(self.hands.len() - 1)
    }

    /// Places a second bet equal to the first on the same hand.
    pub fn double(&mut self, hand_index: usize) -> Result<()> {
        self.require_player("double")?;
        let amount = self.hand_at(hand_index)?.bet;
        self.bet(amount, hand_index)?;
        self.hands[hand_index].doubled = true;
        Ok(())
    }

    pub fn stand(&mut self, hand_index: usize) -> Result<()> {
        self.hand_at_mut(hand_index)?.stood = true;
        Ok(())
    }

    /// Gives up the hand and returns half its bet, rounded down, to cash.
    /// Returns the refunded amount.
    pub fn surrender(&mut self, hand_index: usize) -> Result<u64> {
        self.require_player("surrender")?;
        let hand = self.hand_at_mut(hand_index)?;
        hand.surrendered = true;
        let refund = hand.bet / 2;
        self.return_winnings(refund);
        Ok(refund)
    }

    /// Credits cash, saturating at `u64::MAX`.
    pub fn return_winnings(&mut self, amount: u64) {
        self.cash = self.cash.saturating_add(amount);
    }

    /// True once every hand is bust, standing or surrendered.
    pub fn finished(&self) -> bool {
        self.hands.iter().all(Hand::is_finished)
    }

    /// The dealer's single hand, or a player's first hand.
    pub fn hand(&self) -> &Hand {
        &self.hands[0]
    }

    pub fn count(&self) -> u32 {
        self.hand().count()
    }

    /// Fixed dealer policy: draw below 17, no soft/hard distinction.
    pub fn will_hit(&self) -> bool {
        self.count() < DEALER_STANDS_ON
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hands: Vec<String> = self
            .hands
            .iter()
            .map(|h| format!("{} {}", h, h.status()))
            .collect();
        match self.role {
            Role::Dealer => write!(f, "{}", hands.join(", ")),
            Role::Player => write!(f, "cash {}, hands {}", self.cash, hands.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AceValue, HandStatus, Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(Suit::Heart, rank)
    }

    fn ace() -> Card {
        card(Rank::Ace(AceValue::High))
    }

    #[test]
    fn test_betting() {
        let mut player = Participant::player(1000);
        assert_eq!(
            player.bet(10_000, 0),
            Err(GameError::InsufficientFunds {
                needed: 10_000,
                available: 1000
            })
        );
        assert_eq!(player.cash(), 1000);
        assert_eq!(player.hand().bet(), 0);

        player.bet(100, 0).unwrap();
        assert_eq!(player.cash(), 900);
        assert_eq!(player.hand().bet(), 100);
    }

    #[test]
    fn test_bet_whole_stake() {
        let mut player = Participant::player(1000);
        player.bet(1000, 0).unwrap();
        assert_eq!(player.cash(), 0);
    }

    #[test]
    fn test_bet_exposure_counts_every_hand() {
        let mut player = Participant::player(300);
        player.take(card(Rank::Eight), 0).unwrap();
        player.take(Card::new(Suit::Club, Rank::Eight), 0).unwrap();
        player.bet(100, 0).unwrap();
        player.split(0).unwrap();
        assert_eq!(player.cash(), 100);
        // two hands: 60 * 2 > 100 even though 60 alone fits
        assert!(player.bet(60, 1).is_err());
        assert_eq!(player.cash(), 100);
        player.bet(50, 1).unwrap();
        assert_eq!(player.cash(), 50);
        assert_eq!(player.hands()[1].bet(), 150);
    }

    #[test]
    fn test_bet_unknown_hand() {
        let mut player = Participant::player(100);
        assert_eq!(player.bet(10, 3), Err(GameError::NoSuchHand(3)));
    }

    #[test]
    fn test_dealer_restrictions() {
        let mut dealer = Participant::dealer();
        assert_eq!(dealer.bet(10, 0), Err(GameError::DealerRestricted("bet")));
        assert_eq!(dealer.split(0), Err(GameError::DealerRestricted("split")));
        assert_eq!(dealer.double(0), Err(GameError::DealerRestricted("double")));
        assert_eq!(
            dealer.surrender(0),
            Err(GameError::DealerRestricted("surrender"))
        );
        dealer.take(card(Rank::Eight), 0).unwrap();
        dealer.take(Card::new(Suit::Club, Rank::Eight), 0).unwrap();
        assert!(!dealer.can_split(0));
    }

    #[test]
    fn test_take_adjusts_aces() {
        let mut player = Participant::player(1000);
        assert_eq!(player.take(card(Rank::Seven), 0).unwrap(), 7);
        assert_eq!(player.take(ace(), 0).unwrap(), 18);
        assert_eq!(player.take(card(Rank::Seven), 0).unwrap(), 15);
        assert!(!player.hand().is_busted());
        assert_eq!(player.take(ace(), 4), Err(GameError::NoSuchHand(4)));
    }

    #[test]
    fn test_splitting() {
        let mut player = Participant::player(1000);
        player.take(card(Rank::Seven), 0).unwrap();
        player.take(card(Rank::Nine), 0).unwrap();
        assert!(!player.can_split(0));
        assert_eq!(player.split(0), Err(GameError::NotSplittable(0)));

        let mut player = Participant::player(1000);
        player.take(card(Rank::Jack), 0).unwrap();
        player.take(card(Rank::Queen), 0).unwrap();
        player.bet(200, 0).unwrap();
        assert!(player.can_split(0));
        assert_eq!(player.split(0).unwrap(), 1);
        assert_eq!(player.hands().len(), 2);
        assert_eq!(player.cash(), 600);
        assert_eq!(player.hands()[0].bet(), 200);
        assert_eq!(player.hands()[1].bet(), 200);
        assert_eq!(player.hands()[1].cards(), &[card(Rank::Queen)]);
    }

    #[test]
    fn test_split_needs_cash_for_matching_bet() {
        let mut player = Participant::player(150);
        player.take(card(Rank::Six), 0).unwrap();
        player.take(Card::new(Suit::Spade, Rank::Six), 0).unwrap();
        player.bet(100, 0).unwrap();
        assert!(!player.can_split(0));
        assert_eq!(
            player.split(0),
            Err(GameError::InsufficientFunds {
                needed: 100,
                available: 50
            })
        );
        assert_eq!(player.hands().len(), 1);
        assert_eq!(player.hand().len(), 2);
    }

    #[test]
    fn test_double() {
        let mut player = Participant::player(100);
        player.bet(50, 0).unwrap();
        player.double(0).unwrap();
        assert_eq!(player.hand().bet(), 100);
        assert!(player.hand().is_doubled());
        assert_eq!(player.cash(), 0);
    }

    #[test]
    fn test_double_insufficient_funds() {
        let mut player = Participant::player(80);
        player.bet(50, 0).unwrap();
        assert!(player.double(0).is_err());
        assert_eq!(player.hand().bet(), 50);
        assert!(!player.hand().is_doubled());
        assert_eq!(player.cash(), 30);
    }

    #[test]
    fn test_surrender_refunds_half() {
        let mut player = Participant::player(1000);
        player.bet(75, 0).unwrap();
        assert_eq!(player.surrender(0).unwrap(), 37);
        assert_eq!(player.cash(), 962);
        assert_eq!(player.hand().status(), HandStatus::Surrendered);
        assert!(player.finished());
    }

    #[test]
    fn test_finished_with_split_hands() {
        let mut player = Participant::player(1000);
        player.take(card(Rank::Eight), 0).unwrap();
        player.take(Card::new(Suit::Club, Rank::Eight), 0).unwrap();
        player.split(0).unwrap();
        assert!(!player.finished());
        player.stand(0).unwrap();
        assert!(!player.finished(), "second hand still active");
        player.take(card(Rank::King), 1).unwrap();
        player.take(card(Rank::Five), 1).unwrap();
        assert_eq!(player.hands()[1].status(), HandStatus::Bust);
        assert!(player.finished());
    }

    #[test]
    fn test_reset_keeps_cash() {
        let mut player = Participant::player(1000);
        player.take(card(Rank::Eight), 0).unwrap();
        player.bet(100, 0).unwrap();
        player.return_winnings(250);
        player.reset();
        assert_eq!(player.cash(), 1150);
        assert_eq!(player.hands().len(), 1);
        assert!(player.hand().is_empty());
        assert_eq!(player.hand().bet(), 0);
    }

    #[test]
    fn test_return_winnings_saturates() {
        let mut player = Participant::player(u64::MAX - 5);
        player.return_winnings(100);
        assert_eq!(player.cash(), u64::MAX);
    }

    #[test]
    fn test_dealer_will_hit() {
        let mut dealer = Participant::dealer();
        dealer.take(Card::new(Suit::Spade, Rank::King), 0).unwrap();
        assert!(dealer.will_hit(), "hits on 10");
        dealer.take(Card::new(Suit::Spade, Rank::Four), 0).unwrap();
        assert!(dealer.will_hit(), "hits on 14");
        dealer.take(Card::new(Suit::Spade, Rank::Three), 0).unwrap();
        assert!(!dealer.will_hit(), "stands on 17");
    }

    #[test]
    fn test_dealer_stands_on_soft_17() {
        let mut dealer = Participant::dealer();
        dealer.take(ace(), 0).unwrap();
        dealer.take(card(Rank::Six), 0).unwrap();
        assert_eq!(dealer.count(), 17);
        assert!(!dealer.will_hit());
    }
}
