use crate::{Hand, HandStatus, PayoutRatio};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Blackjack,
    Win,
    Push,
    Loss,
    Bust,
    Surrender,
}

/// Result of settling one player hand against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub seat: usize,
    pub hand_index: usize,
    pub bet: u64,
    pub outcome: HandOutcome,
    /// Amount credited back to the player, stake included.
    pub payout: u64,
}

/// Decides a hand against the dealer's final hand.
///
/// Surrendered hands were refunded when they surrendered and bust hands
/// lose their stake, both whatever the dealer holds. A natural pays the
/// stake plus `blackjack_payout`. Otherwise a dealer bust or a higher
/// count pays even money, a tie returns the stake and anything else loses.
/// Payouts saturate at `u64::MAX` rather than overflow.
pub fn settle_hand(
    hand: &Hand,
    dealer: &Hand,
    blackjack_payout: PayoutRatio,
) -> (HandOutcome, u64) {
    let bet = hand.bet();
    match hand.status() {
        HandStatus::Surrendered => return (HandOutcome::Surrender, 0),
        HandStatus::Bust => return (HandOutcome::Bust, 0),
        HandStatus::Active | HandStatus::Standing => {}
    }

    if hand.is_blackjack() {
        let winnings = blackjack_payout.calculate_payout(bet);
        (HandOutcome::Blackjack, bet.saturating_add(winnings))
    } else if dealer.is_busted() || hand.count() > dealer.count() {
        (HandOutcome::Win, bet.saturating_mul(2))
    } else if hand.count() == dealer.count() {
        (HandOutcome::Push, bet)
    } else {
        (HandOutcome::Loss, 0)
    }
}
