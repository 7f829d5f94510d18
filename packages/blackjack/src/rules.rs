use serde::{Deserialize, Serialize};

/// The dealer draws below this count and stands on it or above.
pub const DEALER_STANDS_ON: u32 = 17;

/// Largest number of players one table seats.
pub const MAX_SEATS: usize = 10;

/// Largest number of 52-card decks one shoe holds.
pub const MAX_DECKS: usize = 8;

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, &'static str> {
        if denominator == 0 {
            return Err("Denominator cannot be zero");
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Winnings on top of the returned stake, rounded down. Saturates at
    /// `u64::MAX`.
    pub fn calculate_payout(&self, bet: u64) -> u64 {
        let payout = (bet as u128 * self.numerator as u128) / self.denominator as u128;
        u64::try_from(payout).unwrap_or(u64::MAX)
    }
}

/// Table configuration fixed for the lifetime of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Number of 52-card decks in the shoe
    pub num_decks: usize,

    /// Cash each player sits down with
    pub starting_cash: u64,

    /// Blackjack payout multiplier (commonly 3:2 or 6:5)
    pub blackjack_payout: PayoutRatio,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            num_decks: 1,
            starting_cash: 1000,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
        }
    }
}

impl TableRules {
    /// Six-deck shoe, otherwise default rules
    pub fn six_deck() -> Self {
        Self {
            num_decks: 6,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_ratio_three_to_two() {
        let ratio = PayoutRatio::THREE_TO_TWO;
        assert_eq!(ratio.calculate_payout(100), 150);
        assert_eq!(ratio.calculate_payout(10), 15);
        assert_eq!(ratio.calculate_payout(50), 75);
    }

    #[test]
    fn test_payout_ratio_rounds_down() {
        let ratio = PayoutRatio::THREE_TO_TWO;
        assert_eq!(ratio.calculate_payout(25), 37);
        assert_eq!(ratio.calculate_payout(1), 1);
    }

    #[test]
    fn test_payout_ratio_six_to_five() {
        let ratio = PayoutRatio::SIX_TO_FIVE;
        assert_eq!(ratio.calculate_payout(100), 120);
        assert_eq!(ratio.calculate_payout(10), 12);
    }

    #[test]
    fn test_payout_ratio_large_bets() {
        let ratio = PayoutRatio::THREE_TO_TWO;
        assert_eq!(ratio.calculate_payout(u64::MAX / 3), u64::MAX / 3 * 3 / 2);
        assert_eq!(ratio.calculate_payout(u64::MAX), u64::MAX);
        assert_eq!(PayoutRatio::ONE_TO_ONE.calculate_payout(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_payout_ratio_zero_denominator() {
        assert!(PayoutRatio::new(3, 0).is_err());
        assert_eq!(PayoutRatio::new(1, 1).unwrap(), PayoutRatio::ONE_TO_ONE);
    }

    #[test]
    fn test_default_rules() {
        let rules = TableRules::default();
        assert_eq!(rules.num_decks, 1);
        assert_eq!(rules.starting_cash, 1000);
        assert_eq!(rules.blackjack_payout, PayoutRatio::THREE_TO_TWO);
        assert_eq!(TableRules::six_deck().num_decks, 6);
    }
}
