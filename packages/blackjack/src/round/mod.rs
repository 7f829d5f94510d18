use crate::{
    settle_hand, Card, GameError, Hand, Participant, Result, Settlement, Shoe, TableRules,
    MAX_SEATS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps of one round, in order. `Reset` loops back to `Building`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Building,
    Dealing,
    Betting,
    PlayerTurns,
    DealerTurn,
    Settlement,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Hit, Action::Stand, Action::Double, Action::Surrender];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Double => "double",
            Action::Surrender => "surrender",
        };
        f.write_str(s)
    }
}

/// Actions on offer for a hand. Every action is open to an active hand
/// (a double without funds falls back to a hit); a finished hand has none.
pub fn legal_actions(hand: &Hand) -> Vec<Action> {
    if hand.is_finished() {
        Vec::new()
    } else {
        Action::ALL.to_vec()
    }
}

/// Yes/no decisions the table asks of its collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Question {
    Split { seat: usize, hand_index: usize },
    PlayAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    Player(usize),
    Dealer,
}

/// Narration of what happened at the table, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    RoundStarted { round: u32 },
    CardDealt { seat: Seat, hand_index: usize, card: Card, count: u32 },
    BetPlaced { seat: usize, amount: u64 },
    BetRefused { seat: usize, amount: u64, available: u64 },
    Split { seat: usize, hand_index: usize, new_hand_index: usize },
    Doubled { seat: usize, hand_index: usize, bet: u64 },
    DoubleRefused { seat: usize, hand_index: usize },
    Stood { seat: usize, hand_index: usize, count: u32 },
    Surrendered { seat: usize, hand_index: usize, refund: u64 },
    Bust { seat: usize, hand_index: usize, count: u32 },
    ShoeExhausted,
    DealerFinished { count: u32, bust: bool },
    Settled(Settlement),
}

/// The I/O side of the table. Every prompt is a synchronous call that
/// returns an already validated answer.
pub trait PlayerInput {
    fn request_initial_bet(&mut self, seat: usize, hand: &Hand, cash: u64) -> u64;

    fn request_yes_no(&mut self, question: Question) -> bool;

    fn request_action(
        &mut self,
        seat: usize,
        hand_index: usize,
        hand: &Hand,
        legal: &[Action],
    ) -> Action;

    fn on_event(&mut self, _event: &TableEvent) {}
}

/// Outcome of one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub dealer_count: u32,
    pub dealer_bust: bool,
    pub settlements: Vec<Settlement>,
}

/// A blackjack table: the shoe, the seated players and the dealer, driven
/// one phase at a time. At most one round is in progress per table.
#[derive(Debug, Clone)]
pub struct Table {
    rules: TableRules,
    shoe: Shoe,
    players: Vec<Participant>,
    dealer: Participant,
    phase: RoundPhase,
    round: u32,
}

impl Table {
    pub fn new(num_players: usize, rules: TableRules) -> Result<Self> {
        let shoe = Shoe::new(rules.num_decks)?;
        Self::with_shoe(num_players, rules, shoe)
    }

    /// A table whose shuffles are reproducible from `seed`.
    pub fn seeded(num_players: usize, rules: TableRules, seed: u64) -> Result<Self> {
        let shoe = Shoe::seeded(rules.num_decks, seed)?;
        Self::with_shoe(num_players, rules, shoe)
    }

    fn with_shoe(num_players: usize, rules: TableRules, shoe: Shoe) -> Result<Self> {
        if num_players == 0 || num_players > MAX_SEATS {
            return Err(GameError::InvalidSeatCount {
                got: num_players,
                max: MAX_SEATS,
            });
        }
        Ok(Self {
            rules,
            shoe,
            players: vec![Participant::player(rules.starting_cash); num_players],
            dealer: Participant::dealer(),
            phase: RoundPhase::Building,
            round: 0,
        })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Number of the current (or last) round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn players(&self) -> &[Participant] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Result<&Participant> {
        self.players.get(seat).ok_or(GameError::NoSuchSeat(seat))
    }

    pub fn dealer(&self) -> &Participant {
        &self.dealer
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn shoe_mut(&mut self) -> &mut Shoe {
        &mut self.shoe
    }

    pub fn all_players_finished(&self) -> bool {
        self.players.iter().all(Participant::finished)
    }

    fn expect_phase(&self, expected: RoundPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::OutOfPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn participant_mut(&mut self, seat: Seat) -> Result<&mut Participant> {
        match seat {
            Seat::Dealer => Ok(&mut self.dealer),
            Seat::Player(idx) => self.players.get_mut(idx).ok_or(GameError::NoSuchSeat(idx)),
        }
    }

    /// Draws one card onto a hand. `None` when the shoe has run out.
    fn deal_card<I: PlayerInput + ?Sized>(
        &mut self,
        seat: Seat,
        hand_index: usize,
        io: &mut I,
    ) -> Result<Option<Card>> {
        let Some(card) = self.shoe.draw() else {
            log::warn!("shoe exhausted while dealing to {:?}", seat);
            io.on_event(&TableEvent::ShoeExhausted);
            return Ok(None);
        };
        let count = self.participant_mut(seat)?.take(card, hand_index)?;
        log::debug!("{:?} hand {} drew {}, count {}", seat, hand_index, card, count);
        io.on_event(&TableEvent::CardDealt {
            seat,
            hand_index,
            card,
            count,
        });
        Ok(Some(card))
    }

    /// Rebuilds and shuffles the shoe for a new round.
    pub fn build<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<()> {
        self.expect_phase(RoundPhase::Building)?;
        self.shoe.build(self.rules.num_decks)?;
        self.round += 1;
        log::info!("round {} started with {} players", self.round, self.players.len());
        io.on_event(&TableEvent::RoundStarted { round: self.round });
        self.phase = RoundPhase::Dealing;
        Ok(())
    }

    /// Two cards to each player in seat order, then two to the dealer.
    pub fn deal<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<()> {
        self.expect_phase(RoundPhase::Dealing)?;
        for seat in 0..self.players.len() {
            self.deal_card(Seat::Player(seat), 0, io)?;
            self.deal_card(Seat::Player(seat), 0, io)?;
        }
        self.deal_card(Seat::Dealer, 0, io)?;
        self.deal_card(Seat::Dealer, 0, io)?;
        self.phase = RoundPhase::Betting;
        Ok(())
    }

    /// Asks each player once for a wager on their first hand. A wager the
    /// player cannot cover leaves the hand with a zero bet.
    pub fn collect_bets<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<()> {
        self.expect_phase(RoundPhase::Betting)?;
        for seat in 0..self.players.len() {
            let player = &self.players[seat];
            let amount = io.request_initial_bet(seat, player.hand(), player.cash());
            match self.players[seat].bet(amount, 0) {
                Ok(()) => io.on_event(&TableEvent::BetPlaced { seat, amount }),
                Err(GameError::InsufficientFunds { available, .. }) => {
                    log::warn!("player {} cannot cover {}, betting 0", seat, amount);
                    io.on_event(&TableEvent::BetRefused {
                        seat,
                        amount,
                        available,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        self.phase = RoundPhase::PlayerTurns;
        Ok(())
    }

    /// Sweeps until every hand of every player is bust, standing or surrendered.
    pub fn play_player_turns<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<()> {
        self.expect_phase(RoundPhase::PlayerTurns)?;
        while !self.play_sweep(io)? {}
        Ok(())
    }

    /// One pass over the unfinished players, one action per unfinished hand.
    /// Hands created by a split during the pass are visited in the same pass.
    /// Returns whether all players are finished; if so the dealer is up next.
    pub fn play_sweep<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<bool> {
        self.expect_phase(RoundPhase::PlayerTurns)?;
        for seat in 0..self.players.len() {
            if self.players[seat].finished() {
                continue;
            }
            let mut hand_index = 0;
            while hand_index < self.players[seat].hands().len() {
                self.play_hand_turn(seat, hand_index, io)?;
                hand_index += 1;
            }
        }

        let finished = self.all_players_finished();
        if finished {
            self.phase = RoundPhase::DealerTurn;
        }
        Ok(finished)
    }

    fn play_hand_turn<I: PlayerInput + ?Sized>(
        &mut self,
        seat: usize,
        hand_index: usize,
        io: &mut I,
    ) -> Result<()> {
        if self.players[seat].hand_at(hand_index)?.is_finished() {
            return Ok(());
        }

        if self.players[seat].can_split(hand_index)
            && io.request_yes_no(Question::Split { seat, hand_index })
        {
            self.split_hand(seat, hand_index, io)?;
        }

        let hand = self.players[seat].hand_at(hand_index)?;
        if hand.is_finished() {
            return Ok(());
        }
        let legal = legal_actions(hand);
        let action = io.request_action(seat, hand_index, hand, &legal);
        log::debug!("player {} hand {} chose {}", seat, hand_index, action);

        match action {
            Action::Hit => self.hit(seat, hand_index, io)?,
            Action::Stand => self.stand(seat, hand_index, io)?,
            Action::Double => self.double(seat, hand_index, io)?,
            Action::Surrender => {
                let refund = self.players[seat].surrender(hand_index)?;
                log::debug!("player {} hand {} surrendered for {}", seat, hand_index, refund);
                io.on_event(&TableEvent::Surrendered {
                    seat,
                    hand_index,
                    refund,
                });
            }
        }

        let hand = self.players[seat].hand_at(hand_index)?;
        if hand.is_busted() {
            log::debug!("player {} hand {} bust with {}", seat, hand_index, hand.count());
            io.on_event(&TableEvent::Bust {
                seat,
                hand_index,
                count: hand.count(),
            });
        }
        Ok(())
    }

    fn split_hand<I: PlayerInput + ?Sized>(
        &mut self,
        seat: usize,
        hand_index: usize,
        io: &mut I,
    ) -> Result<()> {
        let new_hand_index = self.players[seat].split(hand_index)?;
        io.on_event(&TableEvent::Split {
            seat,
            hand_index,
            new_hand_index,
        });
        for idx in [hand_index, new_hand_index] {
            if self.deal_card(Seat::Player(seat), idx, io)?.is_none() {
                self.players[seat].stand(idx)?;
            }
        }
        Ok(())
    }

    fn hit<I: PlayerInput + ?Sized>(
        &mut self,
        seat: usize,
        hand_index: usize,
        io: &mut I,
    ) -> Result<()> {
        if self.deal_card(Seat::Player(seat), hand_index, io)?.is_none() {
            self.stand(seat, hand_index, io)?;
        }
        Ok(())
    }

    fn stand<I: PlayerInput + ?Sized>(
        &mut self,
        seat: usize,
        hand_index: usize,
        io: &mut I,
    ) -> Result<()> {
        let player = &mut self.players[seat];
        player.stand(hand_index)?;
        let count = player.hand_at(hand_index)?.count();
        io.on_event(&TableEvent::Stood {
            seat,
            hand_index,
            count,
        });
        Ok(())
    }

    /// Matches the bet, takes exactly one card and ends the hand's turn.
    /// Without the cash to match, it is an ordinary hit.
    fn double<I: PlayerInput + ?Sized>(
        &mut self,
        seat: usize,
        hand_index: usize,
        io: &mut I,
    ) -> Result<()> {
        match self.players[seat].double(hand_index) {
            Ok(()) => {
                let bet = self.players[seat].hand_at(hand_index)?.bet();
                io.on_event(&TableEvent::Doubled {
                    seat,
                    hand_index,
                    bet,
                });
                self.deal_card(Seat::Player(seat), hand_index, io)?;
                if !self.players[seat].hand_at(hand_index)?.is_busted() {
                    self.stand(seat, hand_index, io)?;
                }
                Ok(())
            }
            Err(GameError::InsufficientFunds { .. }) => {
                log::warn!("player {} cannot double hand {}, hitting", seat, hand_index);
                io.on_event(&TableEvent::DoubleRefused { seat, hand_index });
                self.hit(seat, hand_index, io)
            }
            Err(e) => Err(e),
        }
    }

    /// Dealer draws until reaching 17 or more, or busting.
    pub fn run_dealer<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<()> {
        self.expect_phase(RoundPhase::DealerTurn)?;
        while self.dealer.will_hit() {
            if self.deal_card(Seat::Dealer, 0, io)?.is_none() {
                break;
            }
        }

        let count = self.dealer.count();
        let bust = self.dealer.hand().is_busted();
        if !bust {
            self.dealer.stand(0)?;
        }
        log::info!(
            "dealer {} with {}",
            if bust { "bust" } else { "standing" },
            count
        );
        io.on_event(&TableEvent::DealerFinished { count, bust });
        self.phase = RoundPhase::Settlement;
        Ok(())
    }

    /// Pays out every player hand against the dealer's final hand.
    pub fn settle<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<RoundSummary> {
        self.expect_phase(RoundPhase::Settlement)?;
        let dealer_hand = self.dealer.hand().clone();
        let mut settlements = Vec::new();

        for (seat, player) in self.players.iter_mut().enumerate() {
            let mut winnings: u64 = 0;
            for (hand_index, hand) in player.hands().iter().enumerate() {
                let (outcome, payout) =
                    settle_hand(hand, &dealer_hand, self.rules.blackjack_payout);
                let settlement = Settlement {
                    seat,
                    hand_index,
                    bet: hand.bet(),
                    outcome,
                    payout,
                };
                log::info!(
                    "player {} hand {}: {:?}, paid {}",
                    seat,
                    hand_index,
                    outcome,
                    payout
                );
                io.on_event(&TableEvent::Settled(settlement));
                settlements.push(settlement);
                winnings = winnings.saturating_add(payout);
            }
            player.return_winnings(winnings);
        }

        self.phase = RoundPhase::Reset;
        Ok(RoundSummary {
            round: self.round,
            dealer_count: dealer_hand.count(),
            dealer_bust: dealer_hand.is_busted(),
            settlements,
        })
    }

    /// Clears every hand; cash carries into the next round.
    pub fn reset(&mut self) -> Result<()> {
        self.expect_phase(RoundPhase::Reset)?;
        for player in &mut self.players {
            player.reset();
        }
        self.dealer.reset();
        self.phase = RoundPhase::Building;
        Ok(())
    }

    /// Runs a whole round from building the shoe to resetting the hands.
    pub fn play_round<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<RoundSummary> {
        self.build(io)?;
        self.deal(io)?;
        self.collect_bets(io)?;
        self.play_player_turns(io)?;
        self.run_dealer(io)?;
        let summary = self.settle(io)?;
        self.reset()?;
        Ok(summary)
    }

    /// Plays rounds until the collaborator declines another. Returns the
    /// number of rounds played.
    pub fn play<I: PlayerInput + ?Sized>(&mut self, io: &mut I) -> Result<u32> {
        let mut played = 0;
        loop {
            self.play_round(io)?;
            played += 1;
            if !io.request_yes_no(Question::PlayAgain) {
                return Ok(played);
            }
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seats: Vec<String> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| format!("Player {}: {}", i, p))
            .collect();
        write!(f, "{} | Dealer: {}", seats.join(" | "), self.dealer)
    }
}
