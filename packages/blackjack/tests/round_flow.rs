use blackjack::{
    Action, Card, Hand, HandOutcome, PlayerInput, Question, Rank, RoundPhase, RoundSummary, Suit,
    Table, TableEvent, TableRules,
};

/// Cycles through every action and accepts every split, so long seeded
/// sessions reach all the table's code paths.
struct Cycling {
    next: usize,
    bet: u64,
    rounds_left: u32,
    bust_events: usize,
    summaries: Vec<RoundSummary>,
}

impl Cycling {
    fn new(bet: u64, rounds: u32) -> Self {
        Self {
            next: 0,
            bet,
            rounds_left: rounds,
            bust_events: 0,
            summaries: Vec::new(),
        }
    }
}

impl PlayerInput for Cycling {
    fn request_initial_bet(&mut self, _seat: usize, hand: &Hand, cash: u64) -> u64 {
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.bet(), 0);
        self.bet.min(cash.max(1))
    }

    fn request_yes_no(&mut self, question: Question) -> bool {
        match question {
            Question::Split { .. } => true,
            Question::PlayAgain => {
                self.rounds_left -= 1;
                self.rounds_left > 0
            }
        }
    }

    fn request_action(
        &mut self,
        _seat: usize,
        _hand_index: usize,
        hand: &Hand,
        legal: &[Action],
    ) -> Action {
        assert!(!hand.is_busted());
        assert_eq!(legal, &Action::ALL[..]);
        let action = legal[self.next % legal.len()];
        self.next += 1;
        action
    }

    fn on_event(&mut self, event: &TableEvent) {
        if let TableEvent::Bust { count, .. } = event {
            assert!(*count > 21);
            self.bust_events += 1;
        }
    }
}

#[test]
fn long_seeded_session_keeps_invariants() {
    let rules = TableRules::six_deck();
    let mut table = Table::seeded(4, rules, 2024).unwrap();
    let mut io = Cycling::new(25, 200);

    let mut played = 0;
    loop {
        let cash_before: Vec<u64> = table.players().iter().map(|p| p.cash()).collect();
        let summary = table.play_round(&mut io).unwrap();
        played += 1;

        for s in &summary.settlements {
            let expected = match s.outcome {
                HandOutcome::Blackjack => s.bet + s.bet * 3 / 2,
                HandOutcome::Win => s.bet * 2,
                HandOutcome::Push => s.bet,
                HandOutcome::Loss | HandOutcome::Bust | HandOutcome::Surrender => 0,
            };
            assert_eq!(s.payout, expected, "{:?}", s);
            if summary.dealer_bust {
                assert_ne!(s.outcome, HandOutcome::Loss);
                assert_ne!(s.outcome, HandOutcome::Push);
            }
        }

        // every seat either broke even or moved by the net of its bets and payouts
        for (seat, before) in cash_before.iter().enumerate() {
            let after = table.player(seat).unwrap().cash();
            let paid: u64 = summary
                .settlements
                .iter()
                .filter(|s| s.seat == seat)
                .map(|s| s.payout)
                .sum();
            let staked: u64 = summary
                .settlements
                .iter()
                .filter(|s| s.seat == seat && s.outcome != HandOutcome::Surrender)
                .map(|s| s.bet)
                .sum();
            let refunds: u64 = summary
                .settlements
                .iter()
                .filter(|s| s.seat == seat && s.outcome == HandOutcome::Surrender)
                .map(|s| s.bet - s.bet / 2)
                .sum();
            assert_eq!(after + staked + refunds, before + paid, "seat {}", seat);
        }

        assert_eq!(table.phase(), RoundPhase::Building);
        assert!(table.players().iter().all(|p| p.hands().len() == 1));
        io.summaries.push(summary);

        if !io.request_yes_no(Question::PlayAgain) {
            break;
        }
    }

    assert_eq!(played, 200);
    assert_eq!(table.round(), 200);
    assert!(io.bust_events > 0);
    assert!(io
        .summaries
        .iter()
        .flat_map(|s| &s.settlements)
        .any(|s| s.outcome == HandOutcome::Surrender));
}

#[test]
fn play_counts_rounds() {
    let mut table = Table::seeded(2, TableRules::default(), 9).unwrap();
    let mut io = Cycling::new(10, 5);
    assert_eq!(table.play(&mut io).unwrap(), 5);
    assert_eq!(table.round(), 5);
}

#[test]
fn scripted_round_through_public_steps() {
    let mut io = Cycling::new(100, 1);
    let mut table = Table::seeded(1, TableRules::default(), 1).unwrap();
    table.build(&mut io).unwrap();
    table.shoe_mut().stack(vec![
        Card::new(Suit::Heart, Rank::Ace(blackjack::AceValue::High)),
        Card::new(Suit::Heart, Rank::Nine),
        Card::new(Suit::Club, Rank::Ten),
        Card::new(Suit::Club, Rank::Seven),
        Card::new(Suit::Diamond, Rank::King),
    ]);
    table.deal(&mut io).unwrap();
    table.collect_bets(&mut io).unwrap();

    // first action offered is a hit: A+9+K adjusts the ace and stays on 20
    assert!(!table.play_sweep(&mut io).unwrap());
    let hand = table.player(0).unwrap().hand();
    assert_eq!(hand.count(), 20);
    assert!(!hand.is_busted());

    // then stand
    assert!(table.play_sweep(&mut io).unwrap());
    table.run_dealer(&mut io).unwrap();
    let summary = table.settle(&mut io).unwrap();
    assert_eq!(summary.settlements[0].outcome, HandOutcome::Win);
    assert_eq!(summary.settlements[0].payout, 200);
    assert_eq!(table.player(0).unwrap().cash(), 1100);
}

#[test]
fn summary_serializes() {
    let mut table = Table::seeded(1, TableRules::default(), 3).unwrap();
    let mut io = Cycling::new(10, 1);
    let summary = table.play_round(&mut io).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    let back: RoundSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}
