mod strings;

use blackjack::{
    Action, Hand, HandOutcome, PlayerInput, Question, Seat, Table, TableEvent, TableRules,
    MAX_SEATS,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Duration;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "blackjack", about = "Command line blackjack against the dealer")]
struct Cli {
    /// Number of players at the table (prompted for when absent)
    #[arg(long, env = "BLACKJACK_PLAYERS")]
    players: Option<usize>,

    /// Decks in the shoe
    #[arg(long, env = "BLACKJACK_DECKS", default_value = "1")]
    decks: usize,

    /// Cash each player starts with
    #[arg(long, env = "BLACKJACK_STARTING_CASH", default_value = "1000")]
    starting_cash: u64,

    /// Seed for reproducible shuffles
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Pause between dealer draws, in milliseconds
    #[arg(long, env = "BLACKJACK_DEALER_DELAY_MS", default_value = "500")]
    dealer_delay_ms: u64,

    /// Print each round summary as a JSON line
    #[arg(long, env = "BLACKJACK_JSON", default_value_t = false)]
    json: bool,
}

/// Line-based prompts over any reader and writer.
///
/// On end of input every prompt falls back to the most passive answer
/// (bet nothing, answer no, stand) so the round can finish.
struct Terminal<R, W> {
    input: R,
    output: W,
    dealer_delay: Duration,
    // set once bets are in; later dealer cards are the dealer's own draws
    bets_in: bool,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    fn new(input: R, output: W, dealer_delay: Duration) -> Self {
        Self {
            input,
            output,
            dealer_delay,
            bets_in: false,
        }
    }

    fn say(&mut self, text: impl AsRef<str>) {
        if let Err(e) = writeln!(self.output, "{}", text.as_ref()) {
            log::warn!("failed to write to terminal: {e}");
        }
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{prompt} ").and_then(|_| self.output.flush()) {
            log::warn!("failed to write prompt: {e}");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::warn!("failed to read input: {e}");
                None
            }
        }
    }

    fn prompt_for_num(&mut self, prompt: &str) -> Option<u64> {
        loop {
            let line = self.ask(prompt)?;
            match line.parse::<u64>() {
                Ok(n) => return Some(n),
                Err(_) => self.say("Please enter a valid number"),
            }
        }
    }

    fn prompt_for_yn(&mut self, prompt: &str) -> Option<bool> {
        loop {
            let line = self.ask(&format!("{prompt} [y/n]"))?;
            match parse_yes_no(&line) {
                Some(answer) => return Some(answer),
                None => self.say("invalid response, please try again"),
            }
        }
    }

    fn prompt_for_action(&mut self) -> Option<Action> {
        loop {
            let line = self.ask(strings::ACTION_PROMPT)?;
            match parse_action(&line) {
                Some(action) => return Some(action),
                None => self.say("invalid response, please try again"),
            }
        }
    }

    fn prompt_for_players(&mut self) -> Option<usize> {
        loop {
            let n = self.prompt_for_num(strings::PLAYER_COUNT_PROMPT)? as usize;
            if (1..=MAX_SEATS).contains(&n) {
                return Some(n);
            }
            self.say(format!("Please choose between 1 and {MAX_SEATS} players"));
        }
    }
}

fn parse_yes_no(line: &str) -> Option<bool> {
    match line.chars().next()?.to_ascii_lowercase() {
        'y' => Some(true),
        'n' => Some(false),
        _ => None,
    }
}

fn parse_action(line: &str) -> Option<Action> {
    match line.chars().next()?.to_ascii_lowercase() {
        'h' => Some(Action::Hit),
        's' => Some(Action::Stand),
        'd' => Some(Action::Double),
        'e' => Some(Action::Surrender),
        _ => None,
    }
}

impl<R: BufRead, W: Write> PlayerInput for Terminal<R, W> {
    fn request_initial_bet(&mut self, seat: usize, hand: &Hand, cash: u64) -> u64 {
        let prompt = format!(
            "Player {seat}: {hand}, your count is {} and you have {cash}. What is your initial bet?",
            hand.count()
        );
        loop {
            match self.prompt_for_num(&prompt) {
                Some(0) => self.say("Please enter a bet above 0"),
                Some(bet) => return bet,
                None => return 0,
            }
        }
    }

    fn request_yes_no(&mut self, question: Question) -> bool {
        let prompt = match question {
            Question::Split { seat, hand_index } => {
                format!("Player {seat}, hand {hand_index} is a pair. Would you like to split?")
            }
            Question::PlayAgain => "Would you like to play another hand?".to_string(),
        };
        self.prompt_for_yn(&prompt).unwrap_or(false)
    }

    fn request_action(
        &mut self,
        seat: usize,
        hand_index: usize,
        hand: &Hand,
        legal: &[Action],
    ) -> Action {
        self.say(format!(
            "Player {seat} hand {hand_index}: {hand} your count is {}",
            hand.count()
        ));
        loop {
            let Some(action) = self.prompt_for_action() else {
                return Action::Stand;
            };
            if legal.contains(&action) {
                return action;
            }
            self.say(format!("{action} is not available for this hand"));
        }
    }

    fn on_event(&mut self, event: &TableEvent) {
        match event {
            TableEvent::RoundStarted { round } => {
                self.bets_in = false;
                self.say(format!("\nPLAYING HAND {round}\n"));
            }
            TableEvent::CardDealt {
                seat: Seat::Dealer,
                count,
                card,
                ..
            } => {
                if self.bets_in {
                    std::thread::sleep(self.dealer_delay);
                }
                self.say(format!("Dealer drew {card}, count {count}"));
            }
            TableEvent::CardDealt {
                seat: Seat::Player(seat),
                hand_index,
                card,
                count,
            } => {
                log::debug!("player {seat} hand {hand_index} drew {card}");
                self.say(format!("Player {seat} drew {card}, count is {count}"));
            }
            TableEvent::BetPlaced { .. } => self.bets_in = true,
            TableEvent::BetRefused { seat, .. } => {
                self.bets_in = true;
                self.say(format!("Player {seat} does not have enough funds, betting 0"));
            }
            TableEvent::Split {
                seat,
                new_hand_index,
                ..
            } => {
                self.say(format!("Player {seat} split into hand {new_hand_index}"));
            }
            TableEvent::Doubled { bet, .. } => {
                self.say(format!("doubled, new bet is {bet}"));
            }
            TableEvent::DoubleRefused { .. } => {
                self.say("not enough funds, hit instead");
            }
            TableEvent::Stood { count, .. } => {
                self.say(format!("standing with count {count}"));
            }
            TableEvent::Surrendered { refund, .. } => {
                self.say(format!("surrendered, {refund} returned"));
            }
            TableEvent::Bust { .. } => self.say(strings::BUST),
            TableEvent::ShoeExhausted => self.say("The shoe is empty"),
            TableEvent::DealerFinished { count, bust } => {
                let state = if *bust { "bust" } else { "standing" };
                self.say(format!("Dealer {state} with count {count}"));
            }
            TableEvent::Settled(s) => {
                let line = match s.outcome {
                    HandOutcome::Blackjack => format!(
                        "Player {} hand {} got blackjack and won {}",
                        s.seat,
                        s.hand_index,
                        s.payout - s.bet
                    ),
                    HandOutcome::Win => format!(
                        "Player {} hand {} won {}",
                        s.seat,
                        s.hand_index,
                        s.payout - s.bet
                    ),
                    HandOutcome::Push => format!("Player {} hand {} tied", s.seat, s.hand_index),
                    HandOutcome::Loss => format!("Player {} hand {} lost", s.seat, s.hand_index),
                    HandOutcome::Bust => {
                        format!("Player {} hand {} was bust", s.seat, s.hand_index)
                    }
                    HandOutcome::Surrender => {
                        format!("Player {} hand {} surrendered", s.seat, s.hand_index)
                    }
                };
                self.say(line);
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), BoxErr> {
    let stdin = io::stdin();
    let mut term = Terminal::new(
        stdin.lock(),
        io::stdout(),
        Duration::from_millis(cli.dealer_delay_ms),
    );

    term.say(strings::TITLE);
    term.say(strings::HELP);

    let num_players = match cli.players {
        Some(n) => n,
        None => term.prompt_for_players().ok_or("no player count given")?,
    };

    let rules = TableRules {
        num_decks: cli.decks,
        starting_cash: cli.starting_cash,
        ..TableRules::default()
    };
    let mut table = match cli.seed {
        Some(seed) => Table::seeded(num_players, rules, seed)?,
        None => Table::new(num_players, rules)?,
    };
    log::info!("table ready: {num_players} players, {} decks", rules.num_decks);

    loop {
        let summary = table.play_round(&mut term)?;
        if cli.json {
            term.say(serde_json::to_string(&summary)?);
        }
        term.say(format!("\nGAME STATUS => {table}"));
        if !term.request_yes_no(Question::PlayAgain) {
            break;
        }
    }

    term.say("Thanks for playing!");
    Ok(())
}

fn main() -> Result<(), BoxErr> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("blackjack failed: {e}");
        return Err(e);
    }
    Ok(())
}
