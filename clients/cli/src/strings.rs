pub const TITLE: &str = r"
 ____  _            _       _            _
| __ )| | __ _  ___| | __  (_) __ _  ___| | __
|  _ \| |/ _` |/ __| |/ /  | |/ _` |/ __| |/ /
| |_) | | (_| | (__|   <   | | (_| | (__|   <
|____/|_|\__,_|\___|_|\_\ _/ |\__,_|\___|_|\_\
                         |__/
";

pub const HELP: &str = "
A command line blackjack game
---
Instructions:
  Every player is dealt two cards, then places a bet on that hand.
  Players take turns until every hand is standing or bust.
  On your turn: hit (h), stand (s), double (d) or surrender (e).
  A pair may be split into two hands if you can cover a second bet.
  Double matches your bet and draws exactly one card.
  Surrender gives up the hand and refunds half the bet.
  The dealer draws to 17, then hands are paid.
  Blackjack pays 3:2, a win pays 1:1 and a tie returns your bet.
";

pub const PLAYER_COUNT_PROMPT: &str = "How many players?";

pub const ACTION_PROMPT: &str =
    "What is your action? hit (h), stand (s), double (d), surrender (e)";

pub const BUST: &str = "BUST!";
