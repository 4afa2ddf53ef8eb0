//! Day 22: Crab Combat
//!
//! Part 2 plays nested games on an explicit stack of frames, so sub-game
//! depth is bounded by memory rather than by the call stack.

use std::collections::VecDeque;

use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rustc_hash::FxHashSet;
use thiserror::Error;

pub type Card = u32;
type Deck = VecDeque<Card>;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 22, tags = ["simulation", "core"])]
pub struct Solver;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hands {
    pub player1: Vec<Card>,
    pub player2: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Player {
    fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Result of a finished top-level game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Player,
    /// Winner's deck, top card first
    pub deck: Vec<Card>,
    /// Rounds played across every game, sub-games included
    pub rounds: usize,
}

impl Outcome {
    /// Bottom card times 1, next times 2, and so on up to the top card.
    pub fn score(&self) -> u64 {
        let len = self.deck.len() as u64;
        self.deck
            .iter()
            .enumerate()
            .map(|(i, &card)| u64::from(card) * (len - i as u64))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("no cards were dealt")]
    NoCards,
    #[error("plain combat repeated a position after {0} rounds")]
    Repeated(usize),
}

/// Plain Combat: higher card takes both, winner's card on top.
pub fn play_combat(hands: &Hands) -> Result<Outcome, CombatError> {
    let mut decks = deal(hands)?;
    let mut seen = FxHashSet::default();
    let mut rounds = 0;

    loop {
        let (Some(&c1), Some(&c2)) = (decks[0].front(), decks[1].front()) else {
            return Ok(finish(decks, rounds));
        };
        if !seen.insert(decks.clone()) {
            return Err(CombatError::Repeated(rounds));
        }
        decks[0].pop_front();
        decks[1].pop_front();
        award(&mut decks, if c1 > c2 { Player::One } else { Player::Two }, (c1, c2));
        rounds += 1;
    }
}

/// Recursive Combat.
///
/// A repeated position inside any game ends that game in favour of player 1.
/// When both players hold at least as many cards as they drew, the round is
/// decided by a sub-game on copies of that many top cards.
pub fn play_recursive_combat(hands: &Hands) -> Result<Outcome, CombatError> {
    let mut root = Game::new(deal(hands)?);
    let mut stack: Vec<Game> = Vec::new();
    let mut resolved = None;
    let mut rounds = 0;

    loop {
        let game = stack.last_mut().unwrap_or(&mut root);
        if let Some(winner) = resolved.take() {
            game.resolve_pending(winner);
        }

        match game.play_round() {
            Round::Decided => rounds += 1,
            Round::Recurse(sub) => {
                rounds += 1;
                stack.push(sub);
                log::trace!("entering sub-game at depth {}", stack.len());
            }
            Round::GameOver(winner) => {
                if stack.pop().is_none() {
                    let deck = root.decks[winner.index()].iter().copied().collect();
                    return Ok(Outcome {
                        winner,
                        deck,
                        rounds,
                    });
                }
                resolved = Some(winner);
            }
        }
    }
}

fn deal(hands: &Hands) -> Result<[Deck; 2], CombatError> {
    if hands.player1.is_empty() && hands.player2.is_empty() {
        return Err(CombatError::NoCards);
    }
    Ok([
        hands.player1.iter().copied().collect(),
        hands.player2.iter().copied().collect(),
    ])
}

fn award(decks: &mut [Deck; 2], winner: Player, (c1, c2): (Card, Card)) {
    let (first, second) = match winner {
        Player::One => (c1, c2),
        Player::Two => (c2, c1),
    };
    let deck = &mut decks[winner.index()];
    deck.push_back(first);
    deck.push_back(second);
}

fn finish(decks: [Deck; 2], rounds: usize) -> Outcome {
    let winner = if decks[0].is_empty() {
        Player::Two
    } else {
        Player::One
    };
    let [d1, d2] = decks;
    let deck = match winner {
        Player::One => d1,
        Player::Two => d2,
    };
    Outcome {
        winner,
        deck: deck.into(),
        rounds,
    }
}

enum Round {
    Decided,
    Recurse(Game),
    GameOver(Player),
}

/// One game frame of Recursive Combat.
struct Game {
    decks: [Deck; 2],
    seen: FxHashSet<[Deck; 2]>,
    /// Cards drawn in the round waiting on a sub-game
    pending: Option<(Card, Card)>,
}

impl Game {
    fn new(decks: [Deck; 2]) -> Self {
        Self {
            decks,
            seen: FxHashSet::default(),
            pending: None,
        }
    }

    fn resolve_pending(&mut self, winner: Player) {
        if let Some(drawn) = self.pending.take() {
            award(&mut self.decks, winner, drawn);
        }
    }

    fn play_round(&mut self) -> Round {
        let (Some(&c1), Some(&c2)) = (self.decks[0].front(), self.decks[1].front()) else {
            let winner = if self.decks[0].is_empty() {
                Player::Two
            } else {
                Player::One
            };
            return Round::GameOver(winner);
        };
        if !self.seen.insert(self.decks.clone()) {
            return Round::GameOver(Player::One);
        }
        self.decks[0].pop_front();
        self.decks[1].pop_front();

        let (n1, n2) = (c1 as usize, c2 as usize);
        if self.decks[0].len() >= n1 && self.decks[1].len() >= n2 {
            self.pending = Some((c1, c2));
            let sub = [
                self.decks[0].iter().take(n1).copied().collect(),
                self.decks[1].iter().take(n2).copied().collect(),
            ];
            return Round::Recurse(Game::new(sub));
        }

        let winner = if c1 > c2 { Player::One } else { Player::Two };
        award(&mut self.decks, winner, (c1, c2));
        Round::Decided
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Hands;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut hands = Hands::default();
        let mut current: Option<&mut Vec<Card>> = None;
        let mut seen_headers = [false; 2];

        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Player ") {
                let slot = match rest {
                    "1:" => 0,
                    "2:" => 1,
                    _ => return Err(ParseError::at_line(i, format!("unknown player {line:?}"))),
                };
                if std::mem::replace(&mut seen_headers[slot], true) {
                    return Err(ParseError::at_line(i, "player listed twice"));
                }
                current = Some(if slot == 0 {
                    &mut hands.player1
                } else {
                    &mut hands.player2
                });
                continue;
            }

            let deck = current
                .as_mut()
                .ok_or_else(|| ParseError::at_line(i, "card before any player header"))?;
            let card: Card = line
                .parse()
                .map_err(|e| ParseError::at_line(i, format!("bad card {line:?}: {e}")))?;
            if card == 0 {
                return Err(ParseError::at_line(i, "cards must be positive"));
            }
            deck.push(card);
        }

        if hands.player1.is_empty() && hands.player2.is_empty() {
            return Ok(hands);
        }
        if seen_headers != [true, true] {
            return Err(ParseError::MissingData("both player sections".into()));
        }
        let mut all: Vec<Card> = hands.player1.iter().chain(&hands.player2).copied().collect();
        all.sort_unstable();
        if let Some(pair) = all.windows(2).find(|w| w[0] == w[1]) {
            return Err(ParseError::InvalidFormat(format!(
                "card {} dealt more than once",
                pair[0]
            )));
        }
        Ok(hands)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let outcome = play_combat(shared).map_err(SolveError::failed)?;
        log::debug!("combat: {:?} wins after {} rounds", outcome.winner, outcome.rounds);
        Ok(outcome.score().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let outcome = play_recursive_combat(shared).map_err(SolveError::failed)?;
        log::debug!(
            "recursive combat: {:?} wins after {} rounds",
            outcome.winner,
            outcome.rounds
        );
        Ok(outcome.score().to_string())
    }
}
