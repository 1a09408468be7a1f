//! Rock-paper-scissors as a two-ply extensive-form game.
//!
//! Player 0 throws first; player 1 throws without seeing it, so each player
//! has a single information set. Two stake tables are provided:
//!
//! - **Symmetric**: every win pays 1. Equilibrium: uniform.
//! - **Asymmetric**: rock beating scissors and scissors beating paper pay 2,
//!   paper beating rock pays 1. Equilibrium: rock 0.4, paper 0.4,
//!   scissors 0.2.
//!
//! ```text
//!            P0
//!      R     P     S
//!      |     |     |
//!     P1    P1    P1      (one info set: "P1")
//!    R P S R P S R P S
//! ```

use std::fmt;

use crate::cfr::error::{CfrError, Result};
use crate::cfr::game::{Game, GameHistory, Move, NoChance, Payoffs, Turn};
use crate::impl_action;

/// A throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Throw {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl Throw {
    /// All throws, in action order.
    pub const ALL: [Throw; 3] = [Throw::Rock, Throw::Paper, Throw::Scissors];
}

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Throw::Rock => write!(f, "ROCK"),
            Throw::Paper => write!(f, "PAPER"),
            Throw::Scissors => write!(f, "SCISSORS"),
        }
    }
}

impl_action!(Throw);

/// How much each winning throw collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stakes {
    /// Every win pays 1.
    Symmetric,
    /// Rock and scissors wins pay 2, paper wins pay 1.
    Asymmetric,
}

impl Stakes {
    fn win(self, winner: Throw) -> f64 {
        match (self, winner) {
            (Stakes::Symmetric, _) => 1.0,
            (Stakes::Asymmetric, Throw::Rock | Throw::Scissors) => 2.0,
            (Stakes::Asymmetric, Throw::Paper) => 1.0,
        }
    }
}

/// Position in the game tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Opening,
    Answer(Throw),
    Showdown(Throw, Throw),
}

impl Node {
    fn step(self, throw: Throw) -> Option<Node> {
        match self {
            Node::Opening => Some(Node::Answer(throw)),
            Node::Answer(first) => Some(Node::Showdown(first, throw)),
            Node::Showdown(..) => None,
        }
    }
}

/// Rock-paper-scissors game.
#[derive(Debug, Clone, Copy)]
pub struct RockPaperScissors {
    stakes: Stakes,
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new()
    }
}

impl RockPaperScissors {
    /// Every win pays 1.
    pub fn new() -> Self {
        Self {
            stakes: Stakes::Symmetric,
        }
    }

    /// Rock and scissors wins pay double.
    pub fn asymmetric() -> Self {
        Self {
            stakes: Stakes::Asymmetric,
        }
    }

    fn walk(&self, history: &GameHistory<Self>) -> Result<Node> {
        history
            .moves()
            .iter()
            .try_fold(Node::Opening, |node, m| match m {
                Move::Play(throw) => node
                    .step(*throw)
                    .ok_or_else(|| CfrError::invalid_history(history, "both players already threw")),
                Move::Chance(never) => match *never {},
            })
    }

    /// Player 0's payoff for every pair of throws.
    fn showdown(&self, first: Throw, second: Throw) -> Payoffs {
        use Throw::*;
        let p0 = match (first, second) {
            (Rock, Rock) | (Paper, Paper) | (Scissors, Scissors) => 0.0,
            (Rock, Scissors) => self.stakes.win(Rock),
            (Paper, Rock) => self.stakes.win(Paper),
            (Scissors, Paper) => self.stakes.win(Scissors),
            (Scissors, Rock) => -self.stakes.win(Rock),
            (Rock, Paper) => -self.stakes.win(Paper),
            (Paper, Scissors) => -self.stakes.win(Scissors),
        };
        vec![p0, -p0]
    }
}

impl Game for RockPaperScissors {
    type Action = Throw;
    type Chance = NoChance;

    fn name(&self) -> &'static str {
        match self.stakes {
            Stakes::Symmetric => "rock-paper-scissors",
            Stakes::Asymmetric => "asymmetric-rock-paper-scissors",
        }
    }

    fn num_players(&self) -> usize {
        2
    }

    fn has_chance_player(&self) -> bool {
        false
    }

    fn is_zero_sum(&self) -> bool {
        true
    }

    fn is_terminal(&self, history: &GameHistory<Self>) -> bool {
        matches!(self.walk(history), Ok(Node::Showdown(..)))
    }

    fn active_player(&self, history: &GameHistory<Self>) -> Result<Turn> {
        match self.walk(history)? {
            Node::Opening => Ok(Turn::Player(0)),
            Node::Answer(_) => Ok(Turn::Player(1)),
            Node::Showdown(..) => Err(CfrError::invalid_history(history, "game is over")),
        }
    }

    fn legal_actions(&self, history: &GameHistory<Self>) -> Result<Vec<Throw>> {
        self.active_player(history)?;
        Ok(Throw::ALL.to_vec())
    }

    fn payoffs(&self, history: &GameHistory<Self>) -> Result<Payoffs> {
        match self.walk(history) {
            Ok(Node::Showdown(first, second)) => Ok(self.showdown(first, second)),
            _ => Err(CfrError::unrecognized_terminal(history)),
        }
    }

    fn info_key(&self, history: &GameHistory<Self>) -> Result<String> {
        // the first throw is hidden from player 1
        match self.active_player(history)? {
            Turn::Player(p) => Ok(format!("P{p}")),
            Turn::Chance => Err(CfrError::invalid_history(history, "no chance in this game")),
        }
    }
}
