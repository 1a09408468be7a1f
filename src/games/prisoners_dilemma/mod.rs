//! The prisoner's dilemma, played as two hidden sequential choices.
//!
//! Payoffs are years in prison, negated:
//!
//! | P0 \ P1   | Cooperate | Defect   |
//! |-----------|-----------|----------|
//! | Cooperate | -1, -1    | -3, 0    |
//! | Defect    | 0, -3     | -2, -2   |
//!
//! Defecting strictly dominates, so both players converge to always defect.
//! The game is general-sum.

use std::fmt;

use crate::cfr::error::{CfrError, Result};
use crate::cfr::game::{Game, GameHistory, Move, NoChance, Payoffs, Turn};
use crate::impl_action;

/// What a prisoner tells the interrogator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// Stay silent.
    Cooperate,
    /// Betray the other prisoner.
    Defect,
}

impl Choice {
    /// Both choices, in action order.
    pub const ALL: [Choice; 2] = [Choice::Cooperate, Choice::Defect];
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Cooperate => write!(f, "COOPERATE"),
            Choice::Defect => write!(f, "DEFECT"),
        }
    }
}

impl_action!(Choice);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    First,
    Second(Choice),
    Verdict(Choice, Choice),
}

impl Node {
    fn step(self, choice: Choice) -> Option<Node> {
        match self {
            Node::First => Some(Node::Second(choice)),
            Node::Second(first) => Some(Node::Verdict(first, choice)),
            Node::Verdict(..) => None,
        }
    }
}

/// Prisoner's dilemma game.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrisonersDilemma;

impl PrisonersDilemma {
    /// Create the game.
    pub fn new() -> Self {
        Self
    }

    fn walk(&self, history: &GameHistory<Self>) -> Result<Node> {
        history.moves().iter().try_fold(Node::First, |node, m| match m {
            Move::Play(choice) => node
                .step(*choice)
                .ok_or_else(|| CfrError::invalid_history(history, "both prisoners have spoken")),
            Move::Chance(never) => match *never {},
        })
    }
}

impl Game for PrisonersDilemma {
    type Action = Choice;
    type Chance = NoChance;

    fn name(&self) -> &'static str {
        "prisoners-dilemma"
    }

    fn num_players(&self) -> usize {
        2
    }

    fn has_chance_player(&self) -> bool {
        false
    }

    fn is_terminal(&self, history: &GameHistory<Self>) -> bool {
        matches!(self.walk(history), Ok(Node::Verdict(..)))
    }

    fn active_player(&self, history: &GameHistory<Self>) -> Result<Turn> {
        match self.walk(history)? {
            Node::First => Ok(Turn::Player(0)),
            Node::Second(_) => Ok(Turn::Player(1)),
            Node::Verdict(..) => Err(CfrError::invalid_history(history, "verdict already given")),
        }
    }

    fn legal_actions(&self, history: &GameHistory<Self>) -> Result<Vec<Choice>> {
        self.active_player(history)?;
        Ok(Choice::ALL.to_vec())
    }

    fn payoffs(&self, history: &GameHistory<Self>) -> Result<Payoffs> {
        use Choice::{Cooperate, Defect};
        let Ok(Node::Verdict(first, second)) = self.walk(history) else {
            return Err(CfrError::unrecognized_terminal(history));
        };
        Ok(match (first, second) {
            (Cooperate, Cooperate) => vec![-1.0, -1.0],
            (Cooperate, Defect) => vec![-3.0, 0.0],
            (Defect, Cooperate) => vec![0.0, -3.0],
            (Defect, Defect) => vec![-2.0, -2.0],
        })
    }

    fn info_key(&self, history: &GameHistory<Self>) -> Result<String> {
        match self.active_player(history)? {
            Turn::Player(p) => Ok(format!("P{p}")),
            Turn::Chance => Err(CfrError::invalid_history(history, "no chance in this game")),
        }
    }
}
