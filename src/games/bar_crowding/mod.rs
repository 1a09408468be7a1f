//! El Farol bar crowding with three patrons.
//!
//! Each patron decides, without seeing the others, whether to go to the bar
//! or stay home. Staying home is worth 0. Going is worth +1 unless everyone
//! goes, in which case the bar is overcrowded and each patron who went gets
//! -1.
//!
//! Decisions are made in seat order but every patron has a single
//! information set, so the game is effectively simultaneous. Pure
//! equilibria have exactly two patrons going.

use std::fmt;

use crate::cfr::error::{CfrError, Result};
use crate::cfr::game::{Game, GameHistory, Move, NoChance, Payoffs, Turn};
use crate::impl_action;

const PATRONS: usize = 3;

/// A patron's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visit {
    /// Go to the bar.
    Go,
    /// Stay home.
    Stay,
}

impl Visit {
    /// Both decisions, in action order.
    pub const ALL: [Visit; 2] = [Visit::Go, Visit::Stay];
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visit::Go => write!(f, "GO"),
            Visit::Stay => write!(f, "STAY"),
        }
    }
}

impl_action!(Visit);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Choosing(Vec<Visit>),
    Closed([Visit; PATRONS]),
}

impl Node {
    fn step(self, visit: Visit) -> Option<Node> {
        match self {
            Node::Choosing(mut so_far) => {
                so_far.push(visit);
                Some(match <[Visit; PATRONS]>::try_from(so_far.as_slice()) {
                    Ok(all) => Node::Closed(all),
                    Err(_) => Node::Choosing(so_far),
                })
            }
            Node::Closed(_) => None,
        }
    }
}

/// Three-patron bar crowding game.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarCrowding;

impl BarCrowding {
    /// Create the game.
    pub fn new() -> Self {
        Self
    }

    fn walk(&self, history: &GameHistory<Self>) -> Result<Node> {
        history
            .moves()
            .iter()
            .try_fold(Node::Choosing(Vec::with_capacity(PATRONS)), |node, m| match m {
                Move::Play(visit) => node
                    .step(*visit)
                    .ok_or_else(|| CfrError::invalid_history(history, "every patron has decided")),
                Move::Chance(never) => match *never {},
            })
    }
}

impl Game for BarCrowding {
    type Action = Visit;
    type Chance = NoChance;

    fn name(&self) -> &'static str {
        "bar-crowding"
    }

    fn num_players(&self) -> usize {
        PATRONS
    }

    fn has_chance_player(&self) -> bool {
        false
    }

    fn is_terminal(&self, history: &GameHistory<Self>) -> bool {
        matches!(self.walk(history), Ok(Node::Closed(_)))
    }

    fn active_player(&self, history: &GameHistory<Self>) -> Result<Turn> {
        match self.walk(history)? {
            Node::Choosing(so_far) => Ok(Turn::Player(so_far.len())),
            Node::Closed(_) => Err(CfrError::invalid_history(history, "bar is closed")),
        }
    }

    fn legal_actions(&self, history: &GameHistory<Self>) -> Result<Vec<Visit>> {
        self.active_player(history)?;
        Ok(Visit::ALL.to_vec())
    }

    fn payoffs(&self, history: &GameHistory<Self>) -> Result<Payoffs> {
        let Ok(Node::Closed(visits)) = self.walk(history) else {
            return Err(CfrError::unrecognized_terminal(history));
        };
        let crowded = visits.iter().all(|&v| v == Visit::Go);
        Ok(visits
            .iter()
            .map(|visit| match (visit, crowded) {
                (Visit::Stay, _) => 0.0,
                (Visit::Go, false) => 1.0,
                (Visit::Go, true) => -1.0,
            })
            .collect())
    }

    fn info_key(&self, history: &GameHistory<Self>) -> Result<String> {
        match self.active_player(history)? {
            Turn::Player(p) => Ok(format!("P{p}")),
            Turn::Chance => Err(CfrError::invalid_history(history, "no chance in this game")),
        }
    }
}
