//! Game trait definition for the CFR trainer.
//!
//! Any sequential game, with or without hidden information and chance, can be
//! solved once it implements [`Game`]. The trainer only ever talks to a game
//! through this trait, and only ever passes it [`History`] values.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use rand::Rng;

use crate::cfr::error::{CfrError, Result};

/// Trait for moves that can appear in a history.
///
/// Both player actions and chance outcomes implement it. The `Display` form
/// is used for infoset keys, reports and error messages.
pub trait Action: Clone + Eq + Hash + Debug + Display {}

/// Who moves at a non-terminal history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// A regular player, identified by its 0-based id.
    Player(usize),
    /// The chance player (e.g. the dealer).
    Chance,
}

/// One element of a history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move<A, C> {
    /// An outcome drawn by the chance player.
    Chance(C),
    /// An action taken by a regular player.
    Play(A),
}

impl<A: Display, C: Display> Display for Move<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Chance(c) => write!(f, "{}", c),
            Move::Play(a) => write!(f, "{}", a),
        }
    }
}

/// Ordered, immutable sequence of moves from the root of the game tree.
///
/// Histories are never changed in place: [`History::extended`] returns the
/// child history and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct History<A, C> {
    moves: Vec<Move<A, C>>,
}

impl<A, C> Default for History<A, C> {
    fn default() -> Self {
        Self { moves: Vec::new() }
    }
}

impl<A: Clone, C: Clone> History<A, C> {
    /// The empty history (root of the game tree).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a history from a list of moves.
    pub fn from_moves(moves: Vec<Move<A, C>>) -> Self {
        Self { moves }
    }

    /// Child history reached by playing `next`.
    pub fn extended(&self, next: Move<A, C>) -> Self {
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(next);
        Self { moves }
    }

    /// Child history reached by a player action.
    pub fn with_play(&self, action: A) -> Self {
        self.extended(Move::Play(action))
    }

    /// Child history reached by a chance outcome.
    pub fn with_chance(&self, outcome: C) -> Self {
        self.extended(Move::Chance(outcome))
    }
}

impl<A, C> History<A, C> {
    /// All moves, oldest first.
    pub fn moves(&self) -> &[Move<A, C>] {
        &self.moves
    }

    /// Number of moves (plies, chance included).
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True for the root history.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Player actions only, oldest first.
    pub fn plays(&self) -> impl Iterator<Item = &A> + '_ {
        self.moves.iter().filter_map(|m| match m {
            Move::Play(a) => Some(a),
            Move::Chance(_) => None,
        })
    }

    /// Chance outcomes only, oldest first.
    pub fn chances(&self) -> impl Iterator<Item = &C> + '_ {
        self.moves.iter().filter_map(|m| match m {
            Move::Chance(c) => Some(c),
            Move::Play(_) => None,
        })
    }
}

impl<A: Display, C: Display> Display for History<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

/// Chance type for games without a chance player. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoChance {}

impl Display for NoChance {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Action for NoChance {}

/// History type of a game.
pub type GameHistory<G> = History<<G as Game>::Action, <G as Game>::Chance>;

/// Payoff vector: one utility per player, defined at terminal histories.
pub type Payoffs = Vec<f64>;

/// The main Game trait that defines the interface for any game.
///
/// Implement this trait to use the CFR trainer with your game.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type Action = MyAction;
///     type Chance = NoChance;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game {
    /// Actions available to regular players.
    type Action: Action;

    /// Outcomes drawn by the chance player. Use [`NoChance`] if there is none.
    type Chance: Action;

    /// Human-readable name of the game.
    fn name(&self) -> &'static str;

    /// Number of regular (non-chance) players.
    fn num_players(&self) -> usize;

    /// Whether the game contains chance nodes.
    fn has_chance_player(&self) -> bool;

    /// Whether every terminal payoff vector sums to zero.
    fn is_zero_sum(&self) -> bool {
        false
    }

    /// Check if the given history is complete.
    ///
    /// Must be total: malformed histories are simply not terminal.
    fn is_terminal(&self, history: &GameHistory<Self>) -> bool;

    /// Who moves at `history`.
    ///
    /// # Errors
    /// [`CfrError::InvalidHistory`] for terminal or undefined histories.
    fn active_player(&self, history: &GameHistory<Self>) -> Result<Turn>;

    /// Actions available to the player moving at `history`.
    ///
    /// # Errors
    /// [`CfrError::InvalidHistory`] unless `history` is a player node.
    fn legal_actions(&self, history: &GameHistory<Self>) -> Result<Vec<Self::Action>>;

    /// Payoff vector at a terminal history.
    ///
    /// # Errors
    /// [`CfrError::UnrecognizedTerminalHistory`] if no terminal case matches.
    fn payoffs(&self, history: &GameHistory<Self>) -> Result<Payoffs>;

    /// Information set key of the player moving at `history`.
    ///
    /// Histories that differ only in information hidden from that player must
    /// produce the same key.
    ///
    /// # Errors
    /// [`CfrError::InvalidHistory`] unless `history` is a player node.
    fn info_key(&self, history: &GameHistory<Self>) -> Result<String>;

    /// Draw one chance outcome from the injected random source.
    ///
    /// # Errors
    /// [`CfrError::Configuration`] for games without a chance player.
    fn chance_action<R: Rng + ?Sized>(&self, _rng: &mut R) -> Result<Self::Chance> {
        Err(CfrError::configuration(format!(
            "{} has no chance player",
            self.name()
        )))
    }

    /// Full chance distribution as `(outcome, probability)` pairs.
    ///
    /// Only used to enumerate and evaluate the tree, never for training.
    fn chance_outcomes(&self) -> Vec<(Self::Chance, f64)> {
        Vec::new()
    }
}

/// Implements [`Action`] for one or more types.
#[macro_export]
macro_rules! impl_action {
    ($($type:ty),+ $(,)?) => {
        $(impl $crate::cfr::game::Action for $type {})+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Coin {
        Heads,
        Tails,
    }

    impl Display for Coin {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Coin::Heads => write!(f, "H"),
                Coin::Tails => write!(f, "T"),
            }
        }
    }

    impl_action!(Coin);

    #[test]
    fn test_history_is_extended_not_mutated() {
        let root: History<Coin, Coin> = History::root();
        let child = root.with_chance(Coin::Heads);
        let grandchild = child.with_play(Coin::Tails);

        assert!(root.is_empty());
        assert_eq!(child.len(), 1);
        assert_eq!(grandchild.len(), 2);
        assert_eq!(grandchild.moves()[0], Move::Chance(Coin::Heads));
        assert_eq!(grandchild.to_string(), "H-T");
    }

    #[test]
    fn test_history_filters() {
        let history: History<Coin, Coin> = History::from_moves(vec![
            Move::Chance(Coin::Tails),
            Move::Play(Coin::Heads),
            Move::Play(Coin::Heads),
        ]);
        assert_eq!(history.plays().count(), 2);
        assert_eq!(history.chances().copied().collect::<Vec<_>>(), vec![Coin::Tails]);
    }
}
