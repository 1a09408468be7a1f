//! CFR (Counterfactual Regret Minimization) module.
//!
//! This module provides a generic, chance-sampled implementation of CFR for
//! computing Nash equilibrium strategies in extensive-form games.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! Chance nodes are resolved by drawing a single outcome per visit, so one
//! iteration explores every player action but only one deal. This needs more
//! iterations than enumerating every chance outcome, in exchange for a smaller
//! tree per iteration.
//!
//! # Usage
//!
//! 1. Implement the `Game` trait for your game
//! 2. Create a `CfrTrainer` with your game, one `CfrPlayer` per seat and a
//!    `TrainerConfig`
//! 3. Call `train()` to run the configured number of iterations
//! 4. Read each player's `average_strategy()`
//!
//! # Example
//!
//! ```
//! use imperfect_info_games::cfr::{CfrTrainer, TrainerConfig};
//! use imperfect_info_games::games::kuhn::KuhnPoker;
//!
//! let config = TrainerConfig::seeded(5_000, 0);
//! let mut trainer = CfrTrainer::with_default_players(KuhnPoker::new(), config).unwrap();
//! let stats = trainer.train().unwrap();
//! assert_eq!(stats.info_sets, 12);
//!
//! // P0 holding the king, first to act
//! let strategy = trainer.player(0).unwrap().average_strategy("K:", 2);
//! assert_eq!(strategy.len(), 2);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of
//! the current strategy, weighted by the probability that everyone else
//! steered play into the information set.
//! ```text
//! R(I, a) += pi_-i(h) * (v(h·a) - v(h))
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! sigma(I, a) = max(0, R(I, a)) / sum(max(0, R(I, a')))
//! ```
//!
//! **Average strategy**: Own-reach weighted average of every iteration's
//! strategy; this is what converges.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Lanctot, M., et al. "Monte Carlo Sampling for Regret Minimization in Extensive Games" (2009)

pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod storage;
pub mod trainer;
pub mod tree;

// Re-export main types for convenient access
pub use config::{TrainerConfig, TrainingStats, Traversal};
pub use error::{CfrError, Result};
pub use game::{Action, Game, GameHistory, History, Move, NoChance, Payoffs, Turn};
pub use player::{CfrPlayer, InfosetReport, PlayerExport};
pub use storage::{RegretEntry, RegretTable, TableExport};
pub use trainer::{CfrTrainer, TrainerSnapshot};
