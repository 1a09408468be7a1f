//! # Imperfect Information Games
//!
//! A generic Counterfactual Regret Minimization (CFR) trainer for computing
//! approximate Nash equilibrium strategies in imperfect-information games.
//!
//! ## Features
//!
//! - **Generic CFR Engine**: works with any game implementing the `Game` trait
//! - **Chance Sampling**: one chance outcome is drawn per visit, every player
//!   action is expanded
//! - **Deterministic Runs**: a seeded random source reproduces training
//!   exactly, with either traversal engine
//! - **Checkpointing**: save and resume trainer state as JSON
//! - **Exact Evaluation**: expected payoffs of the average strategy profile
//!
//! ## Quick Start
//!
//! ```
//! use imperfect_info_games::cfr::{CfrTrainer, TrainerConfig};
//! use imperfect_info_games::games::rps::RockPaperScissors;
//!
//! let config = TrainerConfig::seeded(1_000, 7);
//! let mut trainer = CfrTrainer::with_default_players(RockPaperScissors::new(), config).unwrap();
//! trainer.train().unwrap();
//!
//! let strategy = trainer.player(0).unwrap().average_strategy("P0", 3);
//! assert!((strategy.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     CfrTrainer (generic)                        │
//! │  - Recursive / work-list traversal   - Snapshot save/load       │
//! │  - CfrPlayer: regret table per seat  - Exact evaluation         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements Game trait
//!                               ▼
//!      ┌──────────┬─────────────┼──────────────┬──────────────┐
//!      ▼          ▼             ▼              ▼              ▼
//!   Kuhn      Rock-Paper-   Asymmetric    Prisoner's     Bar
//!   Poker     Scissors      RPS           Dilemma        Crowding
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) trainer module.
///
/// This is the core module containing the generic CFR algorithm.
pub mod cfr;

/// Game implementations module.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{CfrError, CfrPlayer, CfrTrainer, Game, History, TrainerConfig, Traversal, Turn};
