//! Game implementations for the CFR trainer.
//!
//! These serve as:
//!
//! 1. **Validation**: games with known equilibria (Kuhn Poker, both
//!    rock-paper-scissors variants) verify that training converges.
//!
//! 2. **Examples**: each module shows a small state machine folded over the
//!    move history to implement the `Game` trait.
//!
//! 3. **Benchmarks**: standard games for performance testing.
//!
//! ## Available Games
//!
//! - [`kuhn`]: Kuhn Poker, 3-card poker with a chance deal
//! - [`rps`]: rock-paper-scissors, symmetric and asymmetric stakes
//! - [`prisoners_dilemma`]: general-sum, defection dominates
//! - [`bar_crowding`]: three-player El Farol bar
//!
//! ## Adding New Games
//!
//! 1. Create a new module under `src/games/`
//! 2. Define the action type and derive its traits, then `impl_action!` it
//! 3. Implement the `Game` trait, returning errors for malformed histories
//! 4. Add tests that verify payoffs and information-set keys

pub mod bar_crowding;
pub mod kuhn;
pub mod prisoners_dilemma;
pub mod rps;
