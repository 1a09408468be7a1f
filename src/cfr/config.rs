//! Configuration options for the CFR trainer.
//!
//! This module provides the trainer configuration and the statistics reported
//! after a training run.

use serde::{Deserialize, Serialize};

use crate::cfr::error::{CfrError, Result};

/// How the trainer walks the game tree.
///
/// Both engines visit nodes in the same depth-first order and draw chance
/// outcomes in the same sequence, so they produce identical tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Traversal {
    /// One native call frame per history.
    #[default]
    Recursive,
    /// Explicit stack of frames owned by the trainer; depth is bounded by
    /// heap memory rather than the thread's call stack.
    WorkList,
}

/// Configuration for the CFR trainer.
///
/// # Example
/// ```
/// use imperfect_info_games::cfr::{TrainerConfig, Traversal};
///
/// let config = TrainerConfig::default().with_seed(7);
/// assert_eq!(config.iterations, 10_000);
/// assert_eq!(config.traversal, Traversal::Recursive);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of training iterations `train()` runs. Training stops after
    /// exactly this many traversals; there is no convergence check.
    pub iterations: u64,

    /// Random seed for chance sampling.
    ///
    /// If set, the trainer seeds its random source with it, making runs
    /// reproducible. If `None`, the source is seeded from entropy.
    pub seed: Option<u64>,

    /// Tree traversal engine.
    #[serde(default)]
    pub traversal: Traversal,

    /// Emit a debug log line every this many iterations (0 disables).
    #[serde(default)]
    pub report_interval: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            seed: None,
            traversal: Traversal::Recursive,
            report_interval: 0,
        }
    }
}

impl TrainerConfig {
    /// Create a new TrainerConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproducible configuration: fixed seed and iteration count.
    pub fn seeded(iterations: u64, seed: u64) -> Self {
        Self {
            iterations,
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Builder method: set iteration count.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set traversal engine.
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Builder method: set progress log interval.
    pub fn with_report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// [`CfrError::Configuration`] if the iteration count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(CfrError::configuration("iteration count must be positive"));
        }
        Ok(())
    }
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of unique information sets discovered, over all players.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Mean root value per player over all iterations so far.
    pub average_payoffs: Vec<f64>,
}

impl TrainingStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }
}
