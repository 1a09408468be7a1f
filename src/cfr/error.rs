//! Error types shared by games, players and the trainer.
//!
//! The game-integration variants signal a defect in a game definition or in
//! the traversal. They are surfaced immediately and never retried.

use thiserror::Error;

/// Errors raised while solving a game.
#[derive(Debug, Error)]
pub enum CfrError {
    /// A history has no defined active-player/terminal classification.
    #[error("invalid history [{history}]: {reason}")]
    InvalidHistory {
        /// Rendered history that could not be classified.
        history: String,
        /// What the game expected instead.
        reason: String,
    },

    /// A history reached the payoff mapping without matching any terminal case.
    #[error("no payoff defined for history [{history}]")]
    UnrecognizedTerminalHistory {
        /// Rendered history with no payoff case.
        history: String,
    },

    /// Players, actions or configuration do not agree with the game.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Reading or writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding a snapshot failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CfrError {
    /// Build an [`CfrError::InvalidHistory`] from anything displayable.
    pub fn invalid_history(history: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        CfrError::InvalidHistory {
            history: history.to_string(),
            reason: reason.into(),
        }
    }

    /// Build an [`CfrError::UnrecognizedTerminalHistory`] from anything displayable.
    pub fn unrecognized_terminal(history: impl std::fmt::Display) -> Self {
        CfrError::UnrecognizedTerminalHistory {
            history: history.to_string(),
        }
    }

    /// Build a [`CfrError::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        CfrError::Configuration(message.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CfrError>;
