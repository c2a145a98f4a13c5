//! Error types for the isolation crate

use thiserror::Error;

use crate::board::Move;

/// Raised by a search node that polls the clock and finds less time left than
/// the agent's threshold. Caught by the iterative-deepening driver or the
/// agent's fixed-depth fallback, never by the match harness.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("search timed out")]
pub struct SearchTimeout;

/// Rejected agent, tournament or grid configuration.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("agent has no evaluator")]
    MissingEvaluator,

    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u32),

    #[error("timer threshold must be a finite, non-negative number of ms, got {0}")]
    InvalidThreshold(f64),

    #[error("time limit must be a finite, positive number of ms, got {0}")]
    InvalidTimeLimit(f64),

    #[error("number of matches must be at least 1")]
    InvalidMatchCount,

    #[error("board dimensions must be between 1 and 8, got {width}x{height}")]
    InvalidBoardSize { width: u8, height: u8 },
}

/// Board construction, parsing and move application errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoardError {
    #[error("board dimensions must be between 1 and 8, got {width}x{height}")]
    InvalidDimensions { width: u8, height: u8 },

    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("invalid board layout '{layout}': {reason}")]
    Parse { layout: String, reason: String },
}
