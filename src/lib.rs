//! Isolation game-playing agent.
//!
//! Minimax, alpha-beta and iterative-deepening search over any `GameState`,
//! weighted mobility heuristics, and a tournament harness for tuning them.

pub mod agent;
pub mod board;
pub mod error;
pub mod evaluation;
pub mod grid;
pub mod search;
pub mod time;
pub mod tournament;
pub mod types;

pub use agent::{Agent, AgentBuilder, AgentConfig, Strategy};
pub use board::{Board, GameState, Move, Player};
pub use error::{BoardError, ConfigError, SearchTimeout};
pub use evaluation::{Evaluator, Heuristic, Weights};
pub use types::{Score, SearchResult};
