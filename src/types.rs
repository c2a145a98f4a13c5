use crate::board::Move;

/// Heuristic and terminal values. Wins and losses are `±INFINITY`.
pub type Score = f64;

pub const SCORE_INFINITY: Score = f64::INFINITY;
pub const DEFAULT_DEPTH: u32 = 3;
pub const DEFAULT_TIMER_THRESHOLD_MS: f64 = 10.0;
pub const DEFAULT_TIME_LIMIT_MS: f64 = 150.0;
pub const DEFAULT_BOARD_SIZE: u8 = 7;
pub const DEFAULT_NUM_MATCHES: usize = 10;

/// Outcome of one depth-limited or iterative-deepening search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: Score,
    /// deepest fully completed depth (0 when nothing completed)
    pub depth: u32,
    /// nodes visited at `depth` alone; earlier iterations are not included
    pub nodes: u64,
}

impl SearchResult {
    /// Result reported when no depth completed.
    pub fn none() -> Self {
        Self {
            best_move: None,
            score: -SCORE_INFINITY,
            depth: 0,
            nodes: 0,
        }
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::none()
    }
}
