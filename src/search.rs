use log::{debug, trace};

use crate::board::{format_move, GameState, Move, Player};
use crate::error::SearchTimeout;
use crate::evaluation::Evaluator;
use crate::types::{Score, SearchResult, SCORE_INFINITY};

/// Search state for one decision. Borrowed clock, owned counters.
///
/// Every node polls `time_left` on entry and fails with `SearchTimeout` once
/// fewer than `threshold_ms` milliseconds remain. The error propagates with
/// `?` through every active frame and is only caught by
/// `iterative_deepening` (or by the agent for fixed-depth search).
pub struct SearchState<'a, E> {
    pub nodes: u64,
    player: Player,
    evaluator: &'a E,
    time_left: &'a dyn Fn() -> f64,
    threshold_ms: f64,
    horizon_reached: bool,
}

impl<'a, E> SearchState<'a, E> {
    /// `player` is the side the search maximizes for and must be the side to
    /// move at the root.
    pub fn new(
        player: Player,
        evaluator: &'a E,
        time_left: &'a dyn Fn() -> f64,
        threshold_ms: f64,
    ) -> Self {
        Self {
            nodes: 0,
            player,
            evaluator,
            time_left,
            threshold_ms,
            horizon_reached: false,
        }
    }

    fn check_time(&self) -> Result<(), SearchTimeout> {
        if (self.time_left)() < self.threshold_ms {
            Err(SearchTimeout)
        } else {
            Ok(())
        }
    }

    /// Node entry: count it and poll the clock.
    #[inline]
    fn enter(&mut self) -> Result<(), SearchTimeout> {
        self.nodes += 1;
        self.check_time()
    }

    /// Depth-limited minimax. Root depth 0 is searched as depth 1.
    ///
    /// Ties go to the first move in enumeration order.
    pub fn minimax<G>(&mut self, game: &G, depth: u32) -> Result<SearchResult, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        self.enter()?;

        let moves = game.legal_moves();
        let Some(&first) = moves.first() else {
            return Ok(self.no_move(depth));
        };

        let mut best_move = first;
        let mut best_score = -SCORE_INFINITY;
        for &mv in &moves {
            let score = self.min_value(&game.forecast_move(mv), depth.max(1) - 1)?;
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }

        Ok(SearchResult {
            best_move: Some(best_move),
            score: best_score,
            depth,
            nodes: self.nodes,
        })
    }

    fn max_value<G>(&mut self, game: &G, depth: u32) -> Result<Score, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        self.enter()?;
        if let Some(score) = self.leaf_value(game, depth) {
            return Ok(score);
        }

        let mut best = -SCORE_INFINITY;
        for mv in game.legal_moves() {
            let score = self.min_value(&game.forecast_move(mv), depth - 1)?;
            if score > best {
                best = score;
            }
        }
        Ok(best)
    }

    fn min_value<G>(&mut self, game: &G, depth: u32) -> Result<Score, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        self.enter()?;
        if let Some(score) = self.leaf_value(game, depth) {
            return Ok(score);
        }

        let mut best = SCORE_INFINITY;
        for mv in game.legal_moves() {
            let score = self.max_value(&game.forecast_move(mv), depth - 1)?;
            if score < best {
                best = score;
            }
        }
        Ok(best)
    }

    /// Depth-limited minimax with alpha-beta pruning inside `[alpha, beta]`.
    /// Root depth 0 is searched as depth 1.
    pub fn alphabeta<G>(
        &mut self,
        game: &G,
        depth: u32,
        alpha: Score,
        beta: Score,
    ) -> Result<SearchResult, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        if game.legal_moves().is_empty() {
            self.enter()?;
            return Ok(self.no_move(depth));
        }

        let (score, best_move) = self.ab_max(game, depth.max(1), alpha, beta)?;
        Ok(SearchResult {
            best_move,
            score,
            depth,
            nodes: self.nodes,
        })
    }

    fn ab_max<G>(
        &mut self,
        game: &G,
        depth: u32,
        mut alpha: Score,
        beta: Score,
    ) -> Result<(Score, Option<Move>), SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        self.enter()?;
        if let Some(score) = self.leaf_value(game, depth) {
            return Ok((score, None));
        }

        let moves = game.legal_moves();
        let mut best_score = -SCORE_INFINITY;
        let mut best_move = moves.first().copied();
        for &mv in &moves {
            let (score, _) = self.ab_min(&game.forecast_move(mv), depth - 1, alpha, beta)?;
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            // Beta cutoff
            if best_score >= beta {
                break;
            }
            if best_score > alpha {
                alpha = best_score;
            }
        }
        Ok((best_score, best_move))
    }

    fn ab_min<G>(
        &mut self,
        game: &G,
        depth: u32,
        alpha: Score,
        mut beta: Score,
    ) -> Result<(Score, Option<Move>), SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        self.enter()?;
        if let Some(score) = self.leaf_value(game, depth) {
            return Ok((score, None));
        }

        let moves = game.legal_moves();
        let mut best_score = SCORE_INFINITY;
        let mut best_move = moves.first().copied();
        for &mv in &moves {
            let (score, _) = self.ab_max(&game.forecast_move(mv), depth - 1, alpha, beta)?;
            if score < best_score {
                best_score = score;
                best_move = Some(mv);
            }
            // Alpha cutoff
            if best_score <= alpha {
                break;
            }
            if best_score < beta {
                beta = best_score;
            }
        }
        Ok((best_score, best_move))
    }

    /// Terminal utility, or the evaluator's score at the horizon. `None` means
    /// the node has to be expanded.
    fn leaf_value<G>(&mut self, game: &G, depth: u32) -> Option<Score>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let utility = game.utility(self.player);
        if utility != 0.0 {
            return Some(utility);
        }
        if depth == 0 {
            self.horizon_reached = true;
            return Some(self.evaluator.evaluate(game, self.player));
        }
        None
    }

    fn no_move(&self, depth: u32) -> SearchResult {
        SearchResult {
            best_move: None,
            score: -SCORE_INFINITY,
            depth,
            nodes: self.nodes,
        }
    }

    /// Iterative deepening over `alphabeta`. Returns best move found
    ///
    /// Deepens one ply at a time while `time_left()` exceeds the threshold and
    /// keeps only results of fully completed depths. Stops early on a forced
    /// win, or once a depth completes without any line reaching the horizon
    /// (every line ended in a terminal state, so deeper searches cannot change
    /// the answer). Never fails: a timeout keeps the previous depth's result,
    /// which is `SearchResult::none()` if no depth completed.
    pub fn iterative_deepening<G>(&mut self, game: &G) -> SearchResult
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let mut result = SearchResult::none();
        let mut depth = 0;
        let mut remaining = (self.time_left)();

        while remaining > self.threshold_ms {
            depth += 1;
            self.nodes = 0;
            self.horizon_reached = false;

            match self.alphabeta(game, depth, -SCORE_INFINITY, SCORE_INFINITY) {
                Ok(completed) => {
                    result = completed;
                    // this reading also gates the next depth
                    remaining = (self.time_left)();
                    debug!(
                        "depth {} score {} move {} nodes {} time left {:.1}ms",
                        depth,
                        completed.score,
                        format_move(completed.best_move),
                        completed.nodes,
                        remaining
                    );
                }
                Err(SearchTimeout) => {
                    trace!("depth {} aborted after {} nodes", depth, self.nodes);
                    break;
                }
            }

            // Early exit if we found a forced win
            if result.score == SCORE_INFINITY {
                break;
            }
            if !self.horizon_reached {
                break;
            }
        }

        result
    }
}


// Two explicit node types (MAX for the searching side, MIN for the opponent) instead of negamax:
// the evaluator always scores from the searching side's point of view, so no sign flips.
//
// Alpha-beta is fail-soft: a cut-off node returns its running best, which is still a valid bound
// for the parent. With the full (-inf, +inf) window at the root the root value is exact.
//
// Iterative deepening: search depth 1->2->3... Each iteration is independent (no transposition
// table), and a depth interrupted by SearchTimeout is thrown away entirely.
