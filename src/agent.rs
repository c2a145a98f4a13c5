//! Decision-making agent: one evaluator, one search strategy, one time threshold.

use log::warn;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::board::{GameState, Move};
use crate::error::ConfigError;
use crate::evaluation::Evaluator;
use crate::search::SearchState;
use crate::types::{SearchResult, DEFAULT_DEPTH, DEFAULT_TIMER_THRESHOLD_MS};

/// How an agent searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Fixed-depth minimax without pruning.
    Minimax,
    /// Iterative-deepening alpha-beta until the clock runs low.
    #[default]
    IterativeDeepening,
}

/// Immutable agent settings, validated by `AgentBuilder::build`.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig<E> {
    pub evaluator: E,
    pub strategy: Strategy,
    /// Depth used by `Strategy::Minimax`.
    pub search_depth: u32,
    /// Search aborts once fewer than this many milliseconds remain.
    pub timer_threshold_ms: f64,
}

/// Builder for `Agent`. Rejects invalid settings at `build` time, never
/// during a search.
#[derive(Debug)]
pub struct AgentBuilder<E> {
    evaluator: Option<E>,
    strategy: Strategy,
    search_depth: u32,
    timer_threshold_ms: f64,
    seed: Option<u64>,
}

impl<E> Default for AgentBuilder<E> {
    fn default() -> Self {
        Self {
            evaluator: None,
            strategy: Strategy::default(),
            search_depth: DEFAULT_DEPTH,
            timer_threshold_ms: DEFAULT_TIMER_THRESHOLD_MS,
            seed: None,
        }
    }
}

impl<E> AgentBuilder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluator(mut self, evaluator: E) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn search_depth(mut self, depth: u32) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn timer_threshold_ms(mut self, threshold_ms: f64) -> Self {
        self.timer_threshold_ms = threshold_ms;
        self
    }

    /// Seed for the timeout fallback's random move choice.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Agent<E>, ConfigError> {
        let evaluator = self.evaluator.ok_or(ConfigError::MissingEvaluator)?;
        if self.search_depth == 0 {
            return Err(ConfigError::InvalidDepth(self.search_depth));
        }
        if !self.timer_threshold_ms.is_finite() || self.timer_threshold_ms < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.timer_threshold_ms));
        }

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Agent {
            config: AgentConfig {
                evaluator,
                strategy: self.strategy,
                search_depth: self.search_depth,
                timer_threshold_ms: self.timer_threshold_ms,
            },
            rng,
            last_search: None,
        })
    }
}

/// Game-playing agent.
///
/// The clock is handed in on every `choose_move` call and dropped when it
/// returns; it is only meaningful for the current decision.
#[derive(Debug)]
pub struct Agent<E> {
    config: AgentConfig<E>,
    rng: StdRng,
    last_search: Option<SearchResult>,
}

impl<E> Agent<E> {
    pub fn builder() -> AgentBuilder<E> {
        AgentBuilder::new()
    }

    pub fn config(&self) -> &AgentConfig<E> {
        &self.config
    }

    /// Result of the most recent completed search, if any.
    pub fn last_search(&self) -> Option<SearchResult> {
        self.last_search
    }

    /// Pick a move for the side to move in `game`.
    ///
    /// `time_left` reports the milliseconds left in this decision and is
    /// polled at every search node. Returns `None` only when there is no
    /// legal move, or when iterative deepening could not finish depth 1.
    pub fn choose_move<G>(&mut self, game: &G, time_left: &dyn Fn() -> f64) -> Option<Move>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        let player = game.active_player();
        let mut search = SearchState::new(
            player,
            &self.config.evaluator,
            time_left,
            self.config.timer_threshold_ms,
        );

        match self.config.strategy {
            Strategy::IterativeDeepening => {
                let result = search.iterative_deepening(game);
                self.last_search = (result.depth > 0).then_some(result);
                result.best_move
            }
            Strategy::Minimax => match search.minimax(game, self.config.search_depth) {
                Ok(result) => {
                    self.last_search = Some(result);
                    result.best_move
                }
                Err(timeout) => {
                    self.last_search = None;
                    let moves = game.legal_moves();
                    let fallback = moves.as_slice().choose(&mut self.rng).copied();
                    if fallback.is_some() {
                        warn!(
                            "{} at depth {}; playing a random move",
                            timeout, self.config.search_depth
                        );
                    }
                    fallback
                }
            },
        }
    }
}
