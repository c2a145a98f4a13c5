//! Match runner and round-robin tournament.
//!
//! Every game gets its own `Board`; contestants only ever see copies of it.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::agent::{Agent, Strategy};
use crate::board::{Board, GameState, Move, Player};
use crate::error::ConfigError;
use crate::evaluation::{Evaluator, Heuristic};
use crate::time::Deadline;
use crate::types::{
    DEFAULT_BOARD_SIZE, DEFAULT_DEPTH, DEFAULT_NUM_MATCHES, DEFAULT_TIMER_THRESHOLD_MS,
    DEFAULT_TIME_LIMIT_MS,
};

/// Anything that can take a turn in a match.
pub trait Contestant {
    fn choose_move(&mut self, game: &Board, time_left: &dyn Fn() -> f64) -> Option<Move>;
}

impl<E: Evaluator<Board>> Contestant for Agent<E> {
    fn choose_move(&mut self, game: &Board, time_left: &dyn Fn() -> f64) -> Option<Move> {
        Agent::choose_move(self, game, time_left)
    }
}

/// Plays a uniformly random legal move.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl Contestant for RandomPlayer {
    fn choose_move(&mut self, game: &Board, _time_left: &dyn Fn() -> f64) -> Option<Move> {
        game.legal_moves().as_slice().choose(&mut self.rng).copied()
    }
}

/// A named contestant.
pub struct Entrant {
    pub name: String,
    pub contestant: Box<dyn Contestant + Send>,
}

impl Entrant {
    pub fn new(name: impl Into<String>, contestant: impl Contestant + Send + 'static) -> Self {
        Self {
            name: name.into(),
            contestant: Box::new(contestant),
        }
    }
}

/// Why a match ended. The side to move at that point loses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The side to move had no legal move.
    NoLegalMoves,
    /// The side to move answered after its time ran out.
    Timeout,
    /// The side to move answered with a move that is not legal, while legal
    /// moves existed.
    IllegalMove,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchOutcome {
    pub winner: Player,
    pub history: Vec<Move>,
    pub termination: Termination,
    pub final_board: Board,
}

/// Plays `board` to completion. `first` moves for `Player::One`.
pub fn play_match(
    board: Board,
    first: &mut dyn Contestant,
    second: &mut dyn Contestant,
    time_limit_ms: f64,
) -> MatchOutcome {
    let mut board = board;
    let mut history = Vec::new();

    loop {
        let active = board.active_player();
        let contestant: &mut dyn Contestant = match active {
            Player::One => &mut *first,
            Player::Two => &mut *second,
        };
        let stuck = !board.has_moves(active);

        let deadline = Deadline::start(time_limit_ms);
        let time_left = || deadline.remaining_ms();
        let choice = contestant.choose_move(&board, &time_left);

        let played = if deadline.expired() {
            Err(Termination::Timeout)
        } else {
            match choice.map(|mv| board.apply_move(mv).map(|()| mv)) {
                Some(Ok(mv)) => Ok(mv),
                _ if stuck => Err(Termination::NoLegalMoves),
                _ => Err(Termination::IllegalMove),
            }
        };

        match played {
            Ok(mv) => history.push(mv),
            Err(termination) => {
                debug!(
                    "{:?} loses by {:?} after {} moves",
                    active,
                    termination,
                    history.len()
                );
                return MatchOutcome {
                    winner: active.opponent(),
                    history,
                    termination,
                    final_board: board,
                };
            }
        }
    }
}

/// Settings shared by every match of a tournament.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TournamentConfig {
    /// Matches per opponent; each match is two games with sides swapped.
    pub num_matches: usize,
    pub time_limit_ms: f64,
    pub width: u8,
    pub height: u8,
    /// Seed for openings and random players. `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            num_matches: DEFAULT_NUM_MATCHES,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            width: DEFAULT_BOARD_SIZE,
            height: DEFAULT_BOARD_SIZE,
            seed: None,
        }
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_matches == 0 {
            return Err(ConfigError::InvalidMatchCount);
        }
        if !self.time_limit_ms.is_finite() || self.time_limit_ms <= 0.0 {
            return Err(ConfigError::InvalidTimeLimit(self.time_limit_ms));
        }
        if !(1..=8).contains(&self.width) || !(1..=8).contains(&self.height) {
            return Err(ConfigError::InvalidBoardSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Every game starts from this empty board.
    pub fn board(&self) -> Result<Board, ConfigError> {
        Board::new(self.width, self.height).map_err(|_| ConfigError::InvalidBoardSize {
            width: self.width,
            height: self.height,
        })
    }
}

/// Tally of the test agent against one opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpponentRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RoundResult {
    pub records: Vec<OpponentRecord>,
    /// Games lost by the test agent on time.
    pub timeouts: u32,
    /// Games lost by an opponent through an illegal move.
    pub forfeits: u32,
}

impl RoundResult {
    pub fn total_wins(&self) -> u32 {
        self.records.iter().map(|r| r.wins).sum()
    }

    pub fn total_games(&self) -> u32 {
        self.records.iter().map(|r| r.wins + r.losses).sum()
    }

    pub fn win_rate(&self) -> f64 {
        match self.total_games() {
            0 => 0.0,
            games => self.total_wins() as f64 / games as f64,
        }
    }
}

/// Plays `test` against every opponent, `num_matches` times each.
///
/// A match is a pair of games from the same random two-move opening, one with
/// the opponent moving first and one with `test` moving first.
pub fn play_round(
    test: &mut Entrant,
    opponents: &mut [Entrant],
    config: &TournamentConfig,
) -> Result<RoundResult, ConfigError> {
    config.validate()?;
    let empty = config.board()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut result = RoundResult::default();
    for opponent in opponents.iter_mut() {
        let mut record = OpponentRecord {
            name: opponent.name.clone(),
            wins: 0,
            losses: 0,
        };

        for _ in 0..config.num_matches {
            let Some(opening) = random_opening(empty, &mut rng) else {
                continue;
            };

            let games = [
                play_match(
                    opening,
                    opponent.contestant.as_mut(),
                    test.contestant.as_mut(),
                    config.time_limit_ms,
                ),
                play_match(
                    opening,
                    test.contestant.as_mut(),
                    opponent.contestant.as_mut(),
                    config.time_limit_ms,
                ),
            ];
            let test_sides = [Player::Two, Player::One];

            for (outcome, test_side) in games.iter().zip(test_sides) {
                if outcome.winner == test_side {
                    record.wins += 1;
                    if outcome.termination == Termination::IllegalMove {
                        result.forfeits += 1;
                    }
                } else {
                    record.losses += 1;
                    if outcome.termination == Termination::Timeout {
                        result.timeouts += 1;
                    }
                }
            }
        }

        info!(
            "{} vs {}: {} - {}",
            test.name, record.name, record.wins, record.losses
        );
        result.records.push(record);
    }

    Ok(result)
}

/// Both players' first placements, chosen at random. `None` on boards too
/// small to place both players.
fn random_opening(board: Board, rng: &mut StdRng) -> Option<Board> {
    let mut board = board;
    for _ in 0..2 {
        let mv = *board.legal_moves().as_slice().choose(rng)?;
        board.apply_move(mv).ok()?;
    }
    Some(board)
}

/// The standard opponent roster: a random player plus fixed-depth minimax and
/// iterative-deepening alpha-beta agents on the three baseline heuristics.
pub fn default_cpu_agents(seed: Option<u64>) -> Result<Vec<Entrant>, ConfigError> {
    let seed_for = |i: u64| seed.map(|s| s.wrapping_add(i));
    let mut roster = vec![Entrant::new("Random", RandomPlayer::new(seed_for(0)))];

    let baselines = [
        ("Open", Heuristic::OpenMove),
        ("Center", Heuristic::Center),
        ("Improved", Heuristic::Improved),
    ];
    for (prefix, strategy) in [("MM", Strategy::Minimax), ("AB", Strategy::IterativeDeepening)] {
        for (suffix, heuristic) in baselines {
            let mut builder = Agent::builder()
                .evaluator(heuristic)
                .strategy(strategy)
                .search_depth(DEFAULT_DEPTH)
                .timer_threshold_ms(DEFAULT_TIMER_THRESHOLD_MS);
            if let Some(s) = seed_for(roster.len() as u64) {
                builder = builder.seed(s);
            }
            roster.push(Entrant::new(format!("{prefix}_{suffix}"), builder.build()?));
        }
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always answers with the same cell, legal or not.
    struct Stubborn(Move);

    impl Contestant for Stubborn {
        fn choose_move(&mut self, _game: &Board, _time_left: &dyn Fn() -> f64) -> Option<Move> {
            Some(self.0)
        }
    }

    /// Burns its whole budget before answering.
    struct Sleeper;

    impl Contestant for Sleeper {
        fn choose_move(&mut self, game: &Board, time_left: &dyn Fn() -> f64) -> Option<Move> {
            while time_left() >= 0.0 {
                std::hint::spin_loop();
            }
            game.legal_moves().first().copied()
        }
    }

    #[test]
    fn test_finished_board_loses_for_side_to_move() {
        let board: Board = ".../.1./2.. 1".parse().unwrap();
        let mut a = RandomPlayer::new(Some(1));
        let mut b = RandomPlayer::new(Some(2));
        let outcome = play_match(board, &mut a, &mut b, 100.0);
        assert_eq!(outcome.winner, Player::Two);
        assert_eq!(outcome.termination, Termination::NoLegalMoves);
        assert!(outcome.history.is_empty());
    }

    #[test]
    fn test_illegal_move_forfeits() {
        let board: Board = "1../..X/..2 1".parse().unwrap();
        let mut cheat = Stubborn(Move::new(1, 1));
        let mut honest = RandomPlayer::new(Some(3));
        let outcome = play_match(board, &mut cheat, &mut honest, 100.0);
        assert_eq!(outcome.winner, Player::Two);
        assert_eq!(outcome.termination, Termination::IllegalMove);
    }

    #[test]
    fn test_timeout_forfeits() {
        let board = Board::new(5, 5).unwrap();
        let mut slow = Sleeper;
        let mut fast = RandomPlayer::new(Some(4));
        let outcome = play_match(board, &mut fast, &mut slow, 5.0);
        assert_eq!(outcome.winner, Player::One);
        assert_eq!(outcome.termination, Termination::Timeout);
        assert_eq!(outcome.history.len(), 1);
    }

    #[test]
    fn test_random_game_runs_to_completion() {
        let board = Board::new(5, 5).unwrap();
        let mut a = RandomPlayer::new(Some(5));
        let mut b = RandomPlayer::new(Some(6));
        let outcome = play_match(board, &mut a, &mut b, 100.0);
        assert_eq!(outcome.termination, Termination::NoLegalMoves);
        assert!(outcome.history.len() >= 2);
        assert!(outcome.final_board.is_loser(outcome.winner.opponent()));
    }

    #[test]
    fn test_config_validation() {
        assert!(TournamentConfig::default().validate().is_ok());
        let zero = TournamentConfig { num_matches: 0, ..Default::default() };
        assert_eq!(zero.validate(), Err(ConfigError::InvalidMatchCount));
        let no_time = TournamentConfig { time_limit_ms: 0.0, ..Default::default() };
        assert_eq!(no_time.validate(), Err(ConfigError::InvalidTimeLimit(0.0)));
        let huge = TournamentConfig { width: 9, ..Default::default() };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_default_roster() {
        let roster = default_cpu_agents(Some(1)).unwrap();
        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["Random", "MM_Open", "MM_Center", "MM_Improved", "AB_Open", "AB_Center", "AB_Improved"]
        );
    }

    #[test]
    fn test_searching_agent_never_times_out_against_roster() {
        let config = TournamentConfig {
            num_matches: 1,
            time_limit_ms: 50.0,
            width: 4,
            height: 4,
            seed: Some(21),
        };
        let agent = Agent::builder()
            .evaluator(Heuristic::REACH_DEFAULT)
            .seed(22)
            .build()
            .unwrap();
        let mut test = Entrant::new("Reach", agent);
        let mut roster = default_cpu_agents(Some(23)).unwrap();

        let result = play_round(&mut test, &mut roster, &config).unwrap();
        assert_eq!(result.total_games(), 14);
        assert_eq!(result.timeouts, 0);
    }

    #[test]
    fn test_round_counts_two_games_per_match() {
        let config = TournamentConfig {
            num_matches: 2,
            time_limit_ms: 50.0,
            width: 4,
            height: 4,
            seed: Some(9),
        };
        let mut test = Entrant::new("Random", RandomPlayer::new(Some(10)));
        let mut opponents = vec![
            Entrant::new("R1", RandomPlayer::new(Some(11))),
            Entrant::new("R2", RandomPlayer::new(Some(12))),
        ];
        let result = play_round(&mut test, &mut opponents, &config).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.total_games(), 8);
        assert!(result.win_rate() >= 0.0 && result.win_rate() <= 1.0);
        assert_eq!(result.timeouts, 0);
    }
}
