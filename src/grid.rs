//! Exhaustive parameter search for the three tunable heuristic families.
//!
//! Each lattice point becomes an iterative-deepening agent that plays a full
//! round against the standard roster; the point with the most wins is
//! reported.

use indicatif::ProgressBar;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Strategy};
use crate::error::ConfigError;
use crate::evaluation::Heuristic;
use crate::tournament::{default_cpu_agents, play_round, Entrant, TournamentConfig};
use crate::types::DEFAULT_TIMER_THRESHOLD_MS;

/// A heuristic family with integer-valued parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// `Reach { a, b, c, d }`, a and b in 1..=9, c and d in 1..=4
    Fn1,
    /// `Lookahead { a, b, c }`, a and b in 1..=9, c in 1..=4
    Fn2,
    /// `Mobility { a, b }`, a and b in 1..=9
    Fn3,
}

impl Family {
    /// Every parameter combination, first parameter varying slowest.
    pub fn lattice(self) -> Vec<Heuristic> {
        let wide = 1..=9u32;
        let narrow = 1..=4u32;
        let mut points = Vec::new();
        for a in wide.clone() {
            for b in wide.clone() {
                let (a, b) = (a as f64, b as f64);
                match self {
                    Family::Fn1 => {
                        for c in narrow.clone() {
                            for d in narrow.clone() {
                                points.push(Heuristic::Reach { a, b, c: c as f64, d: d as f64 });
                            }
                        }
                    }
                    Family::Fn2 => {
                        for c in narrow.clone() {
                            points.push(Heuristic::Lookahead { a, b, c: c as f64 });
                        }
                    }
                    Family::Fn3 => points.push(Heuristic::Mobility { a, b }),
                }
            }
        }
        points
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub heuristic: Heuristic,
    pub wins: u32,
    pub games: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridReport {
    pub points: Vec<GridPoint>,
    /// Most wins; the earliest lattice point wins ties.
    pub best: Option<GridPoint>,
}

impl GridReport {
    fn from_points(points: Vec<GridPoint>) -> Self {
        let mut best: Option<GridPoint> = None;
        for &point in &points {
            if best.is_none_or(|b| point.wins > b.wins) {
                best = Some(point);
            }
        }
        Self { points, best }
    }
}

/// Plays one round for `heuristic` and returns its win count.
///
/// Every call builds its own roster and boards, so points can be evaluated on
/// separate threads.
pub fn evaluate_point(
    heuristic: Heuristic,
    config: &TournamentConfig,
) -> Result<GridPoint, ConfigError> {
    let mut builder = Agent::builder()
        .evaluator(heuristic)
        .strategy(Strategy::IterativeDeepening)
        .timer_threshold_ms(DEFAULT_TIMER_THRESHOLD_MS);
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }
    let mut test = Entrant::new(heuristic.to_string(), builder.build()?);
    let mut roster = default_cpu_agents(config.seed)?;

    let round = play_round(&mut test, &mut roster, config)?;
    Ok(GridPoint {
        heuristic,
        wins: round.total_wins(),
        games: round.total_games(),
    })
}

/// Which family to tune and how each point is played.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub family: Family,
    pub tournament: TournamentConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            family: Family::Fn1,
            tournament: TournamentConfig::default(),
        }
    }
}

/// Runs the whole lattice of `config.family`.
pub fn grid_search(config: &GridConfig, progress: &ProgressBar) -> Result<GridReport, ConfigError> {
    info!("{:?}: {} points", config.family, config.family.lattice().len());
    search_lattice(&config.family.lattice(), &config.tournament, progress)
}

/// Evaluates every point of `lattice` in parallel on the current rayon pool.
pub fn search_lattice(
    lattice: &[Heuristic],
    config: &TournamentConfig,
    progress: &ProgressBar,
) -> Result<GridReport, ConfigError> {
    config.validate()?;
    progress.set_length(lattice.len() as u64);

    let points = lattice
        .par_iter()
        .map(|&heuristic| {
            let point = evaluate_point(heuristic, config);
            progress.inc(1);
            point
        })
        .collect::<Result<Vec<_>, _>>()?;
    progress.finish();

    let report = GridReport::from_points(points);
    if let Some(best) = report.best {
        info!("best {}: {}/{} wins", best.heuristic, best.wins, best.games);
    }
    Ok(report)
}
