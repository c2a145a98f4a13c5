use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{BitBoard, GameState, MoveList, Player};
use crate::types::{Score, SCORE_INFINITY};

/// Scores a position from `player`'s point of view.
///
/// Implementations must be pure: no interior state, nothing read besides the
/// game and their own parameters.
pub trait Evaluator<G: GameState> {
    fn evaluate(&self, game: &G, player: Player) -> Score;
}

impl<G, F> Evaluator<G> for F
where
    G: GameState,
    F: Fn(&G, Player) -> Score,
{
    fn evaluate(&self, game: &G, player: Player) -> Score {
        self(game, player)
    }
}

/// Weights of the four mobility terms.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Weights {
    pub own_moves: f64,
    pub opp_moves: f64,
    pub own_reach: f64,
    pub opp_reach: f64,
}

/// Stateless heuristic with its weights baked in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Heuristic {
    /// `own*|M_p| - opp*|M_o| + own_reach*|R_p| - opp_reach*|R_o|`
    Weighted(Weights),
    /// Moves plus distinct two-ply reach: `a*|M_p| + c*|R_p| - b*|M_o| - d*|R_o|`
    Reach { a: f64, b: f64, c: f64, d: f64 },
    /// Moves plus summed follow-up mobility:
    /// `a*|M_p| + b*sum(|M_p after m|) - c*sum(|M_o after m|)`
    Lookahead { a: f64, b: f64, c: f64 },
    /// `a*|M_p| - b*|M_o|`
    Mobility { a: f64, b: f64 },
    /// `|M_p|`
    OpenMove,
    /// `|M_p| - |M_o|`
    Improved,
    /// Squared distance from the board center
    Center,
}

impl Heuristic {
    pub const REACH_DEFAULT: Heuristic = Heuristic::Reach { a: 3.0, b: 2.0, c: 1.0, d: 1.0 };
    pub const LOOKAHEAD_DEFAULT: Heuristic = Heuristic::Lookahead { a: 1.0, b: 1.0, c: 1.0 };
    pub const MOBILITY_DEFAULT: Heuristic = Heuristic::Mobility { a: 2.0, b: 3.0 };
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::REACH_DEFAULT
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Weighted(w) => write!(
                f,
                "Weighted(own={}, opp={}, own_reach={}, opp_reach={})",
                w.own_moves, w.opp_moves, w.own_reach, w.opp_reach
            ),
            Heuristic::Reach { a, b, c, d } => write!(f, "Reach(a={a}, b={b}, c={c}, d={d})"),
            Heuristic::Lookahead { a, b, c } => write!(f, "Lookahead(a={a}, b={b}, c={c})"),
            Heuristic::Mobility { a, b } => write!(f, "Mobility(a={a}, b={b})"),
            Heuristic::OpenMove => write!(f, "OpenMove"),
            Heuristic::Improved => write!(f, "Improved"),
            Heuristic::Center => write!(f, "Center"),
        }
    }
}

impl<G: GameState> Evaluator<G> for Heuristic {
    fn evaluate(&self, game: &G, player: Player) -> Score {
        let opp = game.opponent(player);
        let own_moves = game.legal_moves_for(player);
        let opp_moves = game.legal_moves_for(opp);

        if let Some(score) = terminal_score(game, player, &own_moves, &opp_moves) {
            return score;
        }

        let own = own_moves.len() as f64;
        let theirs = opp_moves.len() as f64;
        match *self {
            Heuristic::Weighted(w) => weighted(game, player, &own_moves, &opp_moves, &w),
            Heuristic::Reach { a, b, c, d } => {
                let w = Weights { own_moves: a, opp_moves: b, own_reach: c, opp_reach: d };
                weighted(game, player, &own_moves, &opp_moves, &w)
            }
            Heuristic::Lookahead { a, b, c } => {
                let next_own = follow_up_mobility(game, player, &own_moves) as f64;
                let next_opp = follow_up_mobility(game, opp, &opp_moves) as f64;
                a * own + b * next_own - c * next_opp
            }
            Heuristic::Mobility { a, b } => a * own - b * theirs,
            Heuristic::OpenMove => own,
            Heuristic::Improved => own - theirs,
            Heuristic::Center => center_distance(game, player),
        }
    }
}

/// Four-term weighted evaluation of `game` from `player`'s perspective.
pub fn evaluate<G: GameState>(game: &G, player: Player, weights: &Weights) -> Score {
    Heuristic::Weighted(*weights).evaluate(game, player)
}

/// Win/loss value shared by every heuristic. A decided game is scored first;
/// otherwise a side without moves is lost, checking `player` before the
/// opponent.
fn terminal_score<G: GameState>(
    game: &G,
    player: Player,
    own_moves: &MoveList,
    opp_moves: &MoveList,
) -> Option<Score> {
    if game.is_loser(player) {
        Some(-SCORE_INFINITY)
    } else if game.is_winner(player) {
        Some(SCORE_INFINITY)
    } else if own_moves.is_empty() {
        Some(-SCORE_INFINITY)
    } else if opp_moves.is_empty() {
        Some(SCORE_INFINITY)
    } else {
        None
    }
}

fn weighted<G: GameState>(
    game: &G,
    player: Player,
    own_moves: &MoveList,
    opp_moves: &MoveList,
    w: &Weights,
) -> Score {
    let mut score = w.own_moves * own_moves.len() as f64 - w.opp_moves * opp_moves.len() as f64;
    // two-ply terms are the expensive part; skip them when unweighted
    if w.own_reach != 0.0 {
        score += w.own_reach * two_ply_reach(game, player, own_moves) as f64;
    }
    if w.opp_reach != 0.0 {
        score -= w.opp_reach * two_ply_reach(game, game.opponent(player), opp_moves) as f64;
    }
    score
}

/// Number of distinct cells `player` can land on with two consecutive moves.
pub fn two_ply_reach<G: GameState>(game: &G, player: Player, moves: &MoveList) -> u32 {
    let mut reached = BitBoard::default();
    for &mv in moves {
        for next in game.forecast_move_for(player, mv).legal_moves_for(player) {
            reached |= BitBoard::from_move(next);
        }
    }
    reached.popcnt()
}

/// Sum over `player`'s moves of the mobility left after making that move.
pub fn follow_up_mobility<G: GameState>(game: &G, player: Player, moves: &MoveList) -> usize {
    moves
        .iter()
        .map(|&mv| game.forecast_move_for(player, mv).legal_moves_for(player).len())
        .sum()
}

fn center_distance<G: GameState>(game: &G, player: Player) -> Score {
    let Some(loc) = game.player_location(player) else {
        return 0.0;
    };
    let (width, height) = game.dimensions();
    let w = width as f64 / 2.0;
    let h = height as f64 / 2.0;
    let y = loc.row as f64;
    let x = loc.col as f64;
    (h - y).powi(2) + (w - x).powi(2)
}


// All heuristics share one terminal rule so search sees identical infinities no matter which
// evaluator the agent was built with.
//
// "Reach" counts distinct two-move destinations; "Lookahead" sums follow-up mobility and so
// double-counts cells reachable through several first moves.
