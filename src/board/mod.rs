mod attacks;
mod bitboard;
mod coord;
mod isolation;

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::types::Score;

pub use bitboard::{BitBoard, EMPTY};
pub use coord::{format_move, Move, MAX_CELLS};
pub use isolation::Board;

/// Legal moves of one player. Never larger than the number of cells.
pub type MoveList = ArrayVec<Move, MAX_CELLS>;

/// One of the two sides of a game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Capabilities the search and the evaluators need from a game state.
///
/// Search code is written against this trait only. Implementations must make
/// `forecast_move` and `forecast_move_for` pure: the returned state shares
/// nothing with `self`, so sibling branches never observe each other.
pub trait GameState: Clone {
    /// The side whose turn it is.
    fn active_player(&self) -> Player;

    /// Legal moves for `player`, in a fixed enumeration order.
    fn legal_moves_for(&self, player: Player) -> MoveList;

    /// Legal moves for the side to move.
    fn legal_moves(&self) -> MoveList {
        self.legal_moves_for(self.active_player())
    }

    /// Successor state after the active player plays `mv`.
    fn forecast_move(&self, mv: Move) -> Self;

    /// Successor state in which `player` has played `mv`, whether or not it
    /// was their turn. The other side is to move afterwards.
    fn forecast_move_for(&self, player: Player, mv: Move) -> Self;

    /// Plays `mv` for the active player in place.
    fn apply_move(&mut self, mv: Move) -> Result<(), BoardError>;

    /// `-INFINITY` if `player` has lost, `INFINITY` if they have won, else 0.
    fn utility(&self, player: Player) -> Score;

    fn is_loser(&self, player: Player) -> bool;

    fn is_winner(&self, player: Player) -> bool;

    fn opponent(&self, player: Player) -> Player {
        player.opponent()
    }

    /// Cell currently occupied by `player`, if they have moved at all.
    fn player_location(&self, player: Player) -> Option<Move>;

    /// `(width, height)` in cells.
    fn dimensions(&self) -> (u8, u8);
}
