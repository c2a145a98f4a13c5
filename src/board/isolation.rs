use std::fmt;
use std::str::FromStr;

use super::attacks::knight_jumps;
use super::bitboard::{BitBoard, EMPTY};
use super::coord::Move;
use super::{GameState, MoveList, Player};
use crate::error::BoardError;
use crate::types::{Score, DEFAULT_BOARD_SIZE, SCORE_INFINITY};

/// Isolation board. Copy
///
/// Both players move like chess knights; every cell a player lands on stays
/// blocked for the rest of the game. A player who has not moved yet may jump
/// to any open cell. The side to move with no legal move loses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: BitBoard,   // in-bounds cells
    blocked: BitBoard, // every cell ever occupied
    locations: [Option<Move>; 2],
    active: Player,
    move_count: u32,
}

impl Default for Board {
    /// Empty 7x7 board, player one to move.
    fn default() -> Self {
        Self::empty(DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE)
    }
}

impl Board {
    /// Empty `width` x `height` board with player one to move.
    pub fn new(width: u8, height: u8) -> Result<Self, BoardError> {
        if !(1..=8).contains(&width) || !(1..=8).contains(&height) {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Ok(Self::empty(width, height))
    }

    fn empty(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: BitBoard::rectangle(width, height),
            blocked: EMPTY,
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn blocked(&self) -> BitBoard {
        self.blocked
    }

    /// In-bounds cells nobody has occupied yet.
    #[inline]
    pub fn open_cells(&self) -> BitBoard {
        self.cells & !self.blocked
    }

    /// Destination set for `player`: any open cell before their first move,
    /// knight jumps onto open cells afterwards.
    #[inline]
    pub fn moves_bitboard(&self, player: Player) -> BitBoard {
        match self.locations[player.to_index()] {
            None => self.open_cells(),
            Some(loc) => knight_jumps(loc) & self.open_cells(),
        }
    }

    #[inline]
    pub fn has_moves(&self, player: Player) -> bool {
        !self.moves_bitboard(player).is_empty()
    }

    /// Check if `mv` is legal for the side to move.
    pub fn is_legal(&self, mv: Move) -> bool {
        mv.row < self.height && mv.col < self.width && self.moves_bitboard(self.active).contains(mv)
    }

    fn play(&mut self, player: Player, mv: Move) {
        self.blocked |= BitBoard::from_move(mv);
        self.locations[player.to_index()] = Some(mv);
        self.active = player.opponent();
        self.move_count += 1;
    }
}

impl GameState for Board {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves_for(&self, player: Player) -> MoveList {
        self.moves_bitboard(player).iter().collect()
    }

    /// Make move and return the resulting board. Does not validate legality
    fn forecast_move(&self, mv: Move) -> Board {
        self.forecast_move_for(self.active, mv)
    }

    fn forecast_move_for(&self, player: Player, mv: Move) -> Board {
        debug_assert!(self.cells.contains(mv));
        let mut b = *self;
        b.play(player, mv);
        b
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), BoardError> {
        if !self.is_legal(mv) {
            return Err(BoardError::IllegalMove(mv));
        }
        self.play(self.active, mv);
        Ok(())
    }

    fn utility(&self, player: Player) -> Score {
        if self.has_moves(self.active) {
            0.0
        } else if player == self.active {
            -SCORE_INFINITY
        } else {
            SCORE_INFINITY
        }
    }

    fn is_loser(&self, player: Player) -> bool {
        player == self.active && !self.has_moves(self.active)
    }

    fn is_winner(&self, player: Player) -> bool {
        player != self.active && !self.has_moves(self.active)
    }

    fn player_location(&self, player: Player) -> Option<Move> {
        self.locations[player.to_index()]
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.width, self.height)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parses `"<rows> <active>"`, rows top to bottom joined by `/`:
    /// `.` open, `X` blocked, `1`/`2` player locations; active is `1` or `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| BoardError::Parse {
            layout: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.split_whitespace();
        let grid = parts.next().ok_or_else(|| fail("empty layout"))?;
        let active = match parts.next() {
            Some("1") => Player::One,
            Some("2") => Player::Two,
            _ => return Err(fail("expected active player '1' or '2'")),
        };
        if parts.next().is_some() {
            return Err(fail("trailing fields"));
        }

        let rows: Vec<&str> = grid.split('/').collect();
        let height = rows.len();
        let width = rows[0].chars().count();
        if !(1..=8).contains(&height) || !(1..=8).contains(&width) {
            return Err(fail("board dimensions must be between 1 and 8"));
        }

        let mut board = Board::empty(width as u8, height as u8);
        board.active = active;
        for (r, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(fail("rows have different lengths"));
            }
            for (c, ch) in row.chars().enumerate() {
                let mv = Move::new(r as u8, c as u8);
                let player = match ch {
                    '.' => continue,
                    'X' => None,
                    '1' => Some(Player::One),
                    '2' => Some(Player::Two),
                    _ => return Err(fail("unknown cell character")),
                };
                if let Some(p) = player {
                    if board.locations[p.to_index()].is_some() {
                        return Err(fail("player placed twice"));
                    }
                    board.locations[p.to_index()] = Some(mv);
                }
                board.blocked |= BitBoard::from_move(mv);
            }
        }
        board.move_count = board.blocked.popcnt();
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.height {
            if r > 0 {
                write!(f, "/")?;
            }
            for c in 0..self.width {
                let mv = Move::new(r, c);
                let ch = if self.locations[0] == Some(mv) {
                    '1'
                } else if self.locations[1] == Some(mv) {
                    '2'
                } else if self.blocked.contains(mv) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
        }
        let active = match self.active {
            Player::One => '1',
            Player::Two => '2',
        };
        write!(f, " {}", active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_seven_by_seven() {
        let board = Board::default();
        assert_eq!(board.dimensions(), (7, 7));
        assert_eq!(board.active_player(), Player::One);
        assert_eq!(board.legal_moves().len(), 49);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Board::new(0, 5).is_err());
        assert!(Board::new(9, 5).is_err());
        assert!(Board::new(8, 8).is_ok());
    }

    #[test]
    fn test_first_move_anywhere_then_knight_jumps() {
        let mut board = Board::default();
        board.apply_move(Move::new(3, 3)).unwrap();
        // Player two still unplaced: every open cell except (3, 3)
        assert_eq!(board.legal_moves().len(), 48);
        board.apply_move(Move::new(0, 0)).unwrap();
        let moves = board.legal_moves_for(Player::One);
        assert_eq!(moves.len(), 8);
        assert!(moves.contains(&Move::new(1, 2)));
        assert!(moves.contains(&Move::new(5, 4)));
    }

    #[test]
    fn test_apply_illegal_move() {
        let mut board = Board::default();
        board.apply_move(Move::new(3, 3)).unwrap();
        assert_eq!(
            board.apply_move(Move::new(3, 3)),
            Err(BoardError::IllegalMove(Move::new(3, 3)))
        );
        assert!(board.apply_move(Move::new(7, 0)).is_err());
    }

    #[test]
    fn test_forecast_does_not_mutate() {
        let board = Board::default();
        let next = board.forecast_move(Move::new(2, 2));
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.player_location(Player::One), None);
        assert_eq!(next.player_location(Player::One), Some(Move::new(2, 2)));
        assert_eq!(next.active_player(), Player::Two);
    }

    #[test]
    fn test_forecast_for_inactive_player() {
        let board: Board = "1../.../..2 1".parse().unwrap();
        let next = board.forecast_move_for(Player::Two, Move::new(1, 0));
        assert_eq!(next.player_location(Player::Two), Some(Move::new(1, 0)));
        assert_eq!(next.active_player(), Player::One);
        assert!(next.blocked().contains(Move::new(1, 0)));
    }

    #[test]
    fn test_terminal_predicates() {
        // Player one at the center of a 3x3 board has no knight jumps
        let board: Board = ".../.1./2.. 1".parse().unwrap();
        assert!(board.is_loser(Player::One));
        assert!(board.is_winner(Player::Two));
        assert!(!board.is_winner(Player::One));
        assert_eq!(board.utility(Player::One), -SCORE_INFINITY);
        assert_eq!(board.utility(Player::Two), SCORE_INFINITY);
    }

    #[test]
    fn test_ongoing_utility_is_zero() {
        let board: Board = "1../.../..2 1".parse().unwrap();
        assert_eq!(board.utility(Player::One), 0.0);
        assert!(!board.is_loser(Player::One));
        assert!(!board.is_winner(Player::Two));
    }

    #[test]
    fn test_layout_roundtrip() {
        let layout = "1.X../..X../....2 2";
        let board: Board = layout.parse().unwrap();
        assert_eq!(board.to_string(), layout);
        assert_eq!(board.move_count(), 4);
        assert_eq!(board.dimensions(), (5, 3));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Board>().is_err());
        assert!("1../... 1".parse::<Board>().is_ok());
        assert!(".../.. 1".parse::<Board>().is_err());
        assert!("1../1.. 2".parse::<Board>().is_err());
        assert!(".../... 3".parse::<Board>().is_err());
        assert!(".?./... 1".parse::<Board>().is_err());

        match "1../1.. 2".parse::<Board>() {
            Err(BoardError::Parse { layout, reason }) => {
                assert_eq!(layout, "1../1.. 2");
                assert_eq!(reason, "player placed twice");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}

// Board is Copy (a handful of words), so forecasting a move is a plain struct copy plus three
// bit operations. Search never needs make/unmake.
