use std::fmt;

/// Row stride of the packed cell index. Boards are at most 8 wide.
pub const STRIDE: u8 = 8;

/// Maximum number of cells on any supported board.
pub const MAX_CELLS: usize = 64;

/// a cell on the board, addressed as (row, col) from the top-left corner.
///
/// Internally cells are packed as `row * 8 + col`, so a `Move` maps onto one
/// bit of a `BitBoard` regardless of the board's width.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Move {
    pub row: u8,
    pub col: u8,
}

impl Move {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < STRIDE && col < STRIDE);
        Move { row, col }
    }

    #[inline]
    pub fn from_index(index: u8) -> Self {
        debug_assert!((index as usize) < MAX_CELLS);
        Move {
            row: index / STRIDE,
            col: index % STRIDE,
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        (self.row * STRIDE + self.col) as usize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Formats an optional move, printing the `(-1, -1)` sentinel for "no move".
pub fn format_move(mv: Option<Move>) -> String {
    match mv {
        Some(m) => m.to_string(),
        None => "(-1, -1)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_zero() {
        assert_eq!(Move::new(0, 0).to_index(), 0);
    }

    #[test]
    fn test_stride_is_eight() {
        assert_eq!(Move::new(1, 0).to_index(), 8);
        assert_eq!(Move::new(6, 6).to_index(), 54);
    }

    #[test]
    fn test_index_roundtrip() {
        for i in 0..64u8 {
            assert_eq!(Move::from_index(i).to_index(), i as usize);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::new(2, 3).to_string(), "(2, 3)");
        assert_eq!(format_move(None), "(-1, -1)");
        assert_eq!(format_move(Some(Move::new(0, 1))), "(0, 1)");
    }
}

// `Move` doubles as the cell coordinate. Packing with a fixed stride of 8 (instead of the board
// width) lets every board size share one knight-jump table in `attacks`.
