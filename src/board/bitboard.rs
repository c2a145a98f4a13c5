use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use super::coord::Move;

/// Bitboard is a set of cells represented as a 64-bit integer.
/// Bit `row * 8 + col` corresponds to cell (row, col).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct BitBoard(pub u64);

/// empty bitboard.
pub const EMPTY: BitBoard = BitBoard(0);

impl BitBoard {
    /// create a bitboard with a single cell set.
    #[inline]
    pub fn from_move(mv: Move) -> Self {
        BitBoard(1u64 << mv.to_index())
    }

    /// all cells of a `width` x `height` board.
    pub fn rectangle(width: u8, height: u8) -> Self {
        let row_mask = if width >= 8 { 0xFF } else { (1u64 << width) - 1 };
        let mut bb = 0u64;
        for row in 0..height {
            bb |= row_mask << (row * 8);
        }
        BitBoard(bb)
    }

    /// population count (number of set bits).
    #[inline]
    pub fn popcnt(self) -> u32 {
        self.0.count_ones()
    }

    /// returns true if no bits are set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, mv: Move) -> bool {
        !(self & BitBoard::from_move(mv)).is_empty()
    }

    /// iterate over set cells in ascending index order.
    #[inline]
    pub fn iter(self) -> BitBoardIter {
        BitBoardIter(self.0)
    }
}

/// iterator over the set bits of a BitBoard.
pub struct BitBoardIter(u64);

impl Iterator for BitBoardIter {
    type Item = Move;

    #[inline]
    fn next(&mut self) -> Option<Move> {
        if self.0 == 0 {
            None
        } else {
            let idx = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1; // clear lowest set bit
            Some(Move::from_index(idx))
        }
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;
    #[inline]
    fn bitand(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 & rhs.0)
    }
}

impl BitAndAssign for BitBoard {
    #[inline]
    fn bitand_assign(&mut self, rhs: BitBoard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;
    #[inline]
    fn bitor(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 | rhs.0)
    }
}

impl BitOrAssign for BitBoard {
    #[inline]
    fn bitor_assign(&mut self, rhs: BitBoard) {
        self.0 |= rhs.0;
    }
}

impl Not for BitBoard {
    type Output = BitBoard;
    #[inline]
    fn not(self) -> BitBoard {
        BitBoard(!self.0)
    }
}
