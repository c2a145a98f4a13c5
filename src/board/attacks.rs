use super::bitboard::BitBoard;
use super::coord::Move;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// Knight jumps from every cell of an 8x8 grid. Smaller boards mask the result
/// with their own cell set.
static KNIGHT_JUMPS: [BitBoard; 64] = init_knight_jumps();

const fn init_knight_jumps() -> [BitBoard; 64] {
    let mut table = [BitBoard(0); 64];
    let mut sq = 0;
    while sq < 64 {
        let r = (sq / 8) as i8;
        let c = (sq % 8) as i8;
        let mut bb = 0u64;
        let mut i = 0;
        while i < KNIGHT_OFFSETS.len() {
            let (dr, dc) = KNIGHT_OFFSETS[i];
            let nr = r + dr;
            let nc = c + dc;
            if nr >= 0 && nr < 8 && nc >= 0 && nc < 8 {
                bb |= 1u64 << ((nr * 8 + nc) as u32);
            }
            i += 1;
        }
        table[sq] = BitBoard(bb);
        sq += 1;
    }
    table
}

#[inline]
pub fn knight_jumps(from: Move) -> BitBoard {
    KNIGHT_JUMPS[from.to_index()]
}
