use std::str::FromStr;
use isolation::board::{Board, Player};
use isolation::evaluation::{Evaluator, Heuristic};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_evaluation(c: &mut Criterion) {
    let positions = vec![
        ("opening", Board::from_str("......./......./....2../...1.../......./......./....... 1").unwrap()),
        ("middlegame", Board::from_str("..X..../.X..X../...1.X./..X.2../X....../.X...X./....X.. 1").unwrap()),
        ("endgame", Board::from_str("XX.XX.X/X.XXX.X/.XX1X.X/XX.X2XX/X.XX.XX/XXX.XX./X.XXXXX 2").unwrap()),
    ];
    let heuristics = [
        ("reach", Heuristic::REACH_DEFAULT),
        ("lookahead", Heuristic::LOOKAHEAD_DEFAULT),
        ("mobility", Heuristic::MOBILITY_DEFAULT),
    ];
    for (name, board) in &positions {
        for (h_name, h) in &heuristics {
            c.bench_function(&format!("eval_{}_{}", h_name, name), |b| {
                b.iter(|| h.evaluate(board, Player::One))
            });
        }
    }
}

criterion_group!(benches, bench_evaluation);
criterion_main!(benches);
