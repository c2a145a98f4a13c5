use std::fs;
use std::path::Path;

use isolation::agent::{Agent, Strategy};
use isolation::board::{Board, GameState, Move};
use isolation::evaluation::Heuristic;
use isolation::types::SCORE_INFINITY;

/// Parse a suite line: "<layout> <active> bm <r,c> [<r,c> ...]; id "<name>";"
fn parse_suite_line(line: &str) -> Option<(String, Vec<Move>, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let bm_idx = line.find(" bm ")?;
    let layout = line[..bm_idx].to_string();
    let rest = &line[bm_idx + 4..];

    let semi_idx = rest.find(';')?;
    let mut best_moves = Vec::new();
    for cell in rest[..semi_idx].split_whitespace() {
        let (r, c) = cell.split_once(',')?;
        best_moves.push(Move::new(r.parse().ok()?, c.parse().ok()?));
    }

    let id = rest
        .find("id \"")
        .and_then(|start| {
            let content = &rest[start + 4..];
            content.find('"').map(|end| content[..end].to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    Some((layout, best_moves, id))
}

fn load_suite() -> Vec<(Board, Vec<Move>, String)> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/tactics.txt");
    let content = fs::read_to_string(&path).expect("Could not read tests/tactics.txt");
    content
        .lines()
        .filter_map(parse_suite_line)
        .map(|(layout, best, id)| {
            let board = layout
                .parse()
                .unwrap_or_else(|e| panic!("{id}: invalid layout {layout}: {e}"));
            (board, best, id)
        })
        .collect()
}

fn unlimited() -> f64 {
    f64::INFINITY
}

#[test]
fn test_iterative_deepening_finds_winning_moves() {
    let suite = load_suite();
    assert_eq!(suite.len(), 12, "Expected 12 suite positions");

    for heuristic in [
        Heuristic::REACH_DEFAULT,
        Heuristic::LOOKAHEAD_DEFAULT,
        Heuristic::MOBILITY_DEFAULT,
        Heuristic::Improved,
    ] {
        for (board, best, id) in &suite {
            let mut agent = Agent::builder()
                .evaluator(heuristic)
                .strategy(Strategy::IterativeDeepening)
                .build()
                .unwrap();
            let mv = agent.choose_move(board, &unlimited);
            assert!(
                mv.is_some_and(|mv| best.contains(&mv)),
                "{id} with {heuristic}: played {mv:?}, expected one of {best:?}"
            );
            assert_eq!(agent.last_search().unwrap().score, SCORE_INFINITY, "{id}");
        }
    }
}

#[test]
fn test_exhaustive_minimax_picks_first_winning_move() {
    for (board, best, id) in load_suite() {
        let mut agent = Agent::builder()
            .evaluator(Heuristic::OpenMove)
            .strategy(Strategy::Minimax)
            .search_depth(32)
            .build()
            .unwrap();
        assert_eq!(agent.choose_move(&board, &unlimited), best.first().copied(), "{id}");
    }
}

#[test]
fn test_suite_moves_are_legal() {
    for (board, best, id) in load_suite() {
        let legal = board.legal_moves();
        assert!(best.len() < legal.len(), "{id}: every move wins");
        for mv in best {
            assert!(legal.contains(&mv), "{id}: {mv} is not legal");
        }
    }
}

#[test]
fn test_suite_parser() {
    let line = "..X../X.1.X/.2X../.X.X. 1 bm 0,4 2,0 2,4; id \"ISO.08\";";
    let (layout, moves, id) = parse_suite_line(line).unwrap();
    assert_eq!(layout, "..X../X.1.X/.2X../.X.X. 1");
    assert_eq!(moves, vec![Move::new(0, 4), Move::new(2, 0), Move::new(2, 4)]);
    assert_eq!(id, "ISO.08");
}
