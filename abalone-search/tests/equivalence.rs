//! Cross-algorithm agreement on randomised small boards.
//!
//! All five engines implement the same game-theoretic value, so on any
//! position and depth their scores must agree exactly (pruning and
//! memoisation change the node count, never the value).

use abalone_core::{Board, Hex, Opening, Player};
use abalone_search::{Algorithm, SearchSession};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scatter a handful of marbles on a radius-2 board, at least one per side.
fn random_board(rng: &mut ChaCha8Rng) -> Board {
    let mut board = Board::empty(2, 0);
    let mut hexes: Vec<Hex> = board.hexes().collect();
    hexes.shuffle(rng);
    let whites = rng.gen_range(1..=4);
    let blacks = rng.gen_range(1..=4);
    for hex in hexes.drain(..whites) {
        board.set(hex, Some(Player::White));
    }
    for hex in hexes.drain(..blacks) {
        board.set(hex, Some(Player::Black));
    }
    board
}

fn scores_agree(a: f32, b: f32) -> bool {
    a == b || (a - b).abs() < 1e-4
}

#[test]
fn test_all_algorithms_agree_on_random_positions() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let algorithms = [
        Algorithm::Minimax,
        Algorithm::AlphaBeta,
        Algorithm::Pvs,
        Algorithm::AlphaBetaTable,
        Algorithm::PvsTable,
    ];
    for trial in 0..20 {
        let board = random_board(&mut rng);
        let side = if trial % 2 == 0 {
            Player::White
        } else {
            Player::Black
        };
        let mut session = SearchSession::with_seed(2, trial);
        let (reference, _) = session.evaluate(&board, 2, side, Algorithm::Minimax);
        for &algorithm in &algorithms[1..] {
            let (score, _) = session.evaluate(&board, 2, side, algorithm);
            assert!(
                scores_agree(reference, score),
                "trial {trial}: {algorithm:?} scored {score}, minimax scored {reference}\n{board}"
            );
        }
    }
}

#[test]
fn test_depth_three_agreement() {
    // Deeper search on a few boards, pruned engines only
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for trial in 0..5 {
        let board = random_board(&mut rng);
        let mut session = SearchSession::with_seed(2, trial);
        let (ab, _) = session.evaluate(&board, 3, Player::White, Algorithm::AlphaBeta);
        let (pvs, _) = session.evaluate(&board, 3, Player::White, Algorithm::Pvs);
        let (abt, _) = session.evaluate(&board, 3, Player::White, Algorithm::AlphaBetaTable);
        let (pvst, _) = session.evaluate(&board, 3, Player::White, Algorithm::PvsTable);
        assert!(scores_agree(ab, pvs), "pvs diverged: {ab} vs {pvs}\n{board}");
        assert!(scores_agree(ab, abt), "table alpha-beta diverged: {ab} vs {abt}\n{board}");
        assert!(scores_agree(ab, pvst), "table pvs diverged: {ab} vs {pvst}\n{board}");
    }
}

#[test]
fn test_standard_opening_is_undecided() {
    let board = Opening::Standard.board();
    let mut session = SearchSession::new(4);
    for algorithm in [Algorithm::AlphaBeta, Algorithm::Pvs, Algorithm::PvsTable] {
        let (score, best) = session.evaluate(&board, 2, Player::Black, algorithm);
        assert!(score.is_finite(), "{algorithm:?} called the opening decided");
        assert!(best.is_some());
    }
}

#[test]
fn test_zobrist_has_no_collisions_over_random_occupancies() {
    use rustc_hash::FxHashMap;

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let zobrist = abalone_search::Zobrist::new(4, &mut rng);
    let template = Board::empty(4, 0);
    let hexes: Vec<Hex> = template.hexes().collect();

    let mut seen: FxHashMap<u64, Vec<(Hex, Player)>> = FxHashMap::default();
    for _ in 0..10_000 {
        let mut board = Board::empty(4, 0);
        let mut shuffled = hexes.clone();
        shuffled.shuffle(&mut rng);
        let count = rng.gen_range(2..=16);
        for &hex in &shuffled[..count] {
            let side = if rng.gen_bool(0.5) {
                Player::White
            } else {
                Player::Black
            };
            board.set(hex, Some(side));
        }
        let occupancy: Vec<(Hex, Player)> = board.occupied().collect();
        let hash = zobrist.hash(&board);
        if let Some(previous) = seen.get(&hash) {
            assert_eq!(previous, &occupancy, "two boards share hash {hash}");
        } else {
            seen.insert(hash, occupancy);
        }
    }
}
