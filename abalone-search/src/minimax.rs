//! Depth-limited minimax, alpha-beta and principal variation search
//!
//! All three share the same contract: `(board, depth, side) -> (score,
//! best move)`. Minimax and alpha-beta score from the root side's absolute
//! frame; PVS is negamax, negating once per ply. A position already decided
//! for the root (resp. its opponent) scores +inf (resp. -inf) before the
//! depth cutoff is considered. Ties keep the first move found.

use crate::SearchStats;
use abalone_core::{heuristic, Board, Move, Player};

/// Exhaustive depth-limited minimax, no pruning.
pub fn minimax(
    board: &Board,
    depth: u32,
    to_move: Player,
    root: Player,
    stats: &mut SearchStats,
) -> (f32, Option<Move>) {
    if board.check_win(root) {
        return (f32::INFINITY, None);
    }
    if board.check_win(root.opponent()) {
        return (f32::NEG_INFINITY, None);
    }
    if depth == 0 {
        return (heuristic(board, root), None);
    }

    let maximizing = to_move == root;
    let mut best = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    let mut best_move = None;

    for mv in board.moves(to_move) {
        stats.nodes += 1;
        let mut child = board.clone();
        if child.apply(&mv).is_err() {
            continue;
        }
        let (score, _) = minimax(&child, depth - 1, to_move.opponent(), root, stats);
        let better = if maximizing { score > best } else { score < best };
        if better {
            best = score;
            best_move = Some(mv);
        }
    }

    (best, best_move)
}

/// Alpha-beta pruned minimax. Same traversal and scores as [`minimax`];
/// remaining siblings are pruned once the window closes.
pub fn alphabeta(
    board: &Board,
    depth: u32,
    to_move: Player,
    root: Player,
    mut alpha: f32,
    mut beta: f32,
    stats: &mut SearchStats,
) -> (f32, Option<Move>) {
    if board.check_win(root) {
        return (f32::INFINITY, None);
    }
    if board.check_win(root.opponent()) {
        return (f32::NEG_INFINITY, None);
    }
    if depth == 0 {
        return (heuristic(board, root), None);
    }

    let maximizing = to_move == root;
    let mut best = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    let mut best_move = None;

    for mv in board.moves(to_move) {
        stats.nodes += 1;
        let mut child = board.clone();
        if child.apply(&mv).is_err() {
            continue;
        }
        let (score, _) = alphabeta(
            &child,
            depth - 1,
            to_move.opponent(),
            root,
            alpha,
            beta,
            stats,
        );
        let better = if maximizing { score > best } else { score < best };
        if better {
            best = score;
            best_move = Some(mv);
        }
        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if alpha >= beta {
            break;
        }
    }

    (best, best_move)
}

/// Principal variation search in negamax form.
///
/// The first successor is searched with the full window; the rest get a
/// minimal window around alpha as a fail test and are re-searched with the
/// full window only when the test lands strictly inside (alpha, beta).
pub fn pvs(
    board: &Board,
    depth: u32,
    to_move: Player,
    mut alpha: f32,
    beta: f32,
    stats: &mut SearchStats,
) -> (f32, Option<Move>) {
    if board.check_win(to_move) {
        return (f32::INFINITY, None);
    }
    if board.check_win(to_move.opponent()) {
        return (f32::NEG_INFINITY, None);
    }
    if depth == 0 {
        return (heuristic(board, to_move), None);
    }

    let mut best = f32::NEG_INFINITY;
    let mut best_move = None;

    for (idx, mv) in board.moves(to_move).enumerate() {
        stats.nodes += 1;
        let mut child = board.clone();
        if child.apply(&mv).is_err() {
            continue;
        }

        let opponent = to_move.opponent();
        let score = if idx == 0 {
            -pvs(&child, depth - 1, opponent, -beta, -alpha, stats).0
        } else {
            let mut probe =
                -pvs(&child, depth - 1, opponent, -alpha - 1.0, -alpha, stats).0;
            if alpha < probe && probe < beta {
                probe = -pvs(&child, depth - 1, opponent, -beta, -probe, stats).0;
            }
            probe
        };

        if score > best {
            best = score;
            best_move = Some(mv);
        }
        alpha = alpha.max(best);
        if alpha >= beta {
            break;
        }
    }

    (best, best_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{Hex, Opening};

    fn stats() -> SearchStats {
        SearchStats::default()
    }

    fn capture_position() -> Board {
        // Three white facing two black with the edge right behind: white to
        // move can shove a black marble off the board, and with threshold 1
        // that single capture wins the game.
        let mut board = Board::empty(4, 1);
        board.set(Hex::new(0, 0), Some(Player::White));
        board.set(Hex::new(1, 0), Some(Player::White));
        board.set(Hex::new(2, 0), Some(Player::White));
        board.set(Hex::new(3, 0), Some(Player::Black));
        board.set(Hex::new(4, 0), Some(Player::Black));
        board
    }

    #[test]
    fn test_minimax_finds_winning_push() {
        let board = capture_position();
        let (score, mv) = minimax(&board, 1, Player::White, Player::White, &mut stats());
        assert_eq!(score, f32::INFINITY);
        let mv = mv.expect("a legal move exists");
        assert_eq!(mv.direction, (1, 0));
        assert_eq!(mv.block.len(), 3);
    }

    #[test]
    fn test_decided_position_scores_infinite() {
        let mut board = Board::empty(4, 0);
        board.set(Hex::new(0, 0), Some(Player::White));
        // Black has no marbles: white has already won
        let (score, mv) = minimax(&board, 3, Player::White, Player::White, &mut stats());
        assert_eq!(score, f32::INFINITY);
        assert!(mv.is_none());

        let (score, _) = alphabeta(
            &board,
            3,
            Player::Black,
            Player::Black,
            f32::NEG_INFINITY,
            f32::INFINITY,
            &mut stats(),
        );
        assert_eq!(score, f32::NEG_INFINITY);
    }

    #[test]
    fn test_opening_depth_two_is_finite() {
        let board = Opening::Standard.board();
        let (score, mv) = alphabeta(
            &board,
            2,
            Player::White,
            Player::White,
            f32::NEG_INFINITY,
            f32::INFINITY,
            &mut stats(),
        );
        assert!(score.is_finite(), "no side can be eliminated at depth 2");
        assert!(mv.is_some());
    }

    #[test]
    fn test_alphabeta_prunes() {
        let board = Opening::Mini.board();
        let mut plain = stats();
        let mut pruned = stats();
        let (a, _) = minimax(&board, 2, Player::White, Player::White, &mut plain);
        let (b, _) = alphabeta(
            &board,
            2,
            Player::White,
            Player::White,
            f32::NEG_INFINITY,
            f32::INFINITY,
            &mut pruned,
        );
        assert_eq!(a, b);
        assert!(pruned.nodes < plain.nodes);
    }
}
