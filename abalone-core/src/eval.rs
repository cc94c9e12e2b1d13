//! Static position evaluation

use crate::board::{Board, Player};

/// Centre-proximity gap beyond which cohesion starts to matter
const COHESION_GAP: f32 = 2.0;

/// Centre-proximity gap under which material dominates
const MATERIAL_GAP: f32 = 1.8;

/// Weight of a captured marble
const MATERIAL_WEIGHT: f32 = 100.0;

/// Score a position from `side`'s perspective.
///
/// Three terms, gated so correlated signals are not double counted:
/// - centre proximity: how much closer to the centre our marbles sit;
/// - cohesion: fewer connected groups than the opponent, counted only when
///   the proximity gap is already large;
/// - material: marble difference, heavily weighted, counted only while the
///   position is close to balanced.
///
/// The function is exactly antisymmetric: `heuristic(b, s) ==
/// -heuristic(b, s.opponent())`, which lets negamax-style search reuse it.
pub fn heuristic(board: &Board, side: Player) -> f32 {
    let opponent = side.opponent();
    let gap = board.center_proximity(opponent) - board.center_proximity(side);

    let mut score = gap;

    if gap.abs() > COHESION_GAP {
        score += board.populations(opponent).len() as f32 - board.populations(side).len() as f32;
    }

    if gap.abs() < MATERIAL_GAP {
        score += MATERIAL_WEIGHT
            * (board.marbles(side) as f32 - board.marbles(opponent) as f32);
    }

    score
}
