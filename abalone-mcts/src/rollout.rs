//! Random playout (simulation) phase
//!
//! Playouts restrict each ply to a randomly drawn block length before
//! falling back to the full move set. That keeps per-ply generation cheap
//! while still visiting singleton, pair and triple moves over a playout.

use abalone_core::{Board, Move, Player, GROUP_LENGTHS};
use rand::prelude::*;

use crate::tree::winner_of;

/// Play random moves from `board` with `to_move` to play until one side wins
/// or `max_depth` plies have passed. Returns the winner, or None for an
/// undecided playout.
pub fn rollout<R: Rng>(board: &Board, to_move: Player, max_depth: u32, rng: &mut R) -> Option<Player> {
    let mut current = board.clone();
    let mut side = to_move;

    for _ in 0..max_depth {
        if let Some(winner) = winner_of(&current) {
            return Some(winner);
        }
        let mv = match random_move(&current, side, rng) {
            Some(mv) => mv,
            None => return None,
        };
        if current.apply(&mv).is_err() {
            return None;
        }
        side = side.opponent();
    }

    winner_of(&current)
}

/// Draw one move: pick a block length at random, and widen to all lengths
/// only when that length has no legal move.
fn random_move<R: Rng>(board: &Board, side: Player, rng: &mut R) -> Option<Move> {
    let length = *GROUP_LENGTHS.choose(rng)?;
    let narrowed: Vec<Move> = board.moves_with_lengths(side, &[length]).collect();
    if !narrowed.is_empty() {
        return narrowed.into_iter().choose(rng);
    }
    let all: Vec<Move> = board.moves(side).collect();
    all.into_iter().choose(rng)
}
