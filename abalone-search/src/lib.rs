//! Abalone Search - minimax-family engines
//!
//! Five interchangeable algorithms over the rules layer: plain minimax,
//! alpha-beta, principal variation search, and transposition-table variants
//! of the latter two. A [`SearchSession`] owns the mutable machinery (RNG,
//! Zobrist keys, transposition table, node counter); [`SearchSession::evaluate`]
//! is the single entry point and resets that state per call, so two sessions
//! with the same seed produce identical results.

pub mod minimax;
pub mod table;

use abalone_core::{Board, Move, Player};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

pub use minimax::{alphabeta, minimax, pvs};
pub use table::{Bound, TtEntry, Zobrist};

const DEFAULT_SEED: u64 = 42;

/// Which engine [`SearchSession::evaluate`] dispatches to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
    Pvs,
    AlphaBetaTable,
    PvsTable,
}

/// Counters accumulated over one evaluation
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Successor positions visited
    pub nodes: u64,
}

/// Reusable search state for one board radius.
pub struct SearchSession {
    radius: i8,
    rng: ChaCha8Rng,
    zobrist: Zobrist,
    table: FxHashMap<u64, TtEntry>,
    stats: SearchStats,
}

impl SearchSession {
    pub fn new(radius: i8) -> Self {
        Self::with_seed(radius, DEFAULT_SEED)
    }

    pub fn with_seed(radius: i8, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let zobrist = Zobrist::new(radius, &mut rng);
        Self {
            radius,
            rng,
            zobrist,
            table: FxHashMap::default(),
            stats: SearchStats::default(),
        }
    }

    /// Run one search from `board` with `side` to move, returning the score
    /// (from `side`'s point of view) and the chosen move, if any exists.
    ///
    /// The transposition table is cleared and the Zobrist keys are redrawn at
    /// every call; entries never leak between evaluations.
    pub fn evaluate(
        &mut self,
        board: &Board,
        depth: u32,
        side: Player,
        algorithm: Algorithm,
    ) -> (f32, Option<Move>) {
        self.zobrist = Zobrist::new(self.radius, &mut self.rng);
        self.table.clear();
        self.stats = SearchStats::default();

        let (score, best) = match algorithm {
            Algorithm::Minimax => minimax(board, depth, side, side, &mut self.stats),
            Algorithm::AlphaBeta => alphabeta(
                board,
                depth,
                side,
                side,
                f32::NEG_INFINITY,
                f32::INFINITY,
                &mut self.stats,
            ),
            Algorithm::Pvs => pvs(
                board,
                depth,
                side,
                f32::NEG_INFINITY,
                f32::INFINITY,
                &mut self.stats,
            ),
            Algorithm::AlphaBetaTable => self.alphabeta_table(
                board,
                depth,
                side,
                side,
                f32::NEG_INFINITY,
                f32::INFINITY,
            ),
            Algorithm::PvsTable => {
                self.pvs_table(board, depth, side, f32::NEG_INFINITY, f32::INFINITY)
            }
        };

        tracing::debug!(
            ?algorithm,
            depth,
            nodes = self.stats.nodes,
            entries = self.table.len(),
            score,
            "search finished"
        );
        (score, best)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::Opening;

    #[test]
    fn test_same_seed_same_result() {
        let board = Opening::Mini.board();
        let mut a = SearchSession::with_seed(4, 5);
        let mut b = SearchSession::with_seed(4, 5);
        let ra = a.evaluate(&board, 2, Player::White, Algorithm::PvsTable);
        let rb = b.evaluate(&board, 2, Player::White, Algorithm::PvsTable);
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_evaluate_resets_state() {
        let board = Opening::Mini.board();
        let mut session = SearchSession::new(4);
        session.evaluate(&board, 2, Player::White, Algorithm::AlphaBetaTable);
        let first = session.stats().nodes;
        session.evaluate(&board, 2, Player::White, Algorithm::AlphaBetaTable);
        // A warm table would shrink the second count; a reset one cannot.
        assert_eq!(session.stats().nodes, first);
    }
}
