//! Abalone MCTS - Monte Carlo tree search
//!
//! UCT over an arena-allocated tree with uniformly random playouts:
//! - Tree policy (UCB1)
//! - Random expansion and length-restricted random playouts
//! - Reward backpropagation from each mover's perspective

pub mod rollout;
pub mod search;
pub mod tree;

use abalone_core::{Board, Move, Player};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use search::{run_search, SearchResult};
pub use tree::{MctsNode, MctsTree, NodeId};

const DEFAULT_SEED: u64 = 42;

/// MCTS configuration
#[derive(Clone, Debug)]
pub struct MctsConfig {
    pub iterations: usize,
    pub exploration: f32,
    pub max_rollout_depth: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: std::f32::consts::SQRT_2,
            max_rollout_depth: 200,
        }
    }
}

/// A player that picks moves by Monte Carlo tree search.
pub struct MctsPlayer {
    config: MctsConfig,
    rng: ChaCha8Rng,
}

impl MctsPlayer {
    pub fn new(config: MctsConfig) -> Self {
        Self::with_seed(config, DEFAULT_SEED)
    }

    pub fn with_seed(config: MctsConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search from `board` with `side` to move and return the most-visited
    /// root move. None when the position is terminal or `side` cannot move.
    pub fn best_move(&mut self, board: &Board, side: Player) -> Option<Move> {
        let tree = MctsTree::new(board.clone(), side);
        run_search(tree, &self.config, &mut self.rng).best_move()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{Hex, Opening};

    #[test]
    fn test_player_is_seed_deterministic() {
        let board = Opening::Mini.board();
        let config = MctsConfig {
            iterations: 60,
            ..MctsConfig::default()
        };
        let a = MctsPlayer::with_seed(config.clone(), 17).best_move(&board, Player::White);
        let b = MctsPlayer::with_seed(config, 17).best_move(&board, Player::White);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_terminal_position_has_no_move() {
        let mut board = Board::empty(4, 0);
        board.set(Hex::new(0, 0), Some(Player::White));
        let mut player = MctsPlayer::new(MctsConfig {
            iterations: 10,
            ..MctsConfig::default()
        });
        assert!(player.best_move(&board, Player::Black).is_none());
    }
}
