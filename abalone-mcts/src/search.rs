//! The four-phase MCTS loop
//!
//! 1. Selection - walk UCB1 to a frontier node
//! 2. Expansion - materialise one random untried move
//! 3. Simulation - random playout from the new node
//! 4. Backpropagation - credit the outcome up the path

use abalone_core::Move;
use rand::Rng;

use crate::rollout::rollout;
use crate::tree::{winner_of, MctsTree};
use crate::MctsConfig;

/// Outcome of one search: the finished tree plus root-move statistics.
#[derive(Debug)]
pub struct SearchResult {
    pub tree: MctsTree,
    pub total_simulations: u32,
}

impl SearchResult {
    /// The most-visited root move.
    pub fn best_move(&self) -> Option<Move> {
        self.tree.best_move()
    }

    /// Root moves sorted by visit count, most visited first.
    pub fn moves_by_visits(&self) -> Vec<(Move, u32, f32)> {
        let mut stats = self.tree.move_statistics();
        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }
}

/// Run `config.iterations` MCTS cycles over `tree`.
pub fn run_search<R: Rng>(mut tree: MctsTree, config: &MctsConfig, rng: &mut R) -> SearchResult {
    for _ in 0..config.iterations {
        run_single_iteration(&mut tree, config, rng);
    }
    let total_simulations = tree.total_simulations();
    tracing::debug!(
        iterations = config.iterations,
        nodes = tree.len(),
        total_simulations,
        "mcts finished"
    );
    SearchResult {
        tree,
        total_simulations,
    }
}

fn run_single_iteration<R: Rng>(tree: &mut MctsTree, config: &MctsConfig, rng: &mut R) {
    // Phase 1: selection
    let leaf = tree.select_leaf(config.exploration);

    // Phase 2: expansion, unless the leaf is terminal
    let simulated = if tree.get(leaf).is_terminal() {
        leaf
    } else {
        tree.expand(leaf, rng).unwrap_or(leaf)
    };

    // Phase 3: simulation
    let node = tree.get(simulated);
    let winner = match winner_of(&node.board) {
        Some(winner) => Some(winner),
        None => rollout(
            &node.board,
            node.to_move(),
            config.max_rollout_depth,
            rng,
        ),
    };

    // Phase 4: backpropagation
    tree.backpropagate(simulated, winner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{Board, Hex, Opening, Player};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_run_search_visits_match_iterations() {
        let tree = MctsTree::new(Opening::Mini.board(), Player::White);
        let config = MctsConfig {
            iterations: 50,
            ..MctsConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let result = run_search(tree, &config, &mut rng);

        assert_eq!(result.total_simulations, 50);
        assert!(result.best_move().is_some());
        assert!(result.tree.len() > 1);
    }

    #[test]
    fn test_search_finds_immediate_win() {
        // White can shove the last black marble off; with enough playouts
        // that push must dominate the visit counts.
        let mut board = Board::empty(4, 0);
        board.set(Hex::new(2, 0), Some(Player::White));
        board.set(Hex::new(3, 0), Some(Player::White));
        board.set(Hex::new(4, 0), Some(Player::Black));

        let tree = MctsTree::new(board, Player::White);
        let config = MctsConfig {
            iterations: 400,
            ..MctsConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let result = run_search(tree, &config, &mut rng);

        let best = result.best_move().expect("root has moves");
        assert_eq!(best.direction, (1, 0));
        assert!(best.block.cells().contains(&Hex::new(3, 0)));
    }

    #[test]
    fn test_moves_by_visits_is_sorted() {
        let tree = MctsTree::new(Opening::Mini.board(), Player::Black);
        let config = MctsConfig {
            iterations: 80,
            ..MctsConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result = run_search(tree, &config, &mut rng);

        let stats = result.moves_by_visits();
        assert!(!stats.is_empty());
        for pair in stats.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
