//! MCTS tree structure and node management
//!
//! Nodes live in a flat arena and refer to each other by index, so the tree
//! clones no boards during selection and drops in one free.

use abalone_core::{Board, Move, Player};
use rand::Rng;

/// Node identifier (index into the arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the MCTS tree.
///
/// `just_moved` is the player whose move produced this position; rewards are
/// banked from that player's perspective, which is what UCB1 selection at the
/// parent needs.
#[derive(Clone, Debug)]
pub struct MctsNode {
    pub board: Board,
    pub just_moved: Player,
    pub parent: Option<NodeId>,
    pub incoming: Option<Move>,
    pub children: Vec<NodeId>,
    pub untried: Vec<Move>,
    pub visits: u32,
    pub wins: f32,
}

impl MctsNode {
    pub fn new(board: Board, just_moved: Player, parent: Option<NodeId>, incoming: Option<Move>) -> Self {
        // Terminal positions get no successors
        let untried = if winner_of(&board).is_some() {
            Vec::new()
        } else {
            board.legal_moves(just_moved.opponent())
        };
        Self {
            board,
            just_moved,
            parent,
            incoming,
            children: Vec::new(),
            untried,
            visits: 0,
            wins: 0.0,
        }
    }

    pub fn to_move(&self) -> Player {
        self.just_moved.opponent()
    }

    pub fn is_terminal(&self) -> bool {
        winner_of(&self.board).is_some()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    pub fn win_rate(&self) -> f32 {
        if self.visits == 0 {
            0.5
        } else {
            self.wins / self.visits as f32
        }
    }
}

/// Which side, if either, has already won this position
pub fn winner_of(board: &Board) -> Option<Player> {
    if board.check_win(Player::White) {
        Some(Player::White)
    } else if board.check_win(Player::Black) {
        Some(Player::Black)
    } else {
        None
    }
}

/// MCTS search tree with arena allocation
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    /// Root the tree at `board` with `to_move` to play.
    pub fn new(board: Board, to_move: Player) -> Self {
        let root = MctsNode::new(board, to_move.opponent(), None, None);
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk the tree policy from the root, returning the first node that is
    /// terminal or still has untried moves.
    pub fn select_leaf(&self, exploration: f32) -> NodeId {
        let mut current = self.root();
        while self.get(current).is_fully_expanded() && !self.get(current).is_terminal() {
            match self.select_best_child(current, exploration) {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    /// Expand a node by materialising one untried move, chosen at random.
    ///
    /// Returns the new child's id, or None if the node has nothing left to
    /// try.
    pub fn expand<R: Rng>(&mut self, node_id: NodeId, rng: &mut R) -> Option<NodeId> {
        if self.get(node_id).untried.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..self.get(node_id).untried.len());
        let mv = self.get_mut(node_id).untried.swap_remove(pick);

        let mover = self.get(node_id).to_move();
        let mut board = self.get(node_id).board.clone();
        if board.apply(&mv).is_err() {
            // Generated moves are pre-validated; an untried move that fails
            // to apply is simply discarded.
            return self.expand(node_id, rng);
        }

        let child_id = NodeId(self.nodes.len());
        self.nodes
            .push(MctsNode::new(board, mover, Some(node_id), Some(mv)));
        self.get_mut(node_id).children.push(child_id);
        Some(child_id)
    }

    fn select_best_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.visits;
        node.children
            .iter()
            .copied()
            .max_by(|&a, &b| {
                let ucb_a = self.ucb1(a, parent_visits, exploration);
                let ucb_b = self.ucb1(b, parent_visits, exploration);
                ucb_a.partial_cmp(&ucb_b).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// UCB1 = wins/visits + C * sqrt(ln(parent_visits) / visits)
    fn ucb1(&self, node_id: NodeId, parent_visits: u32, exploration: f32) -> f32 {
        let node = self.get(node_id);
        if node.visits == 0 {
            return f32::INFINITY;
        }
        node.win_rate()
            + exploration * ((parent_visits as f32).ln() / node.visits as f32).sqrt()
    }

    /// Credit a playout outcome to every node on the path back to the root.
    ///
    /// Each node banks the reward from its own `just_moved` perspective, so
    /// alternating plies see alternating rewards.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Option<Player>) {
        let mut current = Some(leaf_id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.visits += 1;
            node.wins += match winner {
                Some(side) if side == node.just_moved => 1.0,
                Some(_) => 0.0,
                None => 0.5,
            };
            current = node.parent;
        }
    }

    /// The most-visited move at the root.
    pub fn best_move(&self) -> Option<Move> {
        let root = self.get(self.root());
        root.children
            .iter()
            .max_by_key(|&&id| self.get(id).visits)
            .and_then(|&id| self.get(id).incoming.clone())
    }

    /// (move, visits, win rate) for every root child, for analysis.
    pub fn move_statistics(&self) -> Vec<(Move, u32, f32)> {
        let root = self.get(self.root());
        root.children
            .iter()
            .filter_map(|&id| {
                let node = self.get(id);
                node.incoming
                    .clone()
                    .map(|mv| (mv, node.visits, node.win_rate()))
            })
            .collect()
    }

    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).visits
    }
}
