//! Zobrist hashing and the transposition table
//!
//! Positions are fingerprinted by XOR-combining one random 64-bit value per
//! (player, coordinate) pair, so transpositions - the same occupancy reached
//! through different move orders - share a key. Keys cover occupancy only,
//! not the side to move. The table memoises (bound kind, value, move, depth)
//! per key and overwrites unconditionally on store.

use crate::SearchSession;
use abalone_core::{heuristic, Board, Hex, Move, Player};
use rand::Rng;
use std::io::{self, Write};

/// Random key material for one board radius
#[derive(Clone, Debug)]
pub struct Zobrist {
    radius: i8,
    keys: Vec<u64>,
}

impl Zobrist {
    pub fn new<R: Rng>(radius: i8, rng: &mut R) -> Self {
        let width = (2 * radius + 1) as usize;
        let keys = (0..2 * width * width).map(|_| rng.gen()).collect();
        Self { radius, keys }
    }

    fn key(&self, side: Player, hex: Hex) -> u64 {
        let width = (2 * self.radius + 1) as usize;
        let row = (hex.x + self.radius) as usize;
        let col = (hex.z + self.radius) as usize;
        self.keys[(side as usize) * width * width + row * width + col]
    }

    /// Position fingerprint: XOR over every occupied cell
    pub fn hash(&self, board: &Board) -> u64 {
        board
            .occupied()
            .fold(0u64, |acc, (hex, side)| acc ^ self.key(side, hex))
    }
}

/// How a stored value bounds the true score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// One memoised search result
#[derive(Clone, Debug)]
pub struct TtEntry {
    pub value: f32,
    pub best: Option<Move>,
    pub bound: Bound,
    pub depth: u32,
}

/// Outcome of probing the table before searching a node
enum Probe {
    Hit(f32, Option<Move>),
    Window(f32, f32),
    Miss,
}

impl SearchSession {
    /// Look a position up and combine the stored bound with the caller's
    /// window. A hit is only usable when it was computed at least as deep as
    /// requested.
    fn probe(&self, key: u64, depth: u32, alpha: f32, beta: f32) -> Probe {
        let entry = match self.table.get(&key) {
            Some(entry) if entry.depth >= depth => entry,
            _ => return Probe::Miss,
        };
        match entry.bound {
            Bound::Exact => Probe::Hit(entry.value, entry.best.clone()),
            Bound::Lower => {
                if entry.value >= beta {
                    Probe::Hit(entry.value, entry.best.clone())
                } else {
                    Probe::Window(alpha.max(entry.value), beta)
                }
            }
            Bound::Upper => {
                if entry.value <= alpha {
                    Probe::Hit(entry.value, entry.best.clone())
                } else {
                    Probe::Window(alpha, beta.min(entry.value))
                }
            }
        }
    }

    /// Classify and store a freshly computed node result. `alpha`/`beta` are
    /// the window the node was entered with, before any child raised it.
    fn store(&mut self, key: u64, depth: u32, alpha: f32, beta: f32, value: f32, best: Option<Move>) {
        let bound = if value <= alpha {
            Bound::Upper
        } else if value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.table.insert(
            key,
            TtEntry {
                value,
                best,
                bound,
                depth,
            },
        );
    }

    /// Alpha-beta with transposition lookup and block-size move ordering.
    /// Scores match [`crate::minimax::alphabeta`]; only the node count
    /// differs.
    pub(crate) fn alphabeta_table(
        &mut self,
        board: &Board,
        depth: u32,
        to_move: Player,
        root: Player,
        mut alpha: f32,
        mut beta: f32,
    ) -> (f32, Option<Move>) {
        let key = self.zobrist.hash(board);
        match self.probe(key, depth, alpha, beta) {
            Probe::Hit(value, best) => return (value, best),
            Probe::Window(a, b) => {
                alpha = a;
                beta = b;
                if alpha >= beta {
                    // The stored bound alone decides this node
                    let entry = &self.table[&key];
                    return (entry.value, entry.best.clone());
                }
            }
            Probe::Miss => {}
        }

        if board.check_win(root) {
            return (f32::INFINITY, None);
        }
        if board.check_win(root.opponent()) {
            return (f32::NEG_INFINITY, None);
        }
        if depth == 0 {
            return (heuristic(board, root), None);
        }

        let (alpha_in, beta_in) = (alpha, beta);
        let maximizing = to_move == root;
        let mut best = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
        let mut best_move = None;

        // Bigger blocks first: pushes and captures surface earlier, which
        // tightens the window sooner.
        let mut successors: Vec<Move> = board.moves(to_move).collect();
        successors.sort_by(|a, b| b.block.len().cmp(&a.block.len()));

        for mv in successors {
            self.stats.nodes += 1;
            let mut child = board.clone();
            if child.apply(&mv).is_err() {
                continue;
            }
            let (score, _) =
                self.alphabeta_table(&child, depth - 1, to_move.opponent(), root, alpha, beta);
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

        self.store(key, depth, alpha_in, beta_in, best, best_move.clone());
        (best, best_move)
    }

    /// PVS with transposition lookup and block-size move ordering. Scores
    /// match [`crate::minimax::pvs`].
    pub(crate) fn pvs_table(
        &mut self,
        board: &Board,
        depth: u32,
        to_move: Player,
        mut alpha: f32,
        mut beta: f32,
    ) -> (f32, Option<Move>) {
        let key = self.zobrist.hash(board);
        match self.probe(key, depth, alpha, beta) {
            Probe::Hit(value, best) => return (value, best),
            Probe::Window(a, b) => {
                alpha = a;
                beta = b;
                if alpha >= beta {
                    let entry = &self.table[&key];
                    return (entry.value, entry.best.clone());
                }
            }
            Probe::Miss => {}
        }

        if board.check_win(to_move) {
            return (f32::INFINITY, None);
        }
        if board.check_win(to_move.opponent()) {
            return (f32::NEG_INFINITY, None);
        }
        if depth == 0 {
            return (heuristic(board, to_move), None);
        }

        let (alpha_in, beta_in) = (alpha, beta);
        let mut best = f32::NEG_INFINITY;
        let mut best_move = None;

        let mut successors: Vec<Move> = board.moves(to_move).collect();
        successors.sort_by(|a, b| b.block.len().cmp(&a.block.len()));

        for (idx, mv) in successors.into_iter().enumerate() {
            self.stats.nodes += 1;
            let mut child = board.clone();
            if child.apply(&mv).is_err() {
                continue;
            }

            let opponent = to_move.opponent();
            let score = if idx == 0 {
                -self.pvs_table(&child, depth - 1, opponent, -beta, -alpha).0
            } else {
                let mut probe = -self
                    .pvs_table(&child, depth - 1, opponent, -alpha - 1.0, -alpha)
                    .0;
                if alpha < probe && probe < beta {
                    probe = -self.pvs_table(&child, depth - 1, opponent, -beta, -probe).0;
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

        self.store(key, depth, alpha_in, beta_in, best, best_move.clone());
        (best, best_move)
    }

    /// Dump the table for offline inspection, one `key,value,bound,depth,move`
    /// record per line.
    pub fn export_table<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (key, entry) in &self.table {
            let best = entry
                .best
                .as_ref()
                .map(|mv| mv.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                writer,
                "{},{},{:?},{},{}",
                key, entry.value, entry.bound, entry.depth, best
            )?;
        }
        Ok(())
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::Opening;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hash_is_order_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let zobrist = Zobrist::new(4, &mut rng);

        // Two routes to the same occupancy
        let mut a = Board::empty(4, 0);
        a.set(Hex::new(0, 0), Some(Player::White));
        a.set(Hex::new(2, -1), Some(Player::Black));

        let mut b = Board::empty(4, 0);
        b.set(Hex::new(2, -1), Some(Player::Black));
        b.set(Hex::new(0, 0), Some(Player::White));

        assert_eq!(zobrist.hash(&a), zobrist.hash(&b));
    }

    #[test]
    fn test_hash_distinguishes_owner() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let zobrist = Zobrist::new(4, &mut rng);

        let mut a = Board::empty(4, 0);
        a.set(Hex::new(0, 0), Some(Player::White));
        let mut b = Board::empty(4, 0);
        b.set(Hex::new(0, 0), Some(Player::Black));

        assert_ne!(zobrist.hash(&a), zobrist.hash(&b));
    }

    #[test]
    fn test_export_is_line_oriented() {
        let mut session = SearchSession::with_seed(4, 9);
        let board = Opening::Mini.board();
        session.evaluate(&board, 2, Player::White, crate::Algorithm::AlphaBetaTable);
        assert!(session.table_len() > 0);

        let mut out = Vec::new();
        session.export_table(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), session.table_len());
        for line in text.lines() {
            assert!(line.splitn(5, ',').count() == 5);
        }
    }
}
