//! Board state, legal-move generation and the push rules

use crate::block::{Block, GROUP_LENGTHS};
use crate::hex::{Direction, Hex, DIRECTIONS};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Marble colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    fn glyph(self) -> char {
        match self {
            Player::White => 'O',
            Player::Black => '@',
        }
    }
}

/// A (block, direction) pair: one player action
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub block: Block,
    pub direction: Direction,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, cell) in self.block.cells().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({},{})", cell.x, cell.z)?;
        }
        write!(f, "] -> ({},{})", self.direction.0, self.direction.1)
    }
}

/// Why a candidate move was rejected.
///
/// These are expected, recoverable conditions: move generation attempts every
/// candidate and keeps only the ones that apply cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("incorrect direction")]
    BadDirection,
    #[error("incorrect block")]
    BadBlock,
    #[error("enemy is stronger")]
    EnemyStronger,
    #[error("attacking own marble")]
    OwnMarble,
    #[error("no room to move enemy marbles")]
    NoRoom,
    #[error("destination occupied")]
    DestinationOccupied,
    #[error("attempting to move off the grid")]
    OffBoard,
}

/// The playing surface: every hex within `radius` of the centre mapped to an
/// occupant. The key set is fixed for the lifetime of the board; only the
/// occupants change. Cloning is a flat copy, cheap enough that search clones
/// a board per explored move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    radius: i8,
    threshold: u8,
    cells: Vec<Option<Player>>,
}

impl Board {
    /// An empty board. `threshold` is the marble count at or below which a
    /// side has lost.
    pub fn empty(radius: i8, threshold: u8) -> Self {
        let width = (2 * radius + 1) as usize;
        Self {
            radius,
            threshold,
            cells: vec![None; width * width],
        }
    }

    pub fn radius(&self) -> i8 {
        self.radius
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    fn index(&self, hex: Hex) -> usize {
        let width = (2 * self.radius + 1) as usize;
        let row = (hex.x + self.radius) as usize;
        let col = (hex.z + self.radius) as usize;
        row * width + col
    }

    /// Whether the hex lies on the board
    pub fn contains(&self, hex: Hex) -> bool {
        hex.x.abs() <= self.radius
            && hex.z.abs() <= self.radius
            && (hex.x + hex.z).abs() <= self.radius
    }

    pub fn occupant(&self, hex: Hex) -> Option<Player> {
        if self.contains(hex) {
            self.cells[self.index(hex)]
        } else {
            None
        }
    }

    /// Place or clear a marble. The hex must be a board member.
    pub fn set(&mut self, hex: Hex, occupant: Option<Player>) {
        debug_assert!(self.contains(hex));
        let idx = self.index(hex);
        self.cells[idx] = occupant;
    }

    /// All board hexes, row by row
    pub fn hexes(&self) -> impl Iterator<Item = Hex> + '_ {
        let r = self.radius;
        (-r..=r).flat_map(move |x| {
            let lo = (-r).max(-r - x);
            let hi = r.min(r - x);
            (lo..=hi).map(move |z| Hex::new(x, z))
        })
    }

    /// Occupied hexes with their owner
    pub fn occupied(&self) -> impl Iterator<Item = (Hex, Player)> + '_ {
        self.hexes()
            .filter_map(|hex| self.occupant(hex).map(|p| (hex, p)))
    }

    /// Marble count for a side
    pub fn marbles(&self, side: Player) -> usize {
        self.occupied().filter(|&(_, p)| p == side).count()
    }

    /// A side has won once the opponent is at or below the elimination
    /// threshold.
    pub fn check_win(&self, side: Player) -> bool {
        self.marbles(side.opponent()) <= self.threshold as usize
    }

    /// Mean distance from the centre over a side's marbles; lower is
    /// positionally stronger.
    pub fn center_proximity(&self, side: Player) -> f32 {
        let mut total = 0i32;
        let mut count = 0i32;
        for (hex, _) in self.occupied().filter(|&(_, p)| p == side) {
            total += hex.distance_to_center() as i32;
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            total as f32 / count as f32
        }
    }

    // ========================================================================
    // POPULATIONS
    // ========================================================================

    /// Maximal connected components of a side's marbles
    pub fn populations(&self, side: Player) -> Vec<FxHashSet<Hex>> {
        let mut unchecked: FxHashSet<Hex> = self
            .occupied()
            .filter(|&(_, p)| p == side)
            .map(|(hex, _)| hex)
            .collect();
        let mut groups = Vec::new();

        loop {
            let seed = match unchecked.iter().next() {
                Some(&hex) => hex,
                None => break,
            };
            unchecked.remove(&seed);
            let mut group = FxHashSet::default();
            let mut frontier = vec![seed];
            while let Some(hex) = frontier.pop() {
                group.insert(hex);
                for n in hex.neighbours() {
                    if unchecked.remove(&n) {
                        frontier.push(n);
                    }
                }
            }
            groups.push(group);
        }

        groups
    }

    /// The connected component containing `hex` (empty if unoccupied)
    pub fn population_of(&self, hex: Hex) -> FxHashSet<Hex> {
        match self.occupant(hex) {
            Some(side) => self
                .populations(side)
                .into_iter()
                .find(|group| group.contains(&hex))
                .unwrap_or_default(),
            None => FxHashSet::default(),
        }
    }

    // ========================================================================
    // BLOCK ENUMERATION
    // ========================================================================

    /// All structurally valid blocks of the given lengths for a side.
    ///
    /// Candidates are seeded from every marble, extended only through its
    /// population (which bounds the combinatorial search), and deduplicated:
    /// different (seed, direction) pairs can reach the same block.
    pub fn legal_blocks(&self, side: Player, lengths: &[usize]) -> Vec<Block> {
        let mut found: FxHashSet<Block> = FxHashSet::default();

        for group in self.populations(side) {
            for &seed in &group {
                let mut dirs: Vec<Direction> = seed
                    .neighbours()
                    .filter(|n| group.contains(n))
                    .map(|n| seed.direction_to(n))
                    .collect();
                // Degenerate direction yields the single-marble block
                dirs.push((0, 0));

                for dir in dirs {
                    for &length in lengths {
                        let mut cells = Vec::with_capacity(length);
                        for step in 0..length as i8 {
                            let cell = seed.offset(dir, step);
                            if !group.contains(&cell) {
                                break;
                            }
                            cells.push(cell);
                        }
                        if cells.is_empty() {
                            continue;
                        }
                        let block = Block::new(cells);
                        if block.is_valid() {
                            found.insert(block);
                        }
                    }
                }
            }
        }

        found.into_iter().collect()
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves for a side, lazily generated: every candidate block in
    /// every direction, kept only if it applies cleanly on a probe clone.
    pub fn moves(&self, side: Player) -> impl Iterator<Item = Move> + '_ {
        self.moves_with_lengths(side, &GROUP_LENGTHS)
    }

    /// Like [`Board::moves`], restricted to the given block lengths
    pub fn moves_with_lengths<'a>(
        &'a self,
        side: Player,
        lengths: &[usize],
    ) -> impl Iterator<Item = Move> + 'a {
        self.legal_blocks(side, lengths)
            .into_iter()
            .flat_map(move |block| {
                DIRECTIONS.iter().filter_map(move |&direction| {
                    let mv = Move {
                        block: block.clone(),
                        direction,
                    };
                    let mut probe = self.clone();
                    probe.apply(&mv).ok().map(|_| mv)
                })
            })
    }

    /// Collected legal moves
    pub fn legal_moves(&self, side: Player) -> Vec<Move> {
        self.moves(side).collect()
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Apply a move, mutating the board.
    ///
    /// All legality checks run before any cell changes, so a rejected move
    /// leaves the board untouched and callers may use rejection purely as a
    /// filter. The legality pipeline, in order: direction and block shape,
    /// push strength against the opposing run, destination occupancy, board
    /// boundary.
    pub fn apply(&mut self, mv: &Move) -> Result<(), MoveError> {
        let direction = mv.direction;
        if !DIRECTIONS.contains(&direction) {
            return Err(MoveError::BadDirection);
        }
        if !mv.block.is_valid() {
            return Err(MoveError::BadBlock);
        }

        let owner = match self.occupant(mv.block.cells()[0]) {
            Some(p) => p,
            None => return Err(MoveError::BadBlock),
        };
        if mv
            .block
            .cells()
            .iter()
            .any(|&cell| self.occupant(cell) != Some(owner))
        {
            return Err(MoveError::BadBlock);
        }

        let line = mv.block.sorted_along(direction);
        let inline = mv.block.alignments().contains(&direction);
        let strength = mv.block.strength(direction);

        // Mirror ray: walk up to `strength` cells beyond the far end,
        // collecting the contiguous opposing run, and remember the first
        // non-enemy cell (the one the run would be pushed into).
        let far = *line.last().expect("valid block is non-empty");
        let mut enemies: Vec<Hex> = Vec::new();
        let mut behind: Option<Hex> = None;
        for step in 1..=strength as i8 {
            let cell = far.offset(direction, step);
            if !self.contains(cell) {
                break;
            }
            match self.occupant(cell) {
                Some(p) if p == owner.opponent() => enemies.push(cell),
                _ => {
                    behind = Some(cell);
                    break;
                }
            }
        }

        // A push must out-number the opposing run
        if mv.block.len() <= enemies.len() {
            return Err(MoveError::EnemyStronger);
        }

        if inline {
            // The cell the displaced run (or our own head) moves into must be
            // empty or off the board.
            if let Some(cell) = behind {
                if self.occupant(cell).is_some() {
                    return if enemies.is_empty() {
                        Err(MoveError::OwnMarble)
                    } else {
                        Err(MoveError::NoRoom)
                    };
                }
            }
            // Own suicide off the edge: the head's destination must exist
            // (enemy marbles, by contrast, are allowed to fall off).
            if enemies.is_empty() && !self.contains(far.offset(direction, 1)) {
                return Err(MoveError::OffBoard);
            }
        } else {
            // Broadside: every destination must be an empty board cell
            for &cell in &line {
                let dest = cell.offset(direction, 1);
                if !self.contains(dest) {
                    return Err(MoveError::OffBoard);
                }
                if self.occupant(dest).is_some() {
                    return Err(MoveError::DestinationOccupied);
                }
            }
        }

        // Commit: lift everything, then relocate enemies one step (dropping
        // any pushed past the edge) and write the block into its destinations.
        for &cell in &line {
            self.set(cell, None);
        }
        for &cell in &enemies {
            self.set(cell, None);
        }
        for &cell in &enemies {
            let dest = cell.offset(direction, 1);
            if self.contains(dest) {
                self.set(dest, Some(owner.opponent()));
            }
        }
        for &cell in &line {
            self.set(cell.offset(direction, 1), Some(owner));
        }

        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.radius;
        for z in -r..=r {
            let lo = (-r).max(-r - z);
            let hi = r.min(r - z);
            for _ in 0..z.abs() {
                write!(f, " ")?;
            }
            for x in lo..=hi {
                let glyph = match self.occupant(Hex::new(x, z)) {
                    Some(p) => p.glyph(),
                    None => '.',
                };
                if x > lo {
                    write!(f, " ")?;
                }
                write!(f, "{}", glyph)?;
            }
            if z < r {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
