//! Marble blocks: the 1-3 marble lines that push together

use crate::hex::{dot, Direction, Hex, DIRECTIONS};

/// Block lengths allowed by the rules
pub const GROUP_LENGTHS: [usize; 3] = [1, 2, 3];

/// An ordered line of 1-3 same-owner hexes, the unit that moves together.
///
/// Cells are kept in canonical (sorted) order so that structurally equal
/// blocks found through different seed hexes compare and hash equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    cells: Vec<Hex>,
}

impl Block {
    pub fn new(mut cells: Vec<Hex>) -> Self {
        cells.sort();
        cells.dedup();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Hex] {
        &self.cells
    }

    /// Structural validity: legal length, pairwise adjacency along the
    /// sequence, and a single consistent direction of alignment.
    pub fn is_valid(&self) -> bool {
        if !GROUP_LENGTHS.contains(&self.len()) {
            return false;
        }
        let adjacent = self
            .cells
            .windows(2)
            .all(|pair| pair[0].is_adjacent(pair[1]));
        let mut axes = self
            .cells
            .windows(2)
            .map(|pair| pair[0].direction_to(pair[1]));
        let first = axes.next();
        adjacent && axes.all(|axis| Some(axis) == first)
    }

    /// Directions this block is aligned with: every direction for a single
    /// hex, otherwise the two directions of its axis.
    pub fn alignments(&self) -> Vec<Direction> {
        if self.len() == 1 {
            return DIRECTIONS.to_vec();
        }
        let axis = self.cells[0].direction_to(self.cells[1]);
        vec![axis, (-axis.0, -axis.1)]
    }

    /// Push strength in a direction: the block length for an in-line push,
    /// one for a broadside.
    pub fn strength(&self, direction: Direction) -> usize {
        if self.alignments().contains(&direction) {
            self.len()
        } else {
            1
        }
    }

    /// Cells ordered so the last one is furthest along `direction`
    pub fn sorted_along(&self, direction: Direction) -> Vec<Hex> {
        let mut line = self.cells.clone();
        line.sort_by_key(|&hex| dot(hex, direction));
        line
    }
}
