//! Initial placements and saved positions

use crate::board::{Board, Player};
use crate::hex::Hex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board radius of the full game
pub const STANDARD_RADIUS: i8 = 4;

/// Opponent marble count at or below which the game is over (full game:
/// 14 marbles per side, six captures win)
pub const STANDARD_THRESHOLD: u8 = 8;

const MINI_THRESHOLD: u8 = 4;

/// Named initial placements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opening {
    /// Full game: two home rows plus a centred trio, 14 marbles per side
    Standard,
    /// Reduced layout for fast games: one home row plus a centred trio
    Mini,
}

impl Opening {
    pub fn board(self) -> Board {
        let (threshold, black) = match self {
            Opening::Standard => {
                let mut black: Vec<Hex> = Vec::new();
                for x in 0..=4 {
                    black.push(Hex::new(x, -4));
                }
                for x in -1..=4 {
                    black.push(Hex::new(x, -3));
                }
                for x in 0..=2 {
                    black.push(Hex::new(x, -2));
                }
                (STANDARD_THRESHOLD, black)
            }
            Opening::Mini => {
                let mut black: Vec<Hex> = (0..=4).map(|x| Hex::new(x, -4)).collect();
                for x in 1..=3 {
                    black.push(Hex::new(x, -3));
                }
                (MINI_THRESHOLD, black)
            }
        };

        let mut board = Board::empty(STANDARD_RADIUS, threshold);
        for hex in black {
            board.set(hex, Some(Player::Black));
            // White mirrors black through the centre
            board.set(Hex::new(-hex.x, -hex.z), Some(Player::White));
        }
        board
    }
}

/// A saved position: each side as a list of (x, z) pairs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedPosition {
    pub white: Vec<(i8, i8)>,
    pub black: Vec<(i8, i8)>,
}

/// Rejected saved-position input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("coordinate ({0}, {1}) is off the board")]
    OffBoard(i8, i8),
    #[error("coordinate ({0}, {1}) is occupied twice")]
    Duplicate(i8, i8),
}

impl Board {
    /// Build a standard-sized board from a saved position, validating every
    /// coordinate.
    pub fn from_saved(position: &SavedPosition) -> Result<Board, PositionError> {
        let mut board = Board::empty(STANDARD_RADIUS, STANDARD_THRESHOLD);
        let sides = [
            (Player::White, &position.white),
            (Player::Black, &position.black),
        ];
        for (side, coords) in sides {
            for &(x, z) in coords {
                let hex = Hex::new(x, z);
                if !board.contains(hex) {
                    return Err(PositionError::OffBoard(x, z));
                }
                if board.occupant(hex).is_some() {
                    return Err(PositionError::Duplicate(x, z));
                }
                board.set(hex, Some(side));
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_opening() {
        let board = Opening::Standard.board();
        assert_eq!(board.marbles(Player::White), 14);
        assert_eq!(board.marbles(Player::Black), 14);
        assert_eq!(board.threshold(), 8);
        // Neither side starts anywhere near elimination
        assert!(!board.check_win(Player::White));
        assert!(!board.check_win(Player::Black));
        // Single connected population per side
        assert_eq!(board.populations(Player::White).len(), 1);
        assert_eq!(board.populations(Player::Black).len(), 1);
    }

    #[test]
    fn test_mini_opening() {
        let board = Opening::Mini.board();
        assert_eq!(board.marbles(Player::White), 8);
        assert_eq!(board.marbles(Player::Black), 8);
        assert_eq!(board.threshold(), 4);
    }

    #[test]
    fn test_saved_position_round_trip() {
        let json = r#"{"white": [[0, 0], [1, 0]], "black": [[0, -4]]}"#;
        let position: SavedPosition = serde_json::from_str(json).unwrap();
        let board = Board::from_saved(&position).unwrap();
        assert_eq!(board.marbles(Player::White), 2);
        assert_eq!(board.occupant(Hex::new(0, -4)), Some(Player::Black));
    }

    #[test]
    fn test_saved_position_rejects_bad_input() {
        let off = SavedPosition {
            white: vec![(5, 0)],
            black: vec![],
        };
        assert_eq!(
            Board::from_saved(&off),
            Err(PositionError::OffBoard(5, 0))
        );

        let dup = SavedPosition {
            white: vec![(0, 0)],
            black: vec![(0, 0)],
        };
        assert_eq!(
            Board::from_saved(&dup),
            Err(PositionError::Duplicate(0, 0))
        );
    }
}
