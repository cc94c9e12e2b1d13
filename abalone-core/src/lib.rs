//! Abalone Core - Board model and game rules
//!
//! This crate provides the rules layer of the engine:
//! - Hex grid geometry (axial coordinates)
//! - Marble blocks and push legality (in-line, broadside, sumito)
//! - Board state with legal-move generation
//! - Terminal and positional queries (elimination threshold, populations,
//!   centre proximity)
//! - Static heuristic evaluation
//! - Openings and saved-position loading

pub mod block;
pub mod board;
pub mod eval;
pub mod hex;
pub mod opening;

// Re-exports for convenient access
pub use block::{Block, GROUP_LENGTHS};
pub use board::{Board, Move, MoveError, Player};
pub use eval::heuristic;
pub use hex::{Direction, Hex, DIRECTIONS};
pub use opening::{Opening, PositionError, SavedPosition, STANDARD_RADIUS, STANDARD_THRESHOLD};
