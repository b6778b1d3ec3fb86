//! CoTuLenh board representation and game logic.
//!
//! Generates legal moves (stacks, deployments, stay and suicide captures
//! included), applies and undoes them atomically, and converts between
//! internal move records and the extended FEN / SAN notations.
//!
//! # Example
//! ```
//! use cotulenh_engine::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! assert!(!moves.is_empty());
//! ```

mod air_defense;
mod builder;
mod cache;
mod deploy;
mod error;
mod fen;
mod legality;
mod make_unmake;
mod movegen;
pub mod prelude;
mod san;
mod stack;
mod state;
mod terrain;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use builder::BoardBuilder;
pub use deploy::{DeployRequest, DeploySession, DeployStep};
pub use error::{
    DeployError, FenError, IllegalMoveKind, MoveError, MoveParseError, PlacementError,
    SquareError, StackError,
};
pub use fen::DEFAULT_FEN;
pub use state::Board;
pub use types::{Color, Move, MoveFilter, MoveFlags, MoveRecord, Piece, PieceKind, Square};

// Stack algebra is part of the public surface: combining and splitting
// piece values is useful to front ends independent of a board.
pub use stack::{can_combine, combine_pieces, form_stack, remove_from_stack};

// Terrain predicates for rendering layers.
pub use terrain::{is_bridge_square, is_land_square, is_navy_square};
