//! Prelude module for convenient imports.
//!
//! # Example
//! ```
//! use cotulenh_engine::board::prelude::*;
//! ```

pub use super::{
    Board, BoardBuilder, Color, DeployError, DeployRequest, DeploySession, DeployStep, FenError,
    IllegalMoveKind, Move, MoveError, MoveFilter, MoveFlags, MoveParseError, MoveRecord, Piece,
    PieceKind, PlacementError, Square, StackError, DEFAULT_FEN,
};
