//! Core rules engine for CoTuLenh (Cờ Tư Lệnh), an 11×12 military chess
//! variant with terrain zones, piece stacking, deployment sub-turns, air
//! defense influence, and heroic promotion.
//!
//! The crate is a deterministic, single-threaded library: it represents the
//! board and auxiliary state, generates legal moves, applies and undoes them
//! atomically, detects check/checkmate/draw, and converts between internal
//! move records and the extended FEN / SAN notations.

pub mod board;

pub use board::prelude::*;
