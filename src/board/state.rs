//! Board state: the mailbox, commander tracking, counters, history, and
//! the repetition table.

use std::collections::HashMap;

use super::air_defense::AirDefenseField;
use super::cache::MoveCache;
use super::deploy::DeploySession;
use super::error::PlacementError;
use super::make_unmake::HistoryEntry;
use super::stack;
use super::terrain;
use super::types::{Color, Piece, PieceKind, Square, BOARD_SLOTS};

/// Counts occurrences of serialized positions for threefold repetition.
/// The key covers the board, side to move, and deploy session state.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<String, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, key: String, count: u32) {
        if count == 0 {
            self.counts.remove(&key);
        } else {
            self.counts.insert(key, count);
        }
    }

    pub(crate) fn increment(&mut self, key: String) -> u32 {
        let next = self.get(&key).saturating_add(1);
        self.set(key, next);
        next
    }

    pub(crate) fn decrement(&mut self, key: &str) {
        let count = self.get(key).saturating_sub(1);
        self.set(key.to_string(), count);
    }
}

/// A CoTuLenh game position with full rules state.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) slots: Vec<Option<Piece>>,
    pub(crate) turn: Color,
    pub(crate) commanders: [Option<Square>; 2],
    pub(crate) half_moves: u32,
    pub(crate) move_number: u32,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) repetitions: RepetitionTable,
    pub(crate) deploy_session: Option<DeploySession>,
    pub(crate) air_defense_cache: Option<AirDefenseField>,
    pub(crate) move_cache: MoveCache,
}

impl Board {
    /// An empty board with Red to move.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            slots: vec![None; BOARD_SLOTS],
            turn: Color::Red,
            commanders: [None, None],
            half_moves: 0,
            move_number: 1,
            history: Vec::new(),
            repetitions: RepetitionTable::new(),
            deploy_session: None,
            air_defense_cache: None,
            move_cache: MoveCache::new(),
        }
    }

    /// The side to move.
    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Half-move clock for the fifty-move rule.
    #[inline]
    #[must_use]
    pub fn half_moves(&self) -> u32 {
        self.half_moves
    }

    /// Full-move number; increments when the move passes back to Red.
    #[inline]
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// The piece (or stack) on a square.
    #[inline]
    #[must_use]
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        self.slots[sq.index()].as_ref()
    }

    /// A specific piece on a square: the board piece itself, or a piece of
    /// the requested kind inside the stack standing there.
    #[must_use]
    pub fn get_kind(&self, sq: Square, kind: PieceKind) -> Option<&Piece> {
        let piece = self.get(sq)?;
        if piece.kind == kind {
            return Some(piece);
        }
        piece.carrying.iter().find(|p| p.kind == kind)
    }

    /// Tracked commander square for a color.
    #[inline]
    #[must_use]
    pub fn commander_square(&self, color: Color) -> Option<Square> {
        self.commanders[color.index()]
    }

    /// All occupied squares with their pieces.
    pub(crate) fn occupied_squares(&self) -> impl Iterator<Item = (Square, &Piece)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|p| (Square::from_index(idx), p)))
    }

    /// Squares holding pieces of one color, with their pieces.
    #[must_use]
    pub fn pieces_of(&self, color: Color) -> Vec<(Square, &Piece)> {
        self.occupied_squares()
            .filter(|(_, p)| p.color == color)
            .collect()
    }

    /// Place a piece. Fails on terrain violations, duplicate commanders,
    /// and stack invariant violations.
    pub fn put(&mut self, piece: Piece, sq: Square) -> Result<(), PlacementError> {
        stack::validate(&piece).map_err(|_| PlacementError::InvalidStack {
            carrier: piece.kind,
        })?;
        if !terrain::can_stay(piece.kind, sq) {
            return Err(PlacementError::Terrain {
                kind: piece.kind,
                square: sq,
            });
        }
        if piece.contains_commander() {
            if let Some(existing) = self.commanders[piece.color.index()] {
                if existing != sq {
                    return Err(PlacementError::DuplicateCommander { color: piece.color });
                }
            }
        }
        self.write_slot(sq, Some(piece));
        Ok(())
    }

    /// Remove and return the piece on a square.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.write_slot(sq, None)
    }

    /// Raw slot write. Keeps the commander map current and invalidates the
    /// move cache and air-defense field; all board mutation funnels through
    /// here so undo restores every derived structure.
    pub(crate) fn write_slot(&mut self, sq: Square, value: Option<Piece>) -> Option<Piece> {
        let old = std::mem::replace(&mut self.slots[sq.index()], value);
        if let Some(old_piece) = &old {
            if old_piece.contains_commander()
                && self.commanders[old_piece.color.index()] == Some(sq)
            {
                self.commanders[old_piece.color.index()] = None;
            }
        }
        if let Some(new_piece) = &self.slots[sq.index()] {
            if new_piece.contains_commander() {
                self.commanders[new_piece.color.index()] = Some(sq);
            }
        }
        self.invalidate_caches();
        old
    }

    pub(crate) fn invalidate_caches(&mut self) {
        self.air_defense_cache = None;
        self.move_cache.clear();
    }

    /// Current air-defense field, recomputed lazily after mutations.
    pub(crate) fn air_defense(&mut self) -> AirDefenseField {
        if let Some(field) = &self.air_defense_cache {
            return field.clone();
        }
        let field = AirDefenseField::compute(self);
        self.air_defense_cache = Some(field.clone());
        field
    }

    /// The active deploy session, if any.
    #[must_use]
    pub fn deploy_state(&self) -> Option<&DeploySession> {
        self.deploy_session.as_ref()
    }

    /// Fifty-move rule: one hundred half-moves without a capture.
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.half_moves >= 100
    }

    /// Threefold repetition of the serialized position.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions.get(&self.position_key()) >= 3
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_threefold_repetition()
    }

    /// The winner once a commander has been captured.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        match (self.commanders[0], self.commanders[1]) {
            (Some(_), None) => Some(Color::Red),
            (None, Some(_)) => Some(Color::Blue),
            _ => None,
        }
    }

    /// True when no further moves are accepted: a commander is captured,
    /// the side to move is mated or stalemated, or the game is drawn.
    #[must_use]
    pub fn is_game_over(&mut self) -> bool {
        self.winner().is_some() || self.is_draw() || self.generate_moves().is_empty()
    }

    /// The moves played so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<super::types::Move> {
        self.history.iter().map(|entry| entry.mv.clone()).collect()
    }

    /// SAN strings of the moves played so far.
    #[must_use]
    pub fn history_sans(&self) -> Vec<String> {
        self.history.iter().map(|entry| entry.san.clone()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
