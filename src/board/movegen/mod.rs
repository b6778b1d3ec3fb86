//! Move generation: per-kind movement configs and the pseudo-legal →
//! legal pipeline.

mod walk;

use super::cache;
use super::state::Board;
use super::types::{Move, MoveFilter, MoveRecord, Piece, PieceKind, Square};

/// Sentinel range for the commander's unlimited orthogonal slide.
pub(crate) const UNLIMITED: u8 = u8::MAX;

/// Per-kind movement parameters. Heroic status grants diagonal movement
/// and +1 to every finite range.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MoveConfig {
    pub move_range: u8,
    pub capture_range: u8,
    pub diagonal: bool,
    pub diag_move_range: u8,
    pub diag_capture_range: u8,
    pub capture_ignores_blocking: bool,
    pub move_ignores_blocking: bool,
}

impl MoveConfig {
    /// Uniform config: same ranges on every allowed direction.
    const fn uniform(
        range: u8,
        diagonal: bool,
        capture_ignores_blocking: bool,
        move_ignores_blocking: bool,
    ) -> Self {
        MoveConfig {
            move_range: range,
            capture_range: range,
            diagonal,
            diag_move_range: range,
            diag_capture_range: range,
            capture_ignores_blocking,
            move_ignores_blocking,
        }
    }
}

pub(crate) fn move_config(kind: PieceKind, heroic: bool) -> MoveConfig {
    let h = u8::from(heroic);
    match kind {
        PieceKind::Commander => MoveConfig {
            move_range: UNLIMITED,
            capture_range: 1 + h,
            diagonal: heroic,
            diag_move_range: UNLIMITED,
            diag_capture_range: 1 + h,
            capture_ignores_blocking: false,
            move_ignores_blocking: false,
        },
        PieceKind::Infantry | PieceKind::Engineer | PieceKind::AntiAir => {
            MoveConfig::uniform(1 + h, heroic, false, false)
        }
        PieceKind::Militia => MoveConfig::uniform(1 + h, true, false, false),
        PieceKind::Tank => MoveConfig::uniform(2 + h, heroic, true, false),
        PieceKind::Artillery => MoveConfig::uniform(3 + h, true, true, false),
        PieceKind::Missile => MoveConfig {
            move_range: 2 + h,
            capture_range: 2 + h,
            diagonal: true,
            diag_move_range: 1 + h,
            diag_capture_range: 1 + h,
            capture_ignores_blocking: true,
            move_ignores_blocking: false,
        },
        PieceKind::AirForce => MoveConfig::uniform(4 + h, true, true, true),
        PieceKind::Navy => MoveConfig::uniform(4 + h, true, true, false),
        PieceKind::Headquarter => {
            if heroic {
                MoveConfig::uniform(1, true, false, false)
            } else {
                MoveConfig::uniform(0, false, false, false)
            }
        }
    }
}

impl Board {
    /// All pseudo-legal moves for the side to move, deterministically
    /// ordered. While a deploy session is active only sub-moves of the
    /// session stack are produced.
    pub(crate) fn pseudo_legal_moves(&mut self, filter: &MoveFilter) -> Vec<Move> {
        let ad = self.air_defense();
        let mut out = Vec::new();

        if let Some(session_square) = self.deploy_session.as_ref().map(|s| s.stack_square) {
            if filter.square.map_or(true, |f| f == session_square) {
                if let Some(stack_piece) = self.get(session_square).cloned() {
                    for unit in stack_piece.flatten_units() {
                        walk::piece_moves(self, &ad, session_square, &unit, true, &mut out);
                    }
                }
            }
        } else {
            let own: Vec<(Square, Piece)> = self
                .pieces_of(self.turn)
                .into_iter()
                .map(|(sq, p)| (sq, p.clone()))
                .collect();
            for (sq, piece) in own {
                if let Some(f) = filter.square {
                    if f != sq {
                        continue;
                    }
                }
                walk::piece_moves(self, &ad, sq, &piece, false, &mut out);
                if piece.is_stack() {
                    for unit in piece.flatten_units() {
                        walk::piece_moves(self, &ad, sq, &unit, true, &mut out);
                    }
                }
            }
        }

        if let Some(kind) = filter.kind {
            out.retain(|m| m.piece.kind == kind);
        }
        out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        out.dedup_by(|a, b| a.same_shape(b));
        out
    }

    /// All legal moves for the side to move.
    #[must_use]
    pub fn generate_moves(&mut self) -> Vec<Move> {
        self.moves_for(&MoveFilter::default())
    }

    /// Legal moves from one square.
    #[must_use]
    pub fn moves_from(&mut self, square: Square) -> Vec<Move> {
        self.moves_for(&MoveFilter::from_square(square))
    }

    /// Legal moves matching a filter. Results are cached against the
    /// serialized position until the next mutation.
    #[must_use]
    pub fn moves_for(&mut self, filter: &MoveFilter) -> Vec<Move> {
        let key = cache::digest(&self.position_key(), filter);
        if let Some(hit) = self.move_cache.get(key) {
            return hit.clone();
        }
        let pseudo = self.pseudo_legal_moves(filter);
        let mut legal = Vec::with_capacity(pseudo.len());
        for mv in pseudo {
            if self.move_is_legal(&mv) {
                legal.push(mv);
            }
        }
        self.move_cache.insert(key, legal.clone());
        legal
    }

    /// Legal moves with SAN/LAN and before/after FENs attached.
    #[must_use]
    pub fn verbose_moves(&mut self, filter: &MoveFilter) -> Vec<MoveRecord> {
        let before = self.to_fen();
        let moves = self.moves_for(filter);
        moves
            .into_iter()
            .map(|mv| {
                let san = self.move_to_san(&mv);
                let lan = self.move_to_lan(&mv);
                let mut probe = self.clone();
                let after = match probe.apply_move_internal(&mv, false) {
                    Ok(_) => probe.to_fen(),
                    Err(_) => before.clone(),
                };
                MoveRecord {
                    mv,
                    san,
                    lan,
                    before: before.clone(),
                    after,
                }
            })
            .collect()
    }

    /// A pseudo-legal move is legal when, after applying it, the mover
    /// still has its commander, the commander is not attacked, and the two
    /// commanders are not exposed to each other.
    pub(crate) fn move_is_legal(&mut self, mv: &Move) -> bool {
        let color = mv.piece.color;
        let had_commander = self.commanders[color.index()].is_some();
        let Ok(actions) = self.apply_move_internal(mv, true) else {
            return false;
        };
        let ok = match self.commanders[color.index()] {
            None => !had_commander,
            Some(sq) => {
                let enemy = color.opponent();
                let exposed = self.commanders[enemy.index()].is_some() && self.commanders_exposed();
                !exposed && !self.is_square_attacked(sq, enemy)
            }
        };
        self.undo_actions(actions);
        ok
    }

    /// Count leaf nodes of the legal move tree to a fixed depth.
    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in &moves {
            if let Ok(actions) = self.apply_move_internal(mv, false) {
                nodes += self.perft(depth - 1);
                self.undo_actions(actions);
            }
        }
        nodes
    }
}
