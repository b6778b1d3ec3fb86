//! Attack detection, check, and commander exposure.

use super::air_defense::AirDefenseField;
use super::movegen::move_config;
use super::state::Board;
use super::terrain;
use super::types::{
    Color, Piece, PieceKind, Square, DIAGONAL_OFFSETS, ORTHOGONAL_OFFSETS,
};

impl Board {
    /// Whether `piece` standing on `from` attacks `target` with its normal
    /// capture pattern. Flying-general reach is deliberately excluded: it
    /// is a move, not a standing threat.
    pub(crate) fn attacks_square(
        &self,
        ad: &AirDefenseField,
        from: Square,
        piece: &Piece,
        target: Square,
    ) -> bool {
        let cfg = move_config(piece.kind, piece.heroic);
        if cfg.capture_range == 0 {
            return false;
        }
        let is_air = piece.kind == PieceKind::AirForce;
        // A square under two or more defending sources cannot be entered
        // at all, so nothing there is threatened by an air force.
        if is_air && ad.sources(piece.color.opponent(), target) >= 2 {
            return false;
        }

        for &offset in &ORTHOGONAL_OFFSETS {
            if self.ray_attacks(ad, from, piece, &cfg, offset, false, target) {
                return true;
            }
        }
        if cfg.diagonal {
            for &offset in &DIAGONAL_OFFSETS {
                if self.ray_attacks(ad, from, piece, &cfg, offset, true, target) {
                    return true;
                }
            }
        }
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn ray_attacks(
        &self,
        ad: &AirDefenseField,
        from: Square,
        piece: &Piece,
        cfg: &super::movegen::MoveConfig,
        offset: i16,
        diagonal: bool,
        target: Square,
    ) -> bool {
        let capture_range = if diagonal {
            cfg.diag_capture_range
        } else {
            cfg.capture_range
        };
        let is_air = piece.kind == PieceKind::AirForce;
        let mut river_capture_only = false;
        let mut cur = from;
        for _ in 0..capture_range {
            let prev = cur;
            let Some(to) = prev.offset(offset) else {
                return false;
            };
            cur = to;
            if piece.kind.is_heavy() && !terrain::heavy_step_allowed(prev, to) {
                river_capture_only = true;
            }
            if to == target {
                return true;
            }
            if let Some(blocker) = self.get(to) {
                // Past the river only the first enemy piece is a target.
                if river_capture_only && blocker.color != piece.color {
                    return false;
                }
                if !cfg.capture_ignores_blocking {
                    return false;
                }
            }
            if is_air {
                if ad.sources(piece.color.opponent(), to) >= 1 {
                    return false;
                }
            } else if !terrain::can_stay(piece.kind, to) {
                return false;
            }
        }
        false
    }

    /// Whether any piece of `by` attacks `target`.
    pub(crate) fn is_square_attacked(&mut self, target: Square, by: Color) -> bool {
        let ad = self.air_defense();
        let pieces: Vec<(Square, Piece)> = self
            .pieces_of(by)
            .into_iter()
            .map(|(sq, p)| (sq, p.clone()))
            .collect();
        pieces
            .iter()
            .any(|(sq, p)| self.attacks_square(&ad, *sq, p, target))
    }

    /// All pieces of `by` attacking `target`, as (square, kind) pairs.
    #[must_use]
    pub fn attackers(&mut self, target: Square, by: Color) -> Vec<(Square, PieceKind)> {
        let ad = self.air_defense();
        let pieces: Vec<(Square, Piece)> = self
            .pieces_of(by)
            .into_iter()
            .map(|(sq, p)| (sq, p.clone()))
            .collect();
        pieces
            .iter()
            .filter(|(sq, p)| self.attacks_square(&ad, *sq, p, target))
            .map(|(sq, p)| (*sq, p.kind))
            .collect()
    }

    /// Whether `color`'s commander is attacked.
    #[must_use]
    pub fn in_check(&mut self, color: Color) -> bool {
        match self.commander_square(color) {
            Some(sq) => self.is_square_attacked(sq, color.opponent()),
            None => false,
        }
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub fn is_check(&mut self) -> bool {
        self.in_check(self.turn)
    }

    /// Checkmate: in check with no legal moves.
    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.is_check() && self.generate_moves().is_empty()
    }

    /// Stalemate: not in check but without a legal move.
    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.is_check() && self.generate_moves().is_empty()
    }

    /// True when the two commanders stand on a clear orthogonal line.
    pub(crate) fn commanders_exposed(&self) -> bool {
        let (Some(red), Some(blue)) = (
            self.commander_square(Color::Red),
            self.commander_square(Color::Blue),
        ) else {
            return false;
        };
        if !red.is_orthogonal_to(blue) {
            return false;
        }
        let offset: i16 = if red.file() == blue.file() {
            if blue.index() > red.index() {
                16
            } else {
                -16
            }
        } else if blue.index() > red.index() {
            1
        } else {
            -1
        };
        let mut cur = red;
        loop {
            let Some(next) = cur.offset(offset) else {
                return false;
            };
            cur = next;
            if cur == blue {
                return true;
            }
            if self.get(cur).is_some() {
                return false;
            }
        }
    }
}
