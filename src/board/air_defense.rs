//! Air-defense influence field.
//!
//! AntiAir, Missile, and Navy pieces each project a circular influence of
//! radius `level` (Euclidean squared) around their square; heroic status
//! adds one to the level. The field stores, per color, how many sources
//! cover each square. Only AirForce movement consults it.

use super::state::Board;
use super::types::{Color, Square, BOARD_FILES, BOARD_RANKS, BOARD_SLOTS};

/// Per-square counts of influence sources for each color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AirDefenseField {
    counts: [[u8; BOARD_SLOTS]; 2],
}

impl AirDefenseField {
    /// Recompute the field from scratch. Only board-level pieces project;
    /// carried pieces are cargo until deployed.
    pub(crate) fn compute(board: &Board) -> Self {
        let mut field = AirDefenseField {
            counts: [[0; BOARD_SLOTS]; 2],
        };
        for (sq, piece) in board.occupied_squares() {
            let base = piece.kind.air_defense_level();
            if base == 0 {
                continue;
            }
            let level = i32::from(base) + i32::from(piece.heroic);
            field.add_source(piece.color, sq, level);
        }
        field
    }

    fn add_source(&mut self, color: Color, center: Square, level: i32) {
        let cf = center.file() as i32;
        let cr = center.rank() as i32;
        for dr in -level..=level {
            for df in -level..=level {
                if dr * dr + df * df > level * level {
                    continue;
                }
                let file = cf + df;
                let rank = cr + dr;
                if (0..BOARD_FILES as i32).contains(&file)
                    && (0..BOARD_RANKS as i32).contains(&rank)
                {
                    let sq = Square::new(file as usize, rank as usize);
                    self.counts[color.index()][sq.index()] += 1;
                }
            }
        }
    }

    /// Number of `color` sources covering `sq`.
    #[inline]
    pub(crate) fn sources(&self, color: Color, sq: Square) -> u8 {
        self.counts[color.index()][sq.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{Piece, PieceKind};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_antiair_covers_radius_one() {
        let mut board = Board::empty();
        board
            .put(Piece::new(PieceKind::AntiAir, Color::Blue), sq("e5"))
            .unwrap();
        let field = AirDefenseField::compute(&board);

        assert_eq!(field.sources(Color::Blue, sq("e5")), 1);
        assert_eq!(field.sources(Color::Blue, sq("d5")), 1);
        assert_eq!(field.sources(Color::Blue, sq("e6")), 1);
        // radius 1 excludes diagonals (1 + 1 > 1)
        assert_eq!(field.sources(Color::Blue, sq("d4")), 0);
        assert_eq!(field.sources(Color::Blue, sq("e7")), 0);
        assert_eq!(field.sources(Color::Red, sq("e5")), 0);
    }

    #[test]
    fn test_missile_covers_radius_two() {
        let mut board = Board::empty();
        board
            .put(Piece::new(PieceKind::Missile, Color::Blue), sq("e5"))
            .unwrap();
        let field = AirDefenseField::compute(&board);

        assert_eq!(field.sources(Color::Blue, sq("e7")), 1);
        assert_eq!(field.sources(Color::Blue, sq("d4")), 1);
        assert_eq!(field.sources(Color::Blue, sq("g5")), 1);
        // 2² + 1² > 2²
        assert_eq!(field.sources(Color::Blue, sq("g6")), 0);
    }

    #[test]
    fn test_heroic_extends_the_level() {
        let mut board = Board::empty();
        board
            .put(
                Piece::new(PieceKind::AntiAir, Color::Blue).promoted(),
                sq("e5"),
            )
            .unwrap();
        let field = AirDefenseField::compute(&board);
        assert_eq!(field.sources(Color::Blue, sq("e7")), 1);
        assert_eq!(field.sources(Color::Blue, sq("d4")), 1);
    }

    #[test]
    fn test_sources_accumulate() {
        let mut board = Board::empty();
        board
            .put(Piece::new(PieceKind::AntiAir, Color::Blue), sq("d5"))
            .unwrap();
        board
            .put(Piece::new(PieceKind::Missile, Color::Blue), sq("e4"))
            .unwrap();
        let field = AirDefenseField::compute(&board);
        // d4 is adjacent to the anti-air and within the missile circle
        assert_eq!(field.sources(Color::Blue, sq("d4")), 2);
    }

    #[test]
    fn test_carried_pieces_do_not_project() {
        let mut board = Board::empty();
        let stack = Piece::new(PieceKind::Engineer, Color::Blue)
            .carrying(vec![Piece::new(PieceKind::AntiAir, Color::Blue)]);
        board.put(stack, sq("e5")).unwrap();
        let field = AirDefenseField::compute(&board);
        assert_eq!(field.sources(Color::Blue, sq("e5")), 0);
    }

    #[test]
    fn test_navy_projects_from_water() {
        let mut board = Board::empty();
        board
            .put(Piece::new(PieceKind::Navy, Color::Blue), sq("b5"))
            .unwrap();
        let field = AirDefenseField::compute(&board);
        assert_eq!(field.sources(Color::Blue, sq("c5")), 1);
        assert_eq!(field.sources(Color::Blue, sq("b4")), 1);
    }
}
