//! Terrain zone masks and the heavy-piece river-crossing rules.
//!
//! Files a-b plus the river mouth (d5, d6, e5, e6) are navigable water;
//! files c-k are land, so file c and the river mouth are mixed terrain.
//! The four bridge squares f6, f7, h6, h7 are ordinary land squares whose
//! files carry heavy pieces across the river.

use once_cell::sync::Lazy;

use super::types::{PieceKind, Square, BOARD_SLOTS};

static NAVY_MASK: Lazy<[bool; BOARD_SLOTS]> = Lazy::new(|| {
    let mut mask = [false; BOARD_SLOTS];
    for (idx, slot) in mask.iter_mut().enumerate() {
        if let Some(sq) = Square::try_from_index(idx) {
            let file = sq.file();
            let rank = sq.rank();
            *slot = file <= 2 || ((file == 3 || file == 4) && (rank == 4 || rank == 5));
        }
    }
    mask
});

static LAND_MASK: Lazy<[bool; BOARD_SLOTS]> = Lazy::new(|| {
    let mut mask = [false; BOARD_SLOTS];
    for (idx, slot) in mask.iter_mut().enumerate() {
        if let Some(sq) = Square::try_from_index(idx) {
            *slot = sq.file() >= 2;
        }
    }
    mask
});

#[inline]
#[must_use]
pub fn is_navy_square(sq: Square) -> bool {
    NAVY_MASK[sq.index()]
}

#[inline]
#[must_use]
pub fn is_land_square(sq: Square) -> bool {
    LAND_MASK[sq.index()]
}

/// Bridge squares: f6, f7, h6, h7.
#[inline]
#[must_use]
pub fn is_bridge_square(sq: Square) -> bool {
    let file = sq.file();
    let rank = sq.rank();
    (file == 5 || file == 7) && (rank == 5 || rank == 6)
}

/// Residency test: where a piece of this kind may stand or land.
/// AirForce flies over anything while moving but lands on land squares.
#[inline]
#[must_use]
pub(crate) fn can_stay(kind: PieceKind, sq: Square) -> bool {
    if kind == PieceKind::Navy {
        is_navy_square(sq)
    } else {
        is_land_square(sq)
    }
}

/// Heavy-piece zones: 0 = files a-b, 1 = files c-k above the river
/// (ranks 7-12), 2 = files c-k below it (ranks 1-6).
#[inline]
#[must_use]
pub(crate) fn heavy_zone(sq: Square) -> u8 {
    if sq.file() <= 1 {
        0
    } else if sq.rank() >= 6 {
        1
    } else {
        2
    }
}

/// Whether a single ray step of a heavy piece is allowed with respect to
/// the river. Crossing between zones 1 and 2 must run straight along file
/// f or h; any other crossing blocks movement (capture of the first enemy
/// beyond the bank is still permitted by the generator).
#[inline]
#[must_use]
pub(crate) fn heavy_step_allowed(from: Square, to: Square) -> bool {
    let zf = heavy_zone(from);
    let zt = heavy_zone(to);
    if zf == zt || zf == 0 || zt == 0 {
        return true;
    }
    let file = from.file();
    file == to.file() && (file == 5 || file == 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_water_files_are_navy_only() {
        assert!(is_navy_square(sq("a1")));
        assert!(is_navy_square(sq("b12")));
        assert!(!is_land_square(sq("a5")));
        assert!(!is_land_square(sq("b7")));
    }

    #[test]
    fn test_file_c_is_mixed() {
        assert!(is_navy_square(sq("c4")));
        assert!(is_land_square(sq("c4")));
    }

    #[test]
    fn test_river_mouth_is_mixed() {
        for s in ["d5", "d6", "e5", "e6"] {
            assert!(is_navy_square(sq(s)), "{s} should be navigable");
            assert!(is_land_square(sq(s)), "{s} should be land");
        }
        assert!(!is_navy_square(sq("d4")));
        assert!(!is_navy_square(sq("e7")));
        assert!(!is_navy_square(sq("f5")));
    }

    #[test]
    fn test_bridge_squares() {
        for s in ["f6", "f7", "h6", "h7"] {
            assert!(is_bridge_square(sq(s)), "{s} should be a bridge");
            assert!(is_land_square(sq(s)));
        }
        assert!(!is_bridge_square(sq("g6")));
        assert!(!is_bridge_square(sq("f5")));
    }

    #[test]
    fn test_heavy_zones() {
        assert_eq!(heavy_zone(sq("a3")), 0);
        assert_eq!(heavy_zone(sq("b10")), 0);
        assert_eq!(heavy_zone(sq("c7")), 1);
        assert_eq!(heavy_zone(sq("k12")), 1);
        assert_eq!(heavy_zone(sq("c6")), 2);
        assert_eq!(heavy_zone(sq("k1")), 2);
    }

    #[test]
    fn test_heavy_crossing_needs_a_bridge_file() {
        // straight over a bridge file
        assert!(heavy_step_allowed(sq("f6"), sq("f7")));
        assert!(heavy_step_allowed(sq("h7"), sq("h6")));
        // straight over a non-bridge file
        assert!(!heavy_step_allowed(sq("g6"), sq("g7")));
        // diagonal crossings are never allowed
        assert!(!heavy_step_allowed(sq("f6"), sq("g7")));
        assert!(!heavy_step_allowed(sq("g6"), sq("f7")));
        // same-zone steps are unrestricted
        assert!(heavy_step_allowed(sq("g5"), sq("g6")));
        assert!(heavy_step_allowed(sq("g7"), sq("g8")));
    }
}
