//! Move flags, internal move records, and the verbose move report.

use std::fmt;
use std::ops::BitOr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceKind};
use super::square::Square;

/// Bit-set of move properties.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveFlags(u8);

impl MoveFlags {
    /// Plain relocation to an empty square.
    pub const NORMAL: MoveFlags = MoveFlags(1);
    /// Capture that relocates the attacker.
    pub const CAPTURE: MoveFlags = MoveFlags(2);
    /// Capture in which the attacker does not relocate.
    pub const STAY_CAPTURE: MoveFlags = MoveFlags(4);
    /// Capture in which both attacker and target are removed.
    pub const SUICIDE_CAPTURE: MoveFlags = MoveFlags(8);
    /// Sub-move dispatching a piece out of a stack.
    pub const DEPLOY: MoveFlags = MoveFlags(16);
    /// Move onto a friendly piece forming a stack.
    pub const COMBINATION: MoveFlags = MoveFlags(32);

    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        MoveFlags(0)
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True for any of the three capture variants.
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.0 & (Self::CAPTURE.0 | Self::STAY_CAPTURE.0 | Self::SUICIDE_CAPTURE.0) != 0
    }
}

impl BitOr for MoveFlags {
    type Output = MoveFlags;

    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::NORMAL) {
            names.push("NORMAL");
        }
        if self.contains(Self::CAPTURE) {
            names.push("CAPTURE");
        }
        if self.contains(Self::STAY_CAPTURE) {
            names.push("STAY_CAPTURE");
        }
        if self.contains(Self::SUICIDE_CAPTURE) {
            names.push("SUICIDE_CAPTURE");
        }
        if self.contains(Self::DEPLOY) {
            names.push("DEPLOY");
        }
        if self.contains(Self::COMBINATION) {
            names.push("COMBINATION");
        }
        write!(f, "{}", names.join("|"))
    }
}

/// An internal move record: the moving piece (a lone piece, a whole stack,
/// or a deployed sub-piece), its squares, what it captured or combined
/// with, and the flag set describing the move shape.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub combined: Option<Piece>,
    pub flags: MoveFlags,
}

impl Move {
    #[inline]
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.flags.is_capture()
    }

    #[inline]
    #[must_use]
    pub fn is_deploy(&self) -> bool {
        self.flags.contains(MoveFlags::DEPLOY)
    }

    #[inline]
    #[must_use]
    pub fn is_stay_capture(&self) -> bool {
        self.flags.contains(MoveFlags::STAY_CAPTURE)
    }

    #[inline]
    #[must_use]
    pub fn is_suicide_capture(&self) -> bool {
        self.flags.contains(MoveFlags::SUICIDE_CAPTURE)
    }

    #[inline]
    #[must_use]
    pub fn is_combination(&self) -> bool {
        self.flags.contains(MoveFlags::COMBINATION)
    }

    /// True when the moving piece ends up somewhere other than `from`.
    #[inline]
    #[must_use]
    pub fn relocates(&self) -> bool {
        !self.is_stay_capture() && !self.is_suicide_capture()
    }

    /// Sort key giving the generator a deterministic output order.
    #[inline]
    #[must_use]
    pub(crate) fn sort_key(&self) -> (usize, usize, usize, u8) {
        (
            self.from.index(),
            self.to.index(),
            self.piece.kind.index(),
            self.flags.bits(),
        )
    }

    /// True when `self` and `other` describe the same (from, to, kind,
    /// flag-set) move, regardless of captured/combined payloads.
    #[must_use]
    pub fn same_shape(&self, other: &Move) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.piece.kind == other.piece.kind
            && self.flags == other.flags
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Filter for targeted move generation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MoveFilter {
    pub square: Option<Square>,
    pub kind: Option<PieceKind>,
}

impl MoveFilter {
    #[must_use]
    pub const fn from_square(square: Square) -> Self {
        MoveFilter {
            square: Some(square),
            kind: None,
        }
    }
}

/// Verbose move report returned by the mutating API: the internal record
/// plus notations and the positions on either side of it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveRecord {
    pub mv: Move,
    pub san: String,
    pub lan: String,
    pub before: String,
    pub after: String,
}
