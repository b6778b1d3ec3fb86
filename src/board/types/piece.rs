//! Piece kinds, colors, and the piece value type (including stacks).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The eleven CoTuLenh piece kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Commander,
    Infantry,
    Tank,
    Militia,
    Engineer,
    Artillery,
    AntiAir,
    Missile,
    AirForce,
    Navy,
    Headquarter,
}

/// All piece kinds in canonical (letter-table) order.
pub(crate) const PIECE_KINDS: [PieceKind; 11] = [
    PieceKind::Commander,
    PieceKind::Infantry,
    PieceKind::Tank,
    PieceKind::Militia,
    PieceKind::Engineer,
    PieceKind::Artillery,
    PieceKind::AntiAir,
    PieceKind::Missile,
    PieceKind::AirForce,
    PieceKind::Navy,
    PieceKind::Headquarter,
];

impl PieceKind {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            PieceKind::Commander => 0,
            PieceKind::Infantry => 1,
            PieceKind::Tank => 2,
            PieceKind::Militia => 3,
            PieceKind::Engineer => 4,
            PieceKind::Artillery => 5,
            PieceKind::AntiAir => 6,
            PieceKind::Missile => 7,
            PieceKind::AirForce => 8,
            PieceKind::Navy => 9,
            PieceKind::Headquarter => 10,
        }
    }

    /// Parse a piece kind from its letter (either case).
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'C' => Some(PieceKind::Commander),
            'I' => Some(PieceKind::Infantry),
            'T' => Some(PieceKind::Tank),
            'M' => Some(PieceKind::Militia),
            'E' => Some(PieceKind::Engineer),
            'A' => Some(PieceKind::Artillery),
            'G' => Some(PieceKind::AntiAir),
            'S' => Some(PieceKind::Missile),
            'F' => Some(PieceKind::AirForce),
            'N' => Some(PieceKind::Navy),
            'H' => Some(PieceKind::Headquarter),
            _ => None,
        }
    }

    /// The uppercase letter for this kind.
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Commander => 'C',
            PieceKind::Infantry => 'I',
            PieceKind::Tank => 'T',
            PieceKind::Militia => 'M',
            PieceKind::Engineer => 'E',
            PieceKind::Artillery => 'A',
            PieceKind::AntiAir => 'G',
            PieceKind::Missile => 'S',
            PieceKind::AirForce => 'F',
            PieceKind::Navy => 'N',
            PieceKind::Headquarter => 'H',
        }
    }

    /// Letter with case encoding the color (uppercase for Red).
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::Red {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }

    /// Heavy pieces are subject to the river-crossing zone rules.
    #[inline]
    #[must_use]
    pub const fn is_heavy(self) -> bool {
        matches!(
            self,
            PieceKind::Artillery | PieceKind::AntiAir | PieceKind::Missile
        )
    }

    /// Base air-defense influence radius contributed by this kind.
    /// Zero means the kind projects no influence.
    #[inline]
    #[must_use]
    pub(crate) const fn air_defense_level(self) -> u8 {
        match self {
            PieceKind::AntiAir | PieceKind::Navy => 1,
            PieceKind::Missile => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The two sides.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// The FEN side-to-move letter (`r` / `b`).
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Blue => 'b',
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Blue => write!(f, "Blue"),
        }
    }
}

/// A piece value. A piece with a non-empty `carrying` list is a stack: the
/// outer piece is the carrier and the inner pieces are carried. Carried
/// pieces keep their own heroic flag but never carry anything themselves.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub heroic: bool,
    pub carrying: Vec<Piece>,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            heroic: false,
            carrying: Vec::new(),
        }
    }

    /// Builder-style heroic marker.
    #[must_use]
    pub fn promoted(mut self) -> Self {
        self.heroic = true;
        self
    }

    /// Builder-style cargo assignment. The caller is responsible for
    /// blueprint validity; `Board::put` revalidates.
    #[must_use]
    pub fn carrying(mut self, pieces: Vec<Piece>) -> Self {
        self.carrying = pieces;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_stack(&self) -> bool {
        !self.carrying.is_empty()
    }

    /// Total number of pieces in the flattened stack (1 for a lone piece).
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.carrying.len()
    }

    /// Carrier-first ordered sequence of all pieces in the stack.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Piece> {
        let mut out = Vec::with_capacity(self.count());
        out.push(self);
        out.extend(self.carrying.iter());
        out
    }

    /// Carrier-first owned units: the carrier stripped of its cargo,
    /// followed by clones of each carried piece.
    #[must_use]
    pub fn flatten_units(&self) -> Vec<Piece> {
        let mut out = Vec::with_capacity(self.count());
        let mut carrier = self.clone();
        carrier.carrying.clear();
        out.push(carrier);
        out.extend(self.carrying.iter().cloned());
        out
    }

    /// True if the carrier or any carried piece is a commander.
    #[must_use]
    pub(crate) fn contains_commander(&self) -> bool {
        self.kind == PieceKind::Commander
            || self.carrying.iter().any(|p| p.kind == PieceKind::Commander)
    }

    /// SAN-style rendering: `+` prefix for heroic, parentheses for stacks
    /// (carrier first), letter case encoding the color.
    #[must_use]
    pub fn to_san(&self) -> String {
        fn unit(p: &Piece, out: &mut String) {
            if p.heroic {
                out.push('+');
            }
            out.push(p.kind.to_fen_char(p.color));
        }
        let mut out = String::new();
        if self.is_stack() {
            out.push('(');
            for p in self.flatten() {
                unit(p, &mut out);
            }
            out.push(')');
        } else {
            unit(self, &mut out);
        }
        out
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_san())
    }
}
