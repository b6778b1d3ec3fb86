//! Error types for board operations.

use std::fmt;

use super::types::{Color, PieceKind, Square};

/// Error type for FEN parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs 6 plus an optional deploy tag)
    MissingFields { found: usize },
    /// Board field does not have exactly 12 ranks
    WrongRankCount { found: usize },
    /// A rank does not describe exactly 11 files
    RankWidth { rank: usize, files: usize },
    /// Unbalanced stack parentheses
    UnmatchedParen { rank: usize },
    /// `+` not followed by a piece letter
    OrphanHeroic { rank: usize },
    /// Unknown piece letter
    InvalidPiece { char: char },
    /// Side to move is not `r` or `b`
    InvalidTurn { found: String },
    /// Castling / en-passant fields are reserved and must be `-`
    InvalidReservedField { found: String },
    /// Half-move or move-number field is not a valid count
    InvalidCounter { field: &'static str, found: String },
    /// Malformed deploy session tag
    InvalidDeployTag { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingFields { found } => {
                write!(f, "FEN must have at least 6 fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN board must have 12 ranks, found {found}")
            }
            FenError::RankWidth { rank, files } => {
                write!(f, "rank {rank} describes {files} files, expected 11")
            }
            FenError::UnmatchedParen { rank } => {
                write!(f, "unmatched stack parenthesis in rank {rank}")
            }
            FenError::OrphanHeroic { rank } => {
                write!(f, "'+' without a following piece letter in rank {rank}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "invalid piece character '{char}' in FEN")
            }
            FenError::InvalidTurn { found } => {
                write!(f, "invalid side to move '{found}', expected 'r' or 'b'")
            }
            FenError::InvalidReservedField { found } => {
                write!(f, "reserved field must be '-', found '{found}'")
            }
            FenError::InvalidCounter { field, found } => {
                write!(f, "invalid {field} counter '{found}'")
            }
            FenError::InvalidDeployTag { found } => {
                write!(f, "invalid deploy tag '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for square parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 1-12)
    RankOutOfBounds { rank: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "rank {rank} out of bounds (must be 1-12)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for invalid piece placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Piece cannot reside on that terrain
    Terrain { kind: PieceKind, square: Square },
    /// A side may have at most one commander on the board
    DuplicateCommander { color: Color },
    /// Stack violates its carrier blueprint or capacity
    InvalidStack { carrier: PieceKind },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::Terrain { kind, square } => {
                write!(f, "{kind} cannot stand on {square}")
            }
            PlacementError::DuplicateCommander { color } => {
                write!(f, "{color} already has a commander on the board")
            }
            PlacementError::InvalidStack { carrier } => {
                write!(f, "invalid stack under carrier {carrier}")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Error type for stack algebra failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// The pieces cannot form a legal stack
    CannotCombine {
        carrier: PieceKind,
        incoming: PieceKind,
    },
    /// Requested piece kind is not in the stack
    AbsentPiece { kind: PieceKind },
    /// Operation on an empty stack
    EmptyStack,
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::CannotCombine { carrier, incoming } => {
                write!(f, "{incoming} cannot combine under carrier {carrier}")
            }
            StackError::AbsentPiece { kind } => {
                write!(f, "stack holds no {kind}")
            }
            StackError::EmptyStack => write!(f, "operation on empty stack"),
        }
    }
}

impl std::error::Error for StackError {}

/// Error type for move notation that cannot be tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Empty move string
    Empty,
    /// Unknown piece letter
    BadPiece { char: char },
    /// Destination square cannot be parsed
    BadSquare { notation: String },
    /// Move string is structurally malformed
    Syntax { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::Empty => write!(f, "empty move string"),
            MoveParseError::BadPiece { char } => {
                write!(f, "invalid piece character '{char}' in move")
            }
            MoveParseError::BadSquare { notation } => {
                write!(f, "invalid square in move '{notation}'")
            }
            MoveParseError::Syntax { notation } => {
                write!(f, "cannot parse move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Why a syntactically valid move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveKind {
    LeavesCommanderInCheck,
    ExposesCommander,
    Terrain,
    AirDefense,
    Range,
    Blocking,
    CarrierRule,
    DeployPhaseMismatch,
    /// No generated legal move matches the request
    NoMatch,
    /// More than one legal move matches the request
    Ambiguous,
}

impl fmt::Display for IllegalMoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            IllegalMoveKind::LeavesCommanderInCheck => "leaves commander in check",
            IllegalMoveKind::ExposesCommander => "exposes commander",
            IllegalMoveKind::Terrain => "terrain violation",
            IllegalMoveKind::AirDefense => "blocked by air defense",
            IllegalMoveKind::Range => "out of range",
            IllegalMoveKind::Blocking => "path is blocked",
            IllegalMoveKind::CarrierRule => "violates carrier rules",
            IllegalMoveKind::DeployPhaseMismatch => "conflicts with the active deploy session",
            IllegalMoveKind::NoMatch => "no matching legal move",
            IllegalMoveKind::Ambiguous => "ambiguous move",
        };
        write!(f, "{reason}")
    }
}

/// Error type for deploy request failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// A session is active for a different stack square
    WrongSquare { active: Square, requested: Square },
    /// A batch sub-move is not in the legal move list
    SubMoveIllegal { kind: PieceKind, to: Square },
    /// The requested stay residue cannot be resolved uniquely
    AmbiguousResidue,
    /// The stay residue does not equal the undeployed remainder
    ResidueMismatch,
    /// The undeployed remainder cannot form a single valid stack
    ResidueNotCombinable,
    /// No deploy session is active
    NoSession,
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::WrongSquare { active, requested } => {
                write!(f, "deploy session active at {active}, requested {requested}")
            }
            DeployError::SubMoveIllegal { kind, to } => {
                write!(f, "deploy sub-move {kind}>{to} is not legal")
            }
            DeployError::AmbiguousResidue => write!(f, "ambiguous deploy residue"),
            DeployError::ResidueMismatch => {
                write!(f, "stay residue does not match the undeployed remainder")
            }
            DeployError::ResidueNotCombinable => {
                write!(f, "undeployed remainder cannot form a valid stack")
            }
            DeployError::NoSession => write!(f, "no deploy session is active"),
        }
    }
}

impl std::error::Error for DeployError {}

/// The error surfaced by the mutating public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The game is already over
    GameOver,
    /// The move string could not be tokenized
    Parse(MoveParseError),
    /// The move is well-formed but not legal
    Illegal {
        notation: String,
        cause: IllegalMoveKind,
    },
    /// A deploy request failed
    Deploy(DeployError),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver => write!(f, "the game is over"),
            MoveError::Parse(e) => write!(f, "{e}"),
            MoveError::Illegal { notation, cause } => {
                write!(f, "illegal move '{notation}': {cause}")
            }
            MoveError::Deploy(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MoveError {}

impl From<MoveParseError> for MoveError {
    fn from(e: MoveParseError) -> Self {
        MoveError::Parse(e)
    }
}

impl From<DeployError> for MoveError {
    fn from(e: DeployError) -> Self {
        MoveError::Deploy(e)
    }
}
