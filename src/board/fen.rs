//! Extended FEN: stacks in parentheses, `+` heroic marks, and an optional
//! deploy-session tag.
//!
//! Layout: `<board> <turn> - - <half_moves> <move_number> [D:<sq>:<moved>]`.
//! The board lists 12 ranks from rank 12 down to rank 1; digit runs count
//! empty squares (up to 11, so runs may be two digits wide).

use std::str::FromStr;

use super::deploy::DeploySession;
use super::error::FenError;
use super::state::Board;
use super::types::{Color, Piece, PieceKind, Square, BOARD_FILES, BOARD_RANKS};

/// The default starting formation: 20 pieces per side, navies on the
/// water files, commanders on file f behind their headquarters.
pub const DEFAULT_FEN: &str = "5c5/3fmhmf3/1nais1sia2/n1etg1gte2/11/11/11/11/N1ETG1GTE2/1NAIS1SIA2/3FMHMF3/5C5 r - - 0 1";

fn parse_unit(
    chars: &[char],
    i: &mut usize,
    display_rank: usize,
) -> Result<Piece, FenError> {
    let mut heroic = false;
    if chars[*i] == '+' {
        heroic = true;
        *i += 1;
        if *i >= chars.len() {
            return Err(FenError::OrphanHeroic { rank: display_rank });
        }
    }
    let c = chars[*i];
    if !c.is_ascii_alphabetic() {
        if heroic {
            return Err(FenError::OrphanHeroic { rank: display_rank });
        }
        return Err(FenError::InvalidPiece { char: c });
    }
    let kind = PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
    let color = if c.is_ascii_uppercase() {
        Color::Red
    } else {
        Color::Blue
    };
    *i += 1;
    let mut piece = Piece::new(kind, color);
    piece.heroic = heroic;
    Ok(piece)
}

impl Board {
    /// The default starting position.
    #[must_use]
    pub fn new() -> Self {
        Board::try_from_fen(DEFAULT_FEN).expect("default position is valid")
    }

    /// Parse a position from extended FEN.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(FenError::MissingFields { found: parts.len() });
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != BOARD_RANKS {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (row, rank_str) in ranks.iter().enumerate() {
            let display_rank = BOARD_RANKS - row;
            let chars: Vec<char> = rank_str.chars().collect();
            let mut i = 0;
            let mut file = 0usize;
            while i < chars.len() {
                let c = chars[i];
                if c.is_ascii_digit() {
                    let mut run = 0usize;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        run = run * 10 + (chars[i] as usize - '0' as usize);
                        i += 1;
                    }
                    file += run;
                } else if c == '(' {
                    i += 1;
                    let mut units: Vec<Piece> = Vec::new();
                    let mut closed = false;
                    while i < chars.len() {
                        if chars[i] == ')' {
                            closed = true;
                            i += 1;
                            break;
                        }
                        units.push(parse_unit(&chars, &mut i, display_rank)?);
                    }
                    if !closed || units.is_empty() {
                        return Err(FenError::UnmatchedParen { rank: display_rank });
                    }
                    let mut carrier = units.remove(0);
                    carrier.carrying = units;
                    if file >= BOARD_FILES {
                        return Err(FenError::RankWidth {
                            rank: display_rank,
                            files: file + 1,
                        });
                    }
                    board.write_slot(Square::new(file, display_rank - 1), Some(carrier));
                    file += 1;
                } else if c == ')' {
                    return Err(FenError::UnmatchedParen { rank: display_rank });
                } else {
                    let piece = parse_unit(&chars, &mut i, display_rank)?;
                    if file >= BOARD_FILES {
                        return Err(FenError::RankWidth {
                            rank: display_rank,
                            files: file + 1,
                        });
                    }
                    board.write_slot(Square::new(file, display_rank - 1), Some(piece));
                    file += 1;
                }
            }
            if file != BOARD_FILES {
                return Err(FenError::RankWidth {
                    rank: display_rank,
                    files: file,
                });
            }
        }

        board.turn = match parts[1] {
            "r" => Color::Red,
            "b" => Color::Blue,
            other => {
                return Err(FenError::InvalidTurn {
                    found: other.to_string(),
                })
            }
        };

        for reserved in [parts[2], parts[3]] {
            if reserved != "-" {
                return Err(FenError::InvalidReservedField {
                    found: reserved.to_string(),
                });
            }
        }

        board.half_moves = parts[4].parse().map_err(|_| FenError::InvalidCounter {
            field: "half_moves",
            found: parts[4].to_string(),
        })?;
        board.move_number = parts[5].parse().map_err(|_| FenError::InvalidCounter {
            field: "move_number",
            found: parts[5].to_string(),
        })?;
        if board.move_number == 0 {
            return Err(FenError::InvalidCounter {
                field: "move_number",
                found: parts[5].to_string(),
            });
        }

        if parts.len() >= 7 {
            let session = parse_deploy_tag(&board, parts[6])?;
            board.deploy_session = Some(session);
        }

        let key = board.position_key();
        board.repetitions.set(key, 1);
        Ok(board)
    }

    /// Parse a position from extended FEN.
    ///
    /// # Panics
    /// Panics on invalid input; use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("invalid FEN string")
    }

    /// Replace this game with the position parsed from `fen`.
    pub fn load(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Board::try_from_fen(fen)?;
        Ok(())
    }

    /// Reset to an empty board with Red to move.
    pub fn clear(&mut self) {
        *self = Board::empty();
    }

    /// The board field of the FEN, rank 12 first.
    fn board_field(&self) -> String {
        let mut ranks = Vec::with_capacity(BOARD_RANKS);
        for row in 0..BOARD_RANKS {
            let mut out = String::new();
            let mut empty = 0;
            for file in 0..BOARD_FILES {
                let sq = Square::new(file, BOARD_RANKS - 1 - row);
                match self.get(sq) {
                    None => empty += 1,
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push_str(&piece.to_san());
                    }
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            ranks.push(out);
        }
        ranks.join("/")
    }

    fn deploy_tag(&self) -> Option<String> {
        let session = self.deploy_session.as_ref()?;
        let letters: String = session
            .moved
            .iter()
            .map(|k| k.to_fen_char(session.turn))
            .collect();
        Some(format!("D:{}:{}", session.stack_square, letters))
    }

    /// Serialize the position to extended FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let tag = self
            .deploy_tag()
            .map(|t| format!(" {t}"))
            .unwrap_or_default();
        format!(
            "{} {} - - {} {}{}",
            self.board_field(),
            self.turn.to_char(),
            self.half_moves,
            self.move_number,
            tag
        )
    }

    /// The repetition key: board, side to move, and deploy state. Counters
    /// are deliberately excluded.
    #[must_use]
    pub fn position_key(&self) -> String {
        let tag = self
            .deploy_tag()
            .map(|t| format!(" {t}"))
            .unwrap_or_default();
        format!("{} {}{}", self.board_field(), self.turn.to_char(), tag)
    }
}

fn parse_deploy_tag(board: &Board, tag: &str) -> Result<DeploySession, FenError> {
    let invalid = || FenError::InvalidDeployTag {
        found: tag.to_string(),
    };
    let rest = tag.strip_prefix("D:").ok_or_else(invalid)?;
    let (square_str, letters) = rest.split_once(':').ok_or_else(invalid)?;
    let square: Square = square_str.parse().map_err(|_| invalid())?;
    let stack_piece = board.get(square).cloned().ok_or_else(invalid)?;
    let turn = board.turn();

    let mut moved = Vec::new();
    for c in letters.chars() {
        moved.push(PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?);
    }
    // The original stack is the current remainder plus the moved pieces;
    // only their kinds matter for deriving the remaining set.
    let mut original = stack_piece;
    for &kind in &moved {
        original.carrying.push(Piece::new(kind, turn));
    }
    let mut session = DeploySession::new(square, turn, original, String::new());
    session.moved = moved;
    Ok(session)
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
