//! SAN / LAN notation.
//!
//! Shape: `<piece><disambiguator><separator><destination><combination><check>`
//! with separators `x` (capture), `_` (stay capture), `@` (suicide
//! capture), `>` (deploy, before `x`/`@`), `&` (combination), and check
//! suffixes `^` / `#`. Deploy batches join sub-move SANs with commas,
//! optionally preceded by the stay residue and `<`.

use super::deploy::{DeployRequest, DeployStep};
use super::error::{IllegalMoveKind, MoveError, MoveParseError};
use super::stack;
use super::state::Board;
use super::types::{Move, MoveFilter, MoveFlags, Piece, PieceKind, Square};

fn stack_suffix(piece: &Piece) -> String {
    let mut out = String::from("(");
    for unit in piece.flatten() {
        if unit.heroic {
            out.push('+');
        }
        out.push(unit.kind.to_char());
    }
    out.push(')');
    out
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Token {
    Deploy,
    Separator(char),
    SquareTok(Square),
    FileTok(usize),
    RankTok(usize),
}

fn tokenize_body(chars: &[char], notation: &str) -> Result<Vec<Token>, MoveParseError> {
    let mut toks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '>' => {
                toks.push(Token::Deploy);
                i += 1;
            }
            'x' | '_' | '@' | '&' => {
                toks.push(Token::Separator(c));
                i += 1;
            }
            '(' => {
                while i < chars.len() && chars[i] != ')' {
                    i += 1;
                }
                if i == chars.len() {
                    return Err(MoveParseError::Syntax {
                        notation: notation.to_string(),
                    });
                }
                i += 1;
            }
            'a'..='k' => {
                let file = c as usize - 'a' as usize;
                i += 1;
                let mut num = 0usize;
                let mut digits = 0;
                while i < chars.len() && chars[i].is_ascii_digit() && digits < 2 {
                    num = num * 10 + (chars[i] as usize - '0' as usize);
                    i += 1;
                    digits += 1;
                }
                if digits == 0 {
                    toks.push(Token::FileTok(file));
                } else if (1..=12).contains(&num) {
                    toks.push(Token::SquareTok(Square::new(file, num - 1)));
                } else {
                    return Err(MoveParseError::BadSquare {
                        notation: notation.to_string(),
                    });
                }
            }
            '0'..='9' => {
                let mut num = 0usize;
                let mut digits = 0;
                while i < chars.len() && chars[i].is_ascii_digit() && digits < 2 {
                    num = num * 10 + (chars[i] as usize - '0' as usize);
                    i += 1;
                    digits += 1;
                }
                if (1..=12).contains(&num) {
                    toks.push(Token::RankTok(num - 1));
                } else {
                    return Err(MoveParseError::Syntax {
                        notation: notation.to_string(),
                    });
                }
            }
            _ => {
                return Err(MoveParseError::Syntax {
                    notation: notation.to_string(),
                })
            }
        }
    }
    Ok(toks)
}

impl Board {
    /// Format a move in SAN.
    #[must_use]
    pub fn move_to_san(&mut self, mv: &Move) -> String {
        let mut san = String::new();
        if mv.piece.heroic {
            san.push('+');
        }
        san.push(mv.piece.kind.to_char());

        let (needs_file, needs_rank) = self.san_disambiguation(mv);
        if needs_file {
            san.push(mv.from.file_char());
        }
        if needs_rank {
            san.push_str(&(mv.from.rank() + 1).to_string());
        }

        self.push_separator_and_destination(&mut san, mv);
        san.push_str(&self.check_suffix(mv));
        san
    }

    /// Format a move in LAN: the origin square is always shown.
    #[must_use]
    pub fn move_to_lan(&mut self, mv: &Move) -> String {
        let mut lan = String::new();
        if mv.piece.heroic {
            lan.push('+');
        }
        lan.push(mv.piece.kind.to_char());
        lan.push_str(&mv.from.to_string());
        self.push_separator_and_destination(&mut lan, mv);
        lan.push_str(&self.check_suffix(mv));
        lan
    }

    fn push_separator_and_destination(&self, out: &mut String, mv: &Move) {
        if mv.is_deploy() {
            out.push('>');
        }
        if mv.flags.contains(MoveFlags::CAPTURE) {
            out.push('x');
        } else if mv.is_stay_capture() {
            out.push('_');
        } else if mv.is_suicide_capture() {
            out.push('@');
        } else if mv.is_combination() {
            out.push('&');
        }
        out.push_str(&mv.to.to_string());
        if mv.is_combination() {
            if let Some(friend) = &mv.combined {
                if let Some(combined) = stack::form_stack(&mv.piece, friend) {
                    out.push_str(&stack_suffix(&combined));
                }
            }
        }
    }

    /// Disambiguation: among same-kind legal moves to the same destination
    /// with the same flag set, prefer the file, then the rank, then both.
    fn san_disambiguation(&mut self, mv: &Move) -> (bool, bool) {
        let legal = self.generate_moves();
        let others: Vec<&Move> = legal
            .iter()
            .filter(|m| {
                m.to == mv.to
                    && m.piece.kind == mv.piece.kind
                    && m.flags == mv.flags
                    && m.from != mv.from
            })
            .collect();
        if others.is_empty() {
            return (false, false);
        }
        let same_file = others.iter().any(|m| m.from.file() == mv.from.file());
        let same_rank = others.iter().any(|m| m.from.rank() == mv.from.rank());
        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// `^` for check, `#` for mate, probed on a clone.
    fn check_suffix(&self, mv: &Move) -> String {
        let mut probe = self.clone();
        if probe.apply_move_internal(mv, false).is_err() {
            return String::new();
        }
        let enemy = mv.piece.color.opponent();
        if !probe.in_check(enemy) {
            return String::new();
        }
        if probe.turn() == enemy && probe.generate_moves().is_empty() {
            "#".to_string()
        } else {
            "^".to_string()
        }
    }

    /// Parse a single-move SAN (or LAN) string and resolve it against the
    /// legal move list. Ambiguous or unmatched notation is rejected.
    pub fn parse_san(&mut self, input: &str) -> Result<Move, MoveError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(MoveParseError::Empty.into());
        }
        let s = s.trim_end_matches(['^', '#']);
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0;
        let mut heroic_hint = false;
        if chars.first() == Some(&'+') {
            heroic_hint = true;
            i += 1;
        }
        let kind_char = *chars.get(i).ok_or(MoveParseError::Syntax {
            notation: input.to_string(),
        })?;
        if !kind_char.is_ascii_uppercase() {
            return Err(MoveParseError::BadPiece { char: kind_char }.into());
        }
        let kind =
            PieceKind::from_char(kind_char).ok_or(MoveParseError::BadPiece { char: kind_char })?;
        i += 1;

        let toks = tokenize_body(&chars[i..], input)?;
        let dest_idx = toks
            .iter()
            .rposition(|t| matches!(t, Token::SquareTok(_)))
            .ok_or(MoveParseError::BadSquare {
                notation: input.to_string(),
            })?;
        let Token::SquareTok(dest) = toks[dest_idx] else {
            unreachable!()
        };
        if toks.len() != dest_idx + 1 {
            return Err(MoveParseError::Syntax {
                notation: input.to_string(),
            }
            .into());
        }

        let mut deploy = false;
        let mut separator: Option<char> = None;
        let mut disambig_file: Option<usize> = None;
        let mut disambig_rank: Option<usize> = None;
        for tok in &toks[..dest_idx] {
            match *tok {
                Token::Deploy => deploy = true,
                Token::Separator(c) => separator = Some(c),
                Token::SquareTok(sq) => {
                    disambig_file = Some(sq.file());
                    disambig_rank = Some(sq.rank());
                }
                Token::FileTok(f) => disambig_file = Some(f),
                Token::RankTok(r) => disambig_rank = Some(r),
            }
        }

        let legal = self.generate_moves();
        let mut matching: Vec<Move> = legal
            .iter()
            .filter(|m| {
                m.piece.kind == kind
                    && m.to == dest
                    && m.is_deploy() == deploy
                    && match separator {
                        Some('x') => m.flags.contains(MoveFlags::CAPTURE),
                        Some('_') => m.is_stay_capture(),
                        Some('@') => m.is_suicide_capture(),
                        Some('&') => m.is_combination(),
                        None => m.flags.contains(MoveFlags::NORMAL),
                        Some(_) => false,
                    }
                    && disambig_file.map_or(true, |f| m.from.file() == f)
                    && disambig_rank.map_or(true, |r| m.from.rank() == r)
                    && (!heroic_hint || m.piece.heroic)
            })
            .cloned()
            .collect();

        match matching.len() {
            0 => Err(MoveError::Illegal {
                notation: input.to_string(),
                cause: IllegalMoveKind::NoMatch,
            }),
            1 => Ok(matching.swap_remove(0)),
            _ => Err(MoveError::Illegal {
                notation: input.to_string(),
                cause: IllegalMoveKind::Ambiguous,
            }),
        }
    }

    /// Parse a deploy batch (`T<I>d4,F>xc6` style) into a request. The
    /// stack square comes from the active session or, failing that, the
    /// unique stack able to perform every sub-move.
    pub fn parse_deploy_san(&mut self, input: &str) -> Result<DeployRequest, MoveError> {
        let s = input.trim();
        let (residue_str, rest) = match s.split_once('<') {
            Some((r, rest)) => (Some(r), rest),
            None => (None, s),
        };
        let stay = match residue_str {
            None => None,
            Some(r) => {
                let mut kinds = Vec::new();
                for c in r.chars().filter(|c| *c != '+') {
                    kinds.push(
                        PieceKind::from_char(c).ok_or(MoveParseError::BadPiece { char: c })?,
                    );
                }
                Some(kinds)
            }
        };

        let mut steps = Vec::new();
        for part in rest.split(',') {
            let part = part.trim().trim_end_matches(['^', '#']);
            if part.is_empty() {
                return Err(MoveParseError::Syntax {
                    notation: input.to_string(),
                }
                .into());
            }
            let chars: Vec<char> = part.chars().collect();
            let mut i = 0;
            if chars[0] == '+' {
                i += 1;
            }
            let kind_char = *chars.get(i).ok_or(MoveParseError::Syntax {
                notation: input.to_string(),
            })?;
            let kind = PieceKind::from_char(kind_char)
                .ok_or(MoveParseError::BadPiece { char: kind_char })?;
            i += 1;
            let toks = tokenize_body(&chars[i..], input)?;
            let to = toks
                .iter()
                .rev()
                .find_map(|t| match t {
                    Token::SquareTok(sq) => Some(*sq),
                    _ => None,
                })
                .ok_or(MoveParseError::BadSquare {
                    notation: input.to_string(),
                })?;
            steps.push(DeployStep { kind, to });
        }

        let from = if let Some(session) = self.deploy_state() {
            session.stack_square
        } else {
            let stacks: Vec<Square> = self
                .pieces_of(self.turn())
                .into_iter()
                .filter(|(_, p)| p.is_stack())
                .map(|(sq, _)| sq)
                .collect();
            let mut candidates = Vec::new();
            for sq in stacks {
                let all_possible = steps.iter().all(|step| {
                    self.moves_for(&MoveFilter {
                        square: Some(sq),
                        kind: Some(step.kind),
                    })
                    .iter()
                    .any(|m| m.is_deploy() && m.to == step.to)
                });
                if all_possible {
                    candidates.push(sq);
                }
            }
            match candidates.len() {
                1 => candidates[0],
                0 => {
                    return Err(MoveError::Illegal {
                        notation: input.to_string(),
                        cause: IllegalMoveKind::NoMatch,
                    })
                }
                _ => {
                    return Err(MoveError::Illegal {
                        notation: input.to_string(),
                        cause: IllegalMoveKind::Ambiguous,
                    })
                }
            }
        };

        Ok(DeployRequest {
            from,
            moves: steps,
            stay,
        })
    }

    /// Parse a SAN string (single move or deploy batch) and play it.
    pub fn make_move_san(&mut self, input: &str) -> Result<super::types::MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let trimmed = input.trim();
        if trimmed.contains(',') || trimmed.contains('<') {
            let request = self.parse_deploy_san(trimmed)?;
            return self.deploy(&request);
        }
        let mv = self.parse_san(trimmed)?;
        self.commit_move(mv)
    }
}
