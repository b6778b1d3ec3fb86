//! The deployment engine: sessions, auto/explicit commit, and atomic
//! batch deploys.
//!
//! A deploy session is a command log over the real board, never a virtual
//! overlay: every sub-move mutates the position and records itself, and
//! the remaining pieces are always readable from the stack square itself.

use super::error::{DeployError, MoveError};
use super::make_unmake::{Action, HistoryEntry};
use super::stack;
use super::state::Board;
use super::types::{Color, Move, MoveFilter, MoveFlags, MoveRecord, Piece, PieceKind, Square};

/// One sub-move of a batch deploy request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DeployStep {
    pub kind: PieceKind,
    pub to: Square,
}

/// A batch deploy: dispatch the listed pieces out of the stack on `from`,
/// optionally naming the pieces that stay behind. Atomic: if any sub-move
/// fails, the whole request is rolled back.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeployRequest {
    pub from: Square,
    pub moves: Vec<DeployStep>,
    pub stay: Option<Vec<PieceKind>>,
}

/// The record of an in-progress deploy sub-turn.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeploySession {
    /// Square of the stack being deployed.
    pub stack_square: Square,
    /// The side running the sub-turn; the turn does not flip until commit.
    pub turn: Color,
    /// Snapshot of the stack before the first sub-move.
    pub original: Piece,
    /// Kinds dispatched so far, in order.
    pub moved: Vec<PieceKind>,
    pub(crate) actions: Vec<Move>,
    pub(crate) start_key: String,
}

impl DeploySession {
    pub(crate) fn new(
        stack_square: Square,
        turn: Color,
        original: Piece,
        start_key: String,
    ) -> Self {
        DeploySession {
            stack_square,
            turn,
            original,
            moved: Vec::new(),
            actions: Vec::new(),
            start_key,
        }
    }

    pub(crate) fn record(&mut self, mv: Move) {
        self.moved.push(mv.piece.kind);
        self.actions.push(mv);
    }

    /// The sub-moves applied so far.
    #[must_use]
    pub fn sub_moves(&self) -> &[Move] {
        &self.actions
    }

    /// Kinds of the original stack still waiting to deploy or stay.
    #[must_use]
    pub fn remaining(&self) -> Vec<PieceKind> {
        let mut kinds: Vec<PieceKind> = self.original.flatten().iter().map(|p| p.kind).collect();
        for moved in &self.moved {
            if let Some(pos) = kinds.iter().position(|k| k == moved) {
                kinds.remove(pos);
            }
        }
        kinds
    }
}

fn kinds_match(a: &[PieceKind], b: &[PieceKind]) -> bool {
    let mut a: Vec<usize> = a.iter().map(|k| k.index()).collect();
    let mut b: Vec<usize> = b.iter().map(|k| k.index()).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

impl Board {
    /// Execute a batch deploy atomically. The session is committed at the
    /// end of the batch: automatically when the stack empties, explicitly
    /// (with the residue staying) otherwise.
    pub fn deploy(&mut self, request: &DeployRequest) -> Result<MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if let Some(session) = &self.deploy_session {
            if session.stack_square != request.from {
                return Err(DeployError::WrongSquare {
                    active: session.stack_square,
                    requested: request.from,
                }
                .into());
            }
        } else if request.moves.is_empty() {
            return Err(DeployError::NoSession.into());
        }

        let before = self.to_fen();
        let mut applied: Vec<HistoryEntry> = Vec::new();
        let mut sans: Vec<String> = Vec::new();
        let mut lans: Vec<String> = Vec::new();
        let mut failure: Option<DeployError> = None;

        for step in &request.moves {
            let legal = self.moves_for(&MoveFilter {
                square: Some(request.from),
                kind: Some(step.kind),
            });
            let found = legal
                .iter()
                .find(|m| m.is_deploy() && m.to == step.to && m.piece.kind == step.kind)
                .cloned();
            let Some(mv) = found else {
                failure = Some(DeployError::SubMoveIllegal {
                    kind: step.kind,
                    to: step.to,
                });
                break;
            };
            let san = self.move_to_san(&mv);
            let lan = self.move_to_lan(&mv);
            match self.apply_move_internal(&mv, false) {
                Ok(actions) => {
                    applied.push(HistoryEntry {
                        mv,
                        san: san.clone(),
                        actions,
                    });
                    sans.push(san);
                    lans.push(lan);
                }
                Err(_) => {
                    failure = Some(DeployError::SubMoveIllegal {
                        kind: step.kind,
                        to: step.to,
                    });
                    break;
                }
            }
        }

        // The explicit stay residue must equal the undeployed remainder.
        let mut residue = String::new();
        if failure.is_none() {
            let remaining: Vec<PieceKind> = self
                .get(request.from)
                .map(|p| p.flatten().iter().map(|u| u.kind).collect())
                .unwrap_or_default();
            if let Some(stay) = &request.stay {
                if !kinds_match(stay, &remaining) {
                    failure = Some(DeployError::ResidueMismatch);
                }
            }
            if failure.is_none() {
                residue = remaining.iter().map(|k| k.to_char()).collect();
            }
        }

        if failure.is_none() && self.deploy_session.is_some() {
            let mut actions = Vec::new();
            match self.commit_deploy_actions(&mut actions) {
                Ok(commit_mv) => {
                    let key = self.position_key();
                    self.repetitions.increment(key.clone());
                    actions.push(Action::CountPosition { key });
                    applied.push(HistoryEntry {
                        mv: commit_mv,
                        san: format!("{residue}<"),
                        actions,
                    });
                }
                Err(e) => failure = Some(e),
            }
        }

        if let Some(error) = failure {
            while let Some(entry) = applied.pop() {
                self.undo_actions(entry.actions);
            }
            return Err(error.into());
        }

        // Merge everything into one atomic history entry.
        let primary = applied
            .first()
            .map(|e| e.mv.clone())
            .expect("non-empty deploy batch");
        let mut all_actions = Vec::new();
        for entry in applied {
            all_actions.extend(entry.actions);
        }
        let san = if residue.is_empty() {
            sans.join(",")
        } else {
            format!("{residue}<{}", sans.join(","))
        };
        let lan = if residue.is_empty() {
            lans.join(",")
        } else {
            format!("{residue}<{}", lans.join(","))
        };
        self.history.push(HistoryEntry {
            mv: primary.clone(),
            san: san.clone(),
            actions: all_actions,
        });
        Ok(MoveRecord {
            mv: primary,
            san,
            lan,
            before,
            after: self.to_fen(),
        })
    }

    /// End the active deploy session, leaving the undeployed remainder as
    /// a stack on the session square. Flips the turn.
    pub fn commit_deploy(&mut self) -> Result<(), MoveError> {
        let mut actions = Vec::new();
        let residue: String = self
            .deploy_session
            .as_ref()
            .map(|s| s.remaining().iter().map(|k| k.to_char()).collect())
            .unwrap_or_default();
        let commit_mv = self
            .commit_deploy_actions(&mut actions)
            .map_err(MoveError::Deploy)?;
        let key = self.position_key();
        self.repetitions.increment(key.clone());
        actions.push(Action::CountPosition { key });
        self.history.push(HistoryEntry {
            mv: commit_mv,
            san: format!("{residue}<"),
            actions,
        });
        Ok(())
    }

    /// Commit the active session: validate the residue, clear the session,
    /// flip the turn, and advance the counters. Returns a marker move for
    /// the history.
    pub(crate) fn commit_deploy_actions(
        &mut self,
        actions: &mut Vec<Action>,
    ) -> Result<Move, DeployError> {
        let session = self.deploy_session.clone().ok_or(DeployError::NoSession)?;
        let residue_piece = self.get(session.stack_square).cloned();
        if let Some(piece) = &residue_piece {
            if stack::validate(piece).is_err() {
                return Err(DeployError::ResidueNotCombinable);
            }
        }
        #[cfg(feature = "logging")]
        log::debug!(
            "deploy session at {} committed with {} sub-moves",
            session.stack_square,
            session.moved.len()
        );
        let previous = self.deploy_session.take();
        actions.push(Action::SetDeploySession { previous });
        let previous_half = self.half_moves;
        let previous_move = self.move_number;
        if session.turn == Color::Blue {
            self.move_number += 1;
        }
        actions.push(Action::SetCounters {
            previous_half,
            previous_move,
        });
        actions.push(Action::SetTurn {
            previous: self.turn,
        });
        self.turn = session.turn.opponent();
        self.invalidate_caches();

        let marker_piece = residue_piece.unwrap_or_else(|| session.original.clone());
        Ok(Move {
            from: session.stack_square,
            to: session.stack_square,
            piece: marker_piece,
            captured: None,
            combined: None,
            flags: MoveFlags::DEPLOY,
        })
    }
}
