//! The move applier: atomic actions with captured undo data, compound
//! execution, and the public make/undo surface.
//!
//! Every mutation a compound command performs is recorded as an `Action`
//! holding exactly the data needed to revert it; `undo_actions` replays
//! them in reverse. This keeps heroic flags, commander tracking, deploy
//! sessions, counters, and position counts perfectly reversible without
//! snapshotting the whole board.

use super::deploy::DeploySession;
use super::error::{IllegalMoveKind, MoveError};
use super::stack;
use super::state::Board;
use super::types::{Color, Move, MoveFilter, MoveRecord, PieceKind, Square};

/// One reversible mutation.
#[derive(Clone, Debug)]
pub(crate) enum Action {
    /// Slot emptied; undo restores the removed piece.
    RemovePiece { square: Square, removed: super::types::Piece },
    /// Piece written to a slot; undo restores whatever it replaced.
    PlacePiece {
        square: Square,
        replaced: Option<super::types::Piece>,
    },
    /// A unit was taken out of the stack on `square` (with carrier
    /// promotion when the carrier left); undo restores the full stack.
    RemoveFromStack {
        square: Square,
        before: super::types::Piece,
    },
    /// A piece was merged into the stack on `square`; undo restores the
    /// previous occupant.
    PlaceIntoStack {
        square: Square,
        before: super::types::Piece,
    },
    /// Heroic flag change on a piece (addressed by kind within a stack).
    SetHeroic {
        square: Square,
        kind: PieceKind,
        previous: bool,
    },
    /// Deploy session replaced; undo restores the previous session.
    SetDeploySession { previous: Option<DeploySession> },
    /// Turn flip.
    SetTurn { previous: Color },
    /// Counter update.
    SetCounters {
        previous_half: u32,
        previous_move: u32,
    },
    /// Position count incremented for `key`; undo decrements it.
    CountPosition { key: String },
}

/// A committed compound command: the move, its notation, and the action
/// log that reverses it.
#[derive(Clone, Debug)]
pub(crate) struct HistoryEntry {
    pub(crate) mv: Move,
    pub(crate) san: String,
    pub(crate) actions: Vec<Action>,
}

impl Board {
    /// Set the heroic flag of the piece of `kind` on `square` (the carrier
    /// or a carried piece), returning the previous value.
    pub(crate) fn set_heroic_flag(
        &mut self,
        square: Square,
        kind: PieceKind,
        value: bool,
    ) -> Option<bool> {
        let slot = self.slots[square.index()].as_mut()?;
        let previous;
        if slot.kind == kind {
            previous = slot.heroic;
            slot.heroic = value;
        } else if let Some(carried) = slot.carrying.iter_mut().find(|p| p.kind == kind) {
            previous = carried.heroic;
            carried.heroic = value;
        } else {
            return None;
        }
        self.invalidate_caches();
        Some(previous)
    }

    /// Replay an action log in reverse, restoring the prior state exactly.
    pub(crate) fn undo_actions(&mut self, actions: Vec<Action>) {
        for action in actions.into_iter().rev() {
            match action {
                Action::RemovePiece { square, removed } => {
                    self.write_slot(square, Some(removed));
                }
                Action::PlacePiece { square, replaced } => {
                    self.write_slot(square, replaced);
                }
                Action::RemoveFromStack { square, before }
                | Action::PlaceIntoStack { square, before } => {
                    self.write_slot(square, Some(before));
                }
                Action::SetHeroic {
                    square,
                    kind,
                    previous,
                } => {
                    self.set_heroic_flag(square, kind, previous);
                }
                Action::SetDeploySession { previous } => {
                    self.deploy_session = previous;
                    self.invalidate_caches();
                }
                Action::SetTurn { previous } => {
                    self.turn = previous;
                    self.invalidate_caches();
                }
                Action::SetCounters {
                    previous_half,
                    previous_move,
                } => {
                    self.half_moves = previous_half;
                    self.move_number = previous_move;
                }
                Action::CountPosition { key } => {
                    self.repetitions.decrement(&key);
                }
            }
        }
    }

    /// Execute a move as a compound command. With `testing` set the board
    /// changes are applied but side effects that must not leak out of
    /// legality simulation are suppressed: deploy-session changes, heroic
    /// promotion, turn bookkeeping of commits, and position counting.
    pub(crate) fn apply_move_internal(
        &mut self,
        mv: &Move,
        testing: bool,
    ) -> Result<Vec<Action>, IllegalMoveKind> {
        let mut actions = Vec::new();
        let color = mv.piece.color;
        let result = if mv.is_deploy() {
            self.apply_deploy_move(mv, testing, &mut actions)
        } else {
            self.apply_board_move(mv, &mut actions)
        };
        if let Err(kind) = result {
            self.undo_actions(actions);
            return Err(kind);
        }
        if !testing {
            self.promote_attackers(color, &mut actions);
            let key = self.position_key();
            self.repetitions.increment(key.clone());
            actions.push(Action::CountPosition { key });
        }
        Ok(actions)
    }

    /// A non-deploy compound command: normal, capture, stay capture,
    /// suicide capture, or combination. Flips the turn.
    fn apply_board_move(
        &mut self,
        mv: &Move,
        actions: &mut Vec<Action>,
    ) -> Result<(), IllegalMoveKind> {
        let color = mv.piece.color;
        if mv.is_stay_capture() {
            let target = self
                .write_slot(mv.to, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.to,
                removed: target,
            });
        } else if mv.is_suicide_capture() {
            let target = self
                .write_slot(mv.to, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.to,
                removed: target,
            });
            let mover = self
                .write_slot(mv.from, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.from,
                removed: mover,
            });
        } else if mv.is_combination() {
            let mover = self
                .write_slot(mv.from, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.from,
                removed: mover.clone(),
            });
            let friend = self.get(mv.to).cloned().ok_or(IllegalMoveKind::NoMatch)?;
            let combined =
                stack::form_stack(&mover, &friend).ok_or(IllegalMoveKind::CarrierRule)?;
            self.write_slot(mv.to, Some(combined));
            actions.push(Action::PlaceIntoStack {
                square: mv.to,
                before: friend,
            });
        } else {
            let mover = self
                .write_slot(mv.from, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.from,
                removed: mover.clone(),
            });
            let replaced = self.write_slot(mv.to, Some(mover));
            actions.push(Action::PlacePiece {
                square: mv.to,
                replaced,
            });
        }

        let previous_half = self.half_moves;
        let previous_move = self.move_number;
        if mv.is_capture() {
            self.half_moves = 0;
        } else {
            self.half_moves = self.half_moves.saturating_add(1);
        }
        if color == Color::Blue {
            self.move_number += 1;
        }
        actions.push(Action::SetCounters {
            previous_half,
            previous_move,
        });
        actions.push(Action::SetTurn {
            previous: self.turn,
        });
        self.turn = self.turn.opponent();
        self.invalidate_caches();
        Ok(())
    }

    /// A deploy sub-move: take the unit out of the stack, resolve the
    /// destination, and update the session. The turn does not flip unless
    /// the stack empties, which auto-commits the session.
    fn apply_deploy_move(
        &mut self,
        mv: &Move,
        testing: bool,
        actions: &mut Vec<Action>,
    ) -> Result<(), IllegalMoveKind> {
        let color = mv.piece.color;
        let stack_piece = self
            .get(mv.from)
            .cloned()
            .ok_or(IllegalMoveKind::DeployPhaseMismatch)?;
        if let Some(session) = &self.deploy_session {
            if session.stack_square != mv.from {
                return Err(IllegalMoveKind::DeployPhaseMismatch);
            }
        }
        let start_key = if self.deploy_session.is_none() {
            Some(self.position_key())
        } else {
            None
        };

        // Take the unit out, promoting a new carrier when needed.
        let unit = if stack_piece.is_stack() {
            let (removed, rest) = stack::remove_from_stack(&stack_piece, mv.piece.kind)
                .map_err(|_| IllegalMoveKind::CarrierRule)?;
            self.write_slot(mv.from, rest);
            actions.push(Action::RemoveFromStack {
                square: mv.from,
                before: stack_piece.clone(),
            });
            removed
        } else {
            if stack_piece.kind != mv.piece.kind {
                return Err(IllegalMoveKind::NoMatch);
            }
            let removed = self
                .write_slot(mv.from, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.from,
                removed: removed.clone(),
            });
            removed
        };

        // Resolve the destination.
        if mv.is_suicide_capture() {
            let target = self
                .write_slot(mv.to, None)
                .ok_or(IllegalMoveKind::NoMatch)?;
            actions.push(Action::RemovePiece {
                square: mv.to,
                removed: target,
            });
            // the unit itself is destroyed with the target
        } else if mv.is_combination() {
            let friend = self.get(mv.to).cloned().ok_or(IllegalMoveKind::NoMatch)?;
            let combined =
                stack::form_stack(&unit, &friend).ok_or(IllegalMoveKind::CarrierRule)?;
            self.write_slot(mv.to, Some(combined));
            actions.push(Action::PlaceIntoStack {
                square: mv.to,
                before: friend,
            });
        } else {
            let replaced = self.write_slot(mv.to, Some(unit));
            actions.push(Action::PlacePiece {
                square: mv.to,
                replaced,
            });
        }

        if mv.is_capture() {
            actions.push(Action::SetCounters {
                previous_half: self.half_moves,
                previous_move: self.move_number,
            });
            self.half_moves = 0;
        }

        if !testing {
            let previous = self.deploy_session.take();
            let mut session = previous.clone().unwrap_or_else(|| {
                DeploySession::new(
                    mv.from,
                    color,
                    stack_piece,
                    start_key.unwrap_or_default(),
                )
            });
            session.record(mv.clone());
            actions.push(Action::SetDeploySession { previous });
            if self.get(mv.from).is_none() {
                // Stack exhausted: the session auto-commits.
                #[cfg(feature = "logging")]
                log::debug!("deploy session at {} auto-committed", mv.from);
                self.deploy_session = None;
                let previous_half = self.half_moves;
                let previous_move = self.move_number;
                if color == Color::Blue {
                    self.move_number += 1;
                }
                actions.push(Action::SetCounters {
                    previous_half,
                    previous_move,
                });
                actions.push(Action::SetTurn {
                    previous: self.turn,
                });
                self.turn = self.turn.opponent();
            } else {
                #[cfg(feature = "logging")]
                log::trace!("deploy session at {} recorded {}", mv.from, mv);
                self.deploy_session = Some(session);
            }
            self.invalidate_caches();
        }
        Ok(())
    }

    /// Promote every piece of `color` now attacking the enemy commander.
    /// This is the only path to heroic status.
    fn promote_attackers(&mut self, color: Color, actions: &mut Vec<Action>) {
        let enemy = color.opponent();
        let Some(target) = self.commander_square(enemy) else {
            return;
        };
        let ad = self.air_defense();
        let candidates: Vec<(Square, super::types::Piece)> = self
            .pieces_of(color)
            .into_iter()
            .filter(|(_, p)| !p.heroic)
            .map(|(sq, p)| (sq, p.clone()))
            .collect();
        for (sq, piece) in candidates {
            if self.attacks_square(&ad, sq, &piece, target) {
                if let Some(previous) = self.set_heroic_flag(sq, piece.kind, true) {
                    actions.push(Action::SetHeroic {
                        square: sq,
                        kind: piece.kind,
                        previous,
                    });
                }
            }
        }
    }

    /// Validate a move against the legal list and commit it.
    ///
    /// The returned record carries the positions before and after the move
    /// alongside its SAN and LAN renderings.
    pub fn make_move(&mut self, mv: &Move) -> Result<MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let legal = self.moves_for(&MoveFilter::from_square(mv.from));
        let Some(found) = legal.iter().find(|m| m.same_shape(mv)).cloned() else {
            return Err(MoveError::Illegal {
                notation: mv.to_string(),
                cause: self.classify_illegal(mv),
            });
        };
        self.commit_move(found)
    }

    /// Commit an already-validated legal move.
    pub(crate) fn commit_move(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        let before = self.to_fen();
        let san = self.move_to_san(&mv);
        let lan = self.move_to_lan(&mv);
        let actions = self
            .apply_move_internal(&mv, false)
            .map_err(|cause| MoveError::Illegal {
                notation: san.clone(),
                cause,
            })?;
        self.history.push(HistoryEntry {
            mv: mv.clone(),
            san: san.clone(),
            actions,
        });
        let after = self.to_fen();
        Ok(MoveRecord {
            mv,
            san,
            lan,
            before,
            after,
        })
    }

    /// Diagnose why a requested move is not in the legal list.
    pub(crate) fn classify_illegal(&mut self, mv: &Move) -> IllegalMoveKind {
        if let Some(session) = &self.deploy_session {
            if session.stack_square != mv.from || !mv.is_deploy() {
                return IllegalMoveKind::DeployPhaseMismatch;
            }
        }
        let pseudo = self.pseudo_legal_moves(&MoveFilter::from_square(mv.from));
        let Some(found) = pseudo.iter().find(|m| m.same_shape(mv)).cloned() else {
            return IllegalMoveKind::NoMatch;
        };
        let Ok(actions) = self.apply_move_internal(&found, true) else {
            return IllegalMoveKind::NoMatch;
        };
        let color = found.piece.color;
        let enemy = color.opponent();
        let cause = match self.commander_square(color) {
            None => IllegalMoveKind::LeavesCommanderInCheck,
            Some(sq) => {
                if self.commander_square(enemy).is_some() && self.commanders_exposed() {
                    IllegalMoveKind::ExposesCommander
                } else if self.is_square_attacked(sq, enemy) {
                    IllegalMoveKind::LeavesCommanderInCheck
                } else {
                    IllegalMoveKind::NoMatch
                }
            }
        };
        self.undo_actions(actions);
        cause
    }

    /// Undo the last committed compound command. Returns the undone move,
    /// or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        #[cfg(feature = "logging")]
        log::trace!("undoing {}", entry.san);
        self.undo_actions(entry.actions);
        Some(entry.mv)
    }
}
