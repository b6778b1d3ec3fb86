//! Ray walking: emits the pseudo-legal moves of one piece along one
//! direction, handling terrain passage, piece blocking, shoot-over,
//! stay/suicide captures, air defense, combinations, and the heavy-piece
//! river rules.

use crate::board::air_defense::AirDefenseField;
use crate::board::stack;
use crate::board::state::Board;
use crate::board::terrain;
use crate::board::types::{
    Move, MoveFlags, Piece, PieceKind, Square, DIAGONAL_OFFSETS, ORTHOGONAL_OFFSETS,
};

use super::{move_config, MoveConfig};

/// Generate all pseudo-legal moves for `piece` standing on `from`. With
/// `deploy` set the piece is a sub-piece dispatching out of a stack and
/// every emitted move carries the DEPLOY flag.
pub(crate) fn piece_moves(
    board: &Board,
    ad: &AirDefenseField,
    from: Square,
    piece: &Piece,
    deploy: bool,
    out: &mut Vec<Move>,
) {
    let cfg = move_config(piece.kind, piece.heroic);
    if cfg.move_range == 0 && cfg.capture_range == 0 {
        return;
    }
    for &offset in &ORTHOGONAL_OFFSETS {
        walk_ray(board, ad, from, piece, &cfg, offset, false, deploy, out);
    }
    if cfg.diagonal {
        for &offset in &DIAGONAL_OFFSETS {
            walk_ray(board, ad, from, piece, &cfg, offset, true, deploy, out);
        }
    }
    if piece.kind == PieceKind::Commander {
        flying_general(board, from, piece, deploy, out);
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_ray(
    board: &Board,
    ad: &AirDefenseField,
    from: Square,
    piece: &Piece,
    cfg: &MoveConfig,
    offset: i16,
    diagonal: bool,
    deploy: bool,
    out: &mut Vec<Move>,
) {
    let enemy = piece.color.opponent();
    let move_range = if diagonal {
        cfg.diag_move_range
    } else {
        cfg.move_range
    };
    let capture_range = if diagonal {
        cfg.diag_capture_range
    } else {
        cfg.capture_range
    };
    let max_range = move_range.max(capture_range);
    let is_air = piece.kind == PieceKind::AirForce;
    let deploy_flag = if deploy {
        MoveFlags::DEPLOY
    } else {
        MoveFlags::empty()
    };

    let mut move_blocked = false;
    let mut river_capture_only = false;
    let mut cur = from;
    let mut step: u8 = 0;

    loop {
        if step == max_range {
            break;
        }
        step += 1;
        let prev = cur;
        let Some(to) = prev.offset(offset) else { break };
        cur = to;

        // Heavy pieces may only cross the river straight over a bridge
        // file; past the bank only the first enemy target is capturable.
        if piece.kind.is_heavy() && !terrain::heavy_step_allowed(prev, to) {
            river_capture_only = true;
        }

        let resident = terrain::can_stay(piece.kind, to);
        let air_sources = if is_air { ad.sources(enemy, to) } else { 0 };
        let within_move = step <= move_range && !move_blocked && !river_capture_only;
        let within_capture = step <= capture_range;

        match board.get(to) {
            None => {
                if within_move && resident && air_sources == 0 {
                    out.push(Move {
                        from,
                        to,
                        piece: piece.clone(),
                        captured: None,
                        combined: None,
                        flags: MoveFlags::NORMAL | deploy_flag,
                    });
                }
            }
            Some(target) if target.color == enemy => {
                if within_capture {
                    emit_captures(
                        out,
                        from,
                        to,
                        piece,
                        target,
                        resident,
                        air_sources,
                        deploy,
                    );
                }
                if river_capture_only {
                    break;
                }
            }
            Some(friend) => {
                if within_move && resident && air_sources == 0 {
                    if stack::form_stack(piece, friend).is_some() {
                        out.push(Move {
                            from,
                            to,
                            piece: piece.clone(),
                            captured: None,
                            combined: Some(friend.clone()),
                            flags: MoveFlags::COMBINATION | deploy_flag,
                        });
                    }
                }
            }
        }

        // Passage rules decide whether the scan continues past `to`.
        if cfg.move_ignores_blocking {
            // Flies over terrain and pieces; a defended square still bars
            // the way beyond it.
            if air_sources >= 1 {
                break;
            }
        } else {
            if !resident {
                break;
            }
            if board.get(to).is_some() {
                if cfg.capture_ignores_blocking {
                    move_blocked = true;
                } else {
                    break;
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_captures(
    out: &mut Vec<Move>,
    from: Square,
    to: Square,
    piece: &Piece,
    target: &Piece,
    resident: bool,
    air_sources: u8,
    deploy: bool,
) {
    let deploy_flag = if deploy {
        MoveFlags::DEPLOY
    } else {
        MoveFlags::empty()
    };
    let mut emit = |flags: MoveFlags| {
        out.push(Move {
            from,
            to,
            piece: piece.clone(),
            captured: Some(target.clone()),
            combined: None,
            flags,
        });
    };

    if piece.kind == PieceKind::AirForce {
        match air_sources {
            0 => {
                if resident {
                    emit(MoveFlags::CAPTURE | deploy_flag);
                    if !deploy {
                        emit(MoveFlags::STAY_CAPTURE);
                    }
                } else if !deploy {
                    emit(MoveFlags::STAY_CAPTURE);
                }
            }
            1 => emit(MoveFlags::SUICIDE_CAPTURE | deploy_flag),
            _ => {}
        }
        return;
    }

    // Navy bombards land targets in place; land pieces bombard targets
    // they cannot stand next to (a navy on open water).
    let stays = if piece.kind == PieceKind::Navy {
        target.kind != PieceKind::Navy
    } else {
        !resident
    };
    if stays {
        if !deploy {
            emit(MoveFlags::STAY_CAPTURE);
        }
    } else {
        emit(MoveFlags::CAPTURE | deploy_flag);
    }
}

/// Flying-general capture: a commander takes the enemy commander across
/// any clear orthogonal line, ignoring its normal capture range.
fn flying_general(
    board: &Board,
    from: Square,
    piece: &Piece,
    deploy: bool,
    out: &mut Vec<Move>,
) {
    let Some(target_sq) = board.commander_square(piece.color.opponent()) else {
        return;
    };
    if target_sq == from || !from.is_orthogonal_to(target_sq) {
        return;
    }
    let offset: i16 = if from.file() == target_sq.file() {
        if target_sq.index() > from.index() {
            16
        } else {
            -16
        }
    } else if target_sq.index() > from.index() {
        1
    } else {
        -1
    };
    let mut cur = from;
    loop {
        let Some(next) = cur.offset(offset) else { return };
        cur = next;
        if cur == target_sq {
            break;
        }
        if board.get(cur).is_some() {
            return;
        }
    }
    let deploy_flag = if deploy {
        MoveFlags::DEPLOY
    } else {
        MoveFlags::empty()
    };
    out.push(Move {
        from,
        to: target_sq,
        piece: piece.clone(),
        captured: board.get(target_sq).cloned(),
        combined: None,
        flags: MoveFlags::CAPTURE | deploy_flag,
    });
}
