//! Stack algebra: carrier blueprints, combining, and splitting.
//!
//! A carrier blueprint is a list of slots, each naming the kinds that may
//! occupy it. Capacity is one (the carrier) plus the slot count. Carrier
//! removal promotes the first carried piece; that rule lives here and
//! nowhere else.

use super::error::StackError;
use super::types::{Piece, PieceKind};

/// Carried-piece slots per carrier kind. Kinds absent from this table
/// cannot carry.
pub(crate) fn blueprint(kind: PieceKind) -> &'static [&'static [PieceKind]] {
    use PieceKind::{
        AirForce, AntiAir, Artillery, Commander, Engineer, Headquarter, Infantry, Militia,
        Missile, Navy, Tank,
    };
    match kind {
        Navy => &[
            &[AirForce],
            &[Commander, Infantry, Militia, Tank],
        ],
        Tank => &[&[Commander, Infantry, Militia]],
        Engineer => &[&[Artillery, AntiAir, Missile]],
        AirForce => &[&[Tank], &[Commander, Infantry, Militia]],
        Headquarter => &[&[Commander]],
        _ => &[],
    }
}

/// Maximum flattened stack size under this carrier.
#[inline]
#[must_use]
pub(crate) fn capacity(kind: PieceKind) -> usize {
    blueprint(kind).len() + 1
}

/// Greedily assign each cargo piece to the first free slot that allows its
/// kind. Returns false if any piece cannot be placed.
fn assign_slots(carrier: PieceKind, cargo: &[PieceKind]) -> bool {
    let slots = blueprint(carrier);
    if cargo.len() > slots.len() {
        return false;
    }
    let mut used = [false; 4];
    'cargo: for &kind in cargo {
        for (i, slot) in slots.iter().enumerate() {
            if !used[i] && slot.contains(&kind) {
                used[i] = true;
                continue 'cargo;
            }
        }
        return false;
    }
    true
}

/// Whether `incoming` (and everything it carries) fits under `carrier`
/// next to the carrier's existing cargo.
#[must_use]
pub fn can_combine(carrier: &Piece, incoming: &Piece) -> bool {
    if carrier.color != incoming.color {
        return false;
    }
    let mut cargo: Vec<PieceKind> = carrier.carrying.iter().map(|p| p.kind).collect();
    cargo.push(incoming.kind);
    cargo.extend(incoming.carrying.iter().map(|p| p.kind));
    assign_slots(carrier.kind, &cargo)
}

/// Merge two pieces into one stack, trying `a` as carrier first. The
/// resulting cargo preserves order: `a`'s cargo, then `b` and its cargo
/// (or symmetrically when `b` carries).
#[must_use]
pub fn form_stack(a: &Piece, b: &Piece) -> Option<Piece> {
    fn merge(carrier: &Piece, incoming: &Piece) -> Piece {
        let mut out = carrier.clone();
        let mut unit = incoming.clone();
        let extra = std::mem::take(&mut unit.carrying);
        out.carrying.push(unit);
        out.carrying.extend(extra);
        out
    }
    if can_combine(a, b) {
        Some(merge(a, b))
    } else if can_combine(b, a) {
        Some(merge(b, a))
    } else {
        None
    }
}

/// Fold a list of pieces into a single stack where possible. Pieces that
/// cannot be absorbed are returned as leftovers.
#[must_use]
pub fn combine_pieces(pieces: Vec<Piece>) -> (Option<Piece>, Vec<Piece>) {
    let mut combined: Option<Piece> = None;
    let mut leftover = Vec::new();
    for piece in pieces {
        match combined.take() {
            None => combined = Some(piece),
            Some(acc) => match form_stack(&acc, &piece) {
                Some(stack) => combined = Some(stack),
                None => {
                    leftover.push(piece);
                    combined = Some(acc);
                }
            },
        }
    }
    (combined, leftover)
}

/// Rebuild a stack from loose units, promoting the first unit to carrier.
/// Falls back to a full re-combination when the leading unit cannot carry
/// the rest.
fn restack(mut units: Vec<Piece>) -> Result<Option<Piece>, StackError> {
    match units.len() {
        0 => Ok(None),
        1 => Ok(Some(units.remove(0))),
        _ => {
            let cargo: Vec<PieceKind> = units[1..].iter().map(|p| p.kind).collect();
            if assign_slots(units[0].kind, &cargo) {
                let mut carrier = units.remove(0);
                carrier.carrying = units;
                Ok(Some(carrier))
            } else {
                let first = units[0].kind;
                let (combined, leftover) = combine_pieces(units);
                if leftover.is_empty() {
                    Ok(combined)
                } else {
                    Err(StackError::CannotCombine {
                        carrier: first,
                        incoming: leftover[0].kind,
                    })
                }
            }
        }
    }
}

/// Remove one piece of `kind` from a stack. Returns the removed unit and
/// the remaining stack (None when the stack is exhausted). Removing the
/// carrier promotes the first carried piece, which keeps its own heroic
/// flag.
pub fn remove_from_stack(
    stack: &Piece,
    kind: PieceKind,
) -> Result<(Piece, Option<Piece>), StackError> {
    let mut units = stack.flatten_units();
    let position = units
        .iter()
        .position(|p| p.kind == kind)
        .ok_or(StackError::AbsentPiece { kind })?;
    let removed = units.remove(position);
    let rest = restack(units)?;
    Ok((removed, rest))
}

/// Validate the stack invariants for a piece value: carried pieces carry
/// nothing, all colors match, and the cargo fits the carrier blueprint.
pub fn validate(piece: &Piece) -> Result<(), StackError> {
    if piece.carrying.is_empty() {
        return Ok(());
    }
    if piece.count() > capacity(piece.kind) {
        return Err(StackError::CannotCombine {
            carrier: piece.kind,
            incoming: piece.carrying[piece.carrying.len() - 1].kind,
        });
    }
    for carried in &piece.carrying {
        if !carried.carrying.is_empty() {
            return Err(StackError::CannotCombine {
                carrier: piece.kind,
                incoming: carried.kind,
            });
        }
        if carried.color != piece.color {
            return Err(StackError::CannotCombine {
                carrier: piece.kind,
                incoming: carried.kind,
            });
        }
    }
    let cargo: Vec<PieceKind> = piece.carrying.iter().map(|p| p.kind).collect();
    if assign_slots(piece.kind, &cargo) {
        Ok(())
    } else {
        Err(StackError::CannotCombine {
            carrier: piece.kind,
            incoming: cargo[0],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::Color;

    fn piece(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Red)
    }

    #[test]
    fn test_navy_carries_airforce_and_one_ground_piece() {
        let navy = piece(PieceKind::Navy);
        let air = piece(PieceKind::AirForce);
        let tank = piece(PieceKind::Tank);

        let stack = form_stack(&navy, &air).unwrap();
        assert_eq!(stack.kind, PieceKind::Navy);
        let full = form_stack(&stack, &tank).unwrap();
        assert_eq!(full.count(), 3);

        // second ground piece does not fit
        let infantry = piece(PieceKind::Infantry);
        assert!(form_stack(&full, &infantry).is_none());
    }

    #[test]
    fn test_form_stack_prefers_first_argument_as_carrier() {
        let tank = piece(PieceKind::Tank);
        let infantry = piece(PieceKind::Infantry);
        let stack = form_stack(&infantry, &tank).unwrap();
        // infantry cannot carry, so tank becomes the carrier
        assert_eq!(stack.kind, PieceKind::Tank);
        assert_eq!(stack.carrying[0].kind, PieceKind::Infantry);
    }

    #[test]
    fn test_cannot_combine_across_colors() {
        let red = Piece::new(PieceKind::Tank, Color::Red);
        let blue = Piece::new(PieceKind::Infantry, Color::Blue);
        assert!(form_stack(&red, &blue).is_none());
    }

    #[test]
    fn test_engineer_carries_one_heavy_piece() {
        let engineer = piece(PieceKind::Engineer);
        let artillery = piece(PieceKind::Artillery);
        let stack = form_stack(&engineer, &artillery).unwrap();
        assert_eq!(stack.kind, PieceKind::Engineer);

        let missile = piece(PieceKind::Missile);
        assert!(form_stack(&stack, &missile).is_none());
    }

    #[test]
    fn test_merging_a_stack_flattens_cargo() {
        let airforce = form_stack(&piece(PieceKind::AirForce), &piece(PieceKind::Infantry))
            .unwrap();
        let navy = piece(PieceKind::Navy);
        let combined = form_stack(&navy, &airforce).unwrap();
        assert_eq!(combined.kind, PieceKind::Navy);
        assert_eq!(combined.count(), 3);
        assert!(combined.carrying.iter().all(|p| p.carrying.is_empty()));
    }

    #[test]
    fn test_remove_carried_piece() {
        let stack = piece(PieceKind::Navy).carrying(vec![
            piece(PieceKind::AirForce),
            piece(PieceKind::Infantry),
        ]);
        let (removed, rest) = remove_from_stack(&stack, PieceKind::Infantry).unwrap();
        assert_eq!(removed.kind, PieceKind::Infantry);
        let rest = rest.unwrap();
        assert_eq!(rest.kind, PieceKind::Navy);
        assert_eq!(rest.carrying.len(), 1);
    }

    #[test]
    fn test_remove_carrier_promotes_first_carried() {
        let stack = piece(PieceKind::Navy).carrying(vec![
            piece(PieceKind::AirForce).promoted(),
            piece(PieceKind::Infantry),
        ]);
        let (removed, rest) = remove_from_stack(&stack, PieceKind::Navy).unwrap();
        assert_eq!(removed.kind, PieceKind::Navy);
        assert!(removed.carrying.is_empty());
        let rest = rest.unwrap();
        assert_eq!(rest.kind, PieceKind::AirForce);
        assert!(rest.heroic, "promoted carrier keeps its own heroic flag");
        assert_eq!(rest.carrying[0].kind, PieceKind::Infantry);
    }

    #[test]
    fn test_remove_last_piece_empties_stack() {
        let lone = piece(PieceKind::Tank);
        let (removed, rest) = remove_from_stack(&lone, PieceKind::Tank).unwrap();
        assert_eq!(removed.kind, PieceKind::Tank);
        assert!(rest.is_none());
    }

    #[test]
    fn test_remove_absent_piece_fails() {
        let stack = piece(PieceKind::Tank).carrying(vec![piece(PieceKind::Infantry)]);
        assert_eq!(
            remove_from_stack(&stack, PieceKind::Militia),
            Err(StackError::AbsentPiece {
                kind: PieceKind::Militia
            })
        );
    }

    #[test]
    fn test_combine_pieces_reports_leftovers() {
        let (combined, leftover) = combine_pieces(vec![
            piece(PieceKind::Navy),
            piece(PieceKind::AirForce),
            piece(PieceKind::Tank),
            piece(PieceKind::Militia),
        ]);
        let combined = combined.unwrap();
        assert_eq!(combined.kind, PieceKind::Navy);
        assert_eq!(combined.count(), 3);
        assert_eq!(leftover.len(), 1);
        assert_eq!(leftover[0].kind, PieceKind::Militia);
    }

    #[test]
    fn test_validate_rejects_overfull_stack() {
        let bad = piece(PieceKind::Tank).carrying(vec![
            piece(PieceKind::Infantry),
            piece(PieceKind::Militia),
        ]);
        assert!(validate(&bad).is_err());

        let good = piece(PieceKind::Tank).carrying(vec![piece(PieceKind::Infantry)]);
        assert!(validate(&good).is_ok());
    }

    #[test]
    fn test_validate_rejects_nested_stacks() {
        let nested = piece(PieceKind::Navy).carrying(vec![
            piece(PieceKind::AirForce).carrying(vec![piece(PieceKind::Tank)]),
        ]);
        assert!(validate(&nested).is_err());
    }
}
