//! Unit test suites, grouped by subsystem.

mod edge_cases;

use crate::board::{Board, Move, MoveFlags, Square};

/// Find and play the normal move `from` → `to`, panicking when absent.
pub(crate) fn play(board: &mut Board, from: &str, to: &str) {
    let mv = find_move(board, from, to, MoveFlags::NORMAL);
    board.make_move(&mv).expect("legal move");
}

/// Find a legal move by squares and flag. Deploy sub-moves are only
/// matched when explicitly requested.
pub(crate) fn find_move(board: &mut Board, from: &str, to: &str, flag: MoveFlags) -> Move {
    let from: Square = from.parse().unwrap();
    let to: Square = to.parse().unwrap();
    board
        .moves_from(from)
        .into_iter()
        .find(|m| {
            m.to == to
                && m.flags.contains(flag)
                && (flag.contains(MoveFlags::DEPLOY) || !m.is_deploy())
        })
        .unwrap_or_else(|| panic!("expected move {from}{to}"))
}

/// Destination squares of the legal moves from a square.
pub(crate) fn destinations(board: &mut Board, from: &str) -> Vec<String> {
    let from: Square = from.parse().unwrap();
    board
        .moves_from(from)
        .iter()
        .map(|m| m.to.to_string())
        .collect()
}
