//! Legality and state edge cases: exposure, check, placement rules.

use super::{find_move, play};
use crate::board::{
    Board, BoardBuilder, Color, IllegalMoveKind, MoveError, MoveFlags, Piece, PieceKind,
    PlacementError, Square,
};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn exposure_board() -> Board {
    BoardBuilder::new()
        .piece(sq("e1"), Piece::new(PieceKind::Commander, Color::Red))
        .piece(sq("e11"), Piece::new(PieceKind::Commander, Color::Blue))
        .piece(sq("e5"), Piece::new(PieceKind::Tank, Color::Red))
        .build()
        .unwrap()
}

#[test]
fn test_moving_the_blocker_off_the_file_is_rejected() {
    let mut board = exposure_board();
    let moves = board.moves_from(sq("e5"));
    assert!(!moves.is_empty());
    assert!(
        moves.iter().all(|m| m.to.file() == 4),
        "every legal tank move keeps the commanders screened"
    );

    let sideways = crate::board::Move {
        from: sq("e5"),
        to: sq("d5"),
        piece: Piece::new(PieceKind::Tank, Color::Red),
        captured: None,
        combined: None,
        flags: MoveFlags::NORMAL,
    };
    let err = board.make_move(&sideways).unwrap_err();
    assert_eq!(
        err,
        MoveError::Illegal {
            notation: "e5d5".to_string(),
            cause: IllegalMoveKind::ExposesCommander,
        }
    );
}

#[test]
fn test_moving_along_the_file_keeps_the_screen() {
    let mut board = exposure_board();
    play(&mut board, "e5", "e7");
    assert_eq!(board.get(sq("e7")).unwrap().kind, PieceKind::Tank);
}

#[test]
fn test_moving_into_attack_is_rejected() {
    // blue tank covers d1 and d2; the red commander may not step there
    let mut board = BoardBuilder::new()
        .piece(sq("e1"), Piece::new(PieceKind::Commander, Color::Red))
        .piece(sq("k12"), Piece::new(PieceKind::Commander, Color::Blue))
        .piece(sq("d3"), Piece::new(PieceKind::Tank, Color::Blue))
        .build()
        .unwrap();
    let moves = board.moves_from(sq("e1"));
    assert!(!moves.iter().any(|m| m.to == sq("d1")), "d1 is covered");
    assert!(moves.iter().any(|m| m.to == sq("f1")), "f1 is not");
}

#[test]
fn test_check_and_evasion() {
    let mut board = BoardBuilder::new()
        .piece(sq("e1"), Piece::new(PieceKind::Commander, Color::Red))
        .piece(sq("k12"), Piece::new(PieceKind::Commander, Color::Blue))
        .piece(sq("e3"), Piece::new(PieceKind::Tank, Color::Blue))
        .build()
        .unwrap();
    assert!(board.is_check(), "tank attacks the commander in range 2");
    let moves = board.moves_from(sq("e1"));
    // every commander move must leave the attacked file or capture nothing
    for mv in &moves {
        let mut probe = board.clone();
        probe.make_move(mv).unwrap();
        assert!(!probe.in_check(Color::Red));
    }
}

#[test]
fn test_attackers_reports_square_and_kind() {
    let mut board = BoardBuilder::new()
        .piece(sq("e1"), Piece::new(PieceKind::Commander, Color::Red))
        .piece(sq("k12"), Piece::new(PieceKind::Commander, Color::Blue))
        .piece(sq("e3"), Piece::new(PieceKind::Tank, Color::Blue))
        .piece(sq("d2"), Piece::new(PieceKind::Militia, Color::Blue))
        .build()
        .unwrap();
    let mut attackers = board.attackers(sq("e1"), Color::Blue);
    attackers.sort_by_key(|(square, _)| *square);
    // squares order by mailbox index, rank 3 above rank 2
    assert_eq!(
        attackers,
        vec![(sq("e3"), PieceKind::Tank), (sq("d2"), PieceKind::Militia)]
    );
}

#[test]
fn test_put_rejects_terrain_violations() {
    let mut board = Board::empty();
    assert!(matches!(
        board.put(Piece::new(PieceKind::Navy, Color::Red), sq("g5")),
        Err(PlacementError::Terrain { .. })
    ));
    assert!(matches!(
        board.put(Piece::new(PieceKind::Tank, Color::Red), sq("a5")),
        Err(PlacementError::Terrain { .. })
    ));
    // mixed squares take both
    assert!(board
        .put(Piece::new(PieceKind::Navy, Color::Red), sq("c5"))
        .is_ok());
    board.remove(sq("c5"));
    assert!(board
        .put(Piece::new(PieceKind::Tank, Color::Red), sq("c5"))
        .is_ok());
}

#[test]
fn test_put_rejects_second_commander() {
    let mut board = Board::empty();
    board
        .put(Piece::new(PieceKind::Commander, Color::Red), sq("e1"))
        .unwrap();
    assert!(matches!(
        board.put(Piece::new(PieceKind::Commander, Color::Red), sq("g1")),
        Err(PlacementError::DuplicateCommander { .. })
    ));
    // the other color is unaffected
    assert!(board
        .put(Piece::new(PieceKind::Commander, Color::Blue), sq("g1"))
        .is_ok());
}

#[test]
fn test_put_rejects_invalid_stack() {
    let mut board = Board::empty();
    let overfull = Piece::new(PieceKind::Tank, Color::Red).carrying(vec![
        Piece::new(PieceKind::Infantry, Color::Red),
        Piece::new(PieceKind::Militia, Color::Red),
    ]);
    assert!(matches!(
        board.put(overfull, sq("d4")),
        Err(PlacementError::InvalidStack { .. })
    ));
}

#[test]
fn test_get_kind_reaches_into_stacks() {
    let mut board = Board::empty();
    board
        .put(
            Piece::new(PieceKind::Navy, Color::Red).carrying(vec![Piece::new(
                PieceKind::AirForce,
                Color::Red,
            )]),
            sq("b5"),
        )
        .unwrap();
    assert_eq!(
        board.get_kind(sq("b5"), PieceKind::AirForce).unwrap().kind,
        PieceKind::AirForce
    );
    assert!(board.get_kind(sq("b5"), PieceKind::Tank).is_none());
}

#[test]
fn test_commander_capture_by_stack_is_tracked() {
    // a stack carrying the commander moves; the map must follow it
    let mut board = BoardBuilder::new()
        .piece(
            sq("d3"),
            Piece::new(PieceKind::Tank, Color::Red).carrying(vec![Piece::new(
                PieceKind::Commander,
                Color::Red,
            )]),
        )
        .piece(sq("k12"), Piece::new(PieceKind::Commander, Color::Blue))
        .build()
        .unwrap();
    assert_eq!(board.commander_square(Color::Red), Some(sq("d3")));
    play(&mut board, "d3", "d4");
    assert_eq!(board.commander_square(Color::Red), Some(sq("d4")));
}

#[test]
fn test_suicide_capture_of_own_commander_stack_is_illegal() {
    // an air force carrying the commander may not fly into a defended
    // square: the commander would die with it
    let mut board = BoardBuilder::new()
        .piece(
            sq("d7"),
            Piece::new(PieceKind::AirForce, Color::Red).carrying(vec![Piece::new(
                PieceKind::Commander,
                Color::Red,
            )]),
        )
        .piece(sq("k12"), Piece::new(PieceKind::Commander, Color::Blue))
        .piece(sq("e5"), Piece::new(PieceKind::AntiAir, Color::Blue))
        .piece(sq("d5"), Piece::new(PieceKind::Infantry, Color::Blue))
        .build()
        .unwrap();
    let moves = board.moves_from(sq("d7"));
    assert!(
        !moves
            .iter()
            .any(|m| m.to == sq("d5") && m.is_suicide_capture() && !m.is_deploy()),
        "whole-stack suicide would lose the commander"
    );
}

#[test]
fn test_game_over_reports() {
    let mut board = Board::new();
    assert!(!board.is_game_over());
    assert!(!board.is_checkmate());
    assert!(!board.is_stalemate());
    assert!(board.winner().is_none());
}

#[test]
fn test_move_cache_is_coherent_across_mutation() {
    let mut board = Board::new();
    let before = board.generate_moves();
    play(&mut board, "d4", "d5");
    let after = board.generate_moves();
    assert_ne!(before, after, "cache must not survive a mutation");
    board.undo().unwrap();
    assert_eq!(board.generate_moves(), before);
}

#[test]
fn test_air_defense_field_matches_recompute() {
    let mut board = Board::new();
    play(&mut board, "d4", "d5");
    play(&mut board, "d9", "d8");
    // the lazily cached field must equal a from-scratch recompute
    let cached = board.air_defense();
    let fresh = crate::board::air_defense::AirDefenseField::compute(&board);
    assert_eq!(cached, fresh);
}
