//! Integration tests over the public API.

use cotulenh_engine::board::prelude::*;

#[test]
fn default_position_is_playable() {
    let mut board = Board::new();
    assert_eq!(board.turn(), Color::Red);
    assert_eq!(board.move_number(), 1);
    assert!(!board.is_check());
    assert!(!board.is_game_over());

    let moves = board.generate_moves();
    assert!(!moves.is_empty());
    // generation is deterministic
    assert_eq!(moves, board.generate_moves());
}

#[test]
fn known_positions_have_expected_move_counts() {
    struct TestPosition {
        name: &'static str,
        fen: &'static str,
        square: &'static str,
        expected: usize,
    }

    let positions = [
        TestPosition {
            name: "lone militia mid-board",
            fen: "11/11/11/11/11/11/11/6M4/11/11/11/11 r - - 0 1",
            square: "g5",
            expected: 8,
        },
        TestPosition {
            name: "lone tank in the corner",
            fen: "11/11/11/11/11/11/11/11/11/11/11/10T r - - 0 1",
            square: "k1",
            expected: 4,
        },
        TestPosition {
            name: "lone heroic headquarter",
            fen: "11/11/11/11/11/11/11/6+H4/11/11/11/11 r - - 0 1",
            square: "g5",
            expected: 8,
        },
        TestPosition {
            name: "headquarter cannot move",
            fen: "11/11/11/11/11/11/11/6H4/11/11/11/11 r - - 0 1",
            square: "g5",
            expected: 0,
        },
    ];

    for position in &positions {
        let mut board = Board::from_fen(position.fen);
        let square: Square = position.square.parse().unwrap();
        let moves = board.moves_from(square);
        assert_eq!(
            moves.len(),
            position.expected,
            "move count mismatch for {}",
            position.name
        );
    }
}

#[test]
fn play_undo_cycle_through_the_api() {
    let mut board = Board::new();
    let initial = board.to_fen();

    let record = board.make_move_san("Td5").unwrap();
    assert_eq!(record.before, initial);
    assert_eq!(record.after, board.to_fen());
    assert_eq!(board.turn(), Color::Blue);
    assert_eq!(board.history_sans(), vec![record.san.clone()]);

    let undone = board.undo().expect("one move to undo");
    assert_eq!(undone.to_string(), record.mv.to_string());
    assert_eq!(board.to_fen(), initial);
    assert!(board.undo().is_none());
}

#[test]
fn verbose_moves_carry_notation_and_fens() {
    let mut board = Board::new();
    let before = board.to_fen();
    let records = board.verbose_moves(&MoveFilter::default());
    assert!(!records.is_empty());
    for record in &records {
        assert_eq!(record.before, before);
        assert_ne!(record.after, before);
        assert!(!record.san.is_empty());
        assert!(record.lan.len() >= record.san.len());
    }
}

#[test]
fn move_filters_narrow_generation() {
    let mut board = Board::new();
    let square: Square = "d4".parse().unwrap();
    let from_square = board.moves_for(&MoveFilter::from_square(square));
    assert!(from_square.iter().all(|m| m.from == square));

    let tanks_only = board.moves_for(&MoveFilter {
        square: None,
        kind: Some(PieceKind::Tank),
    });
    assert!(!tanks_only.is_empty());
    assert!(tanks_only.iter().all(|m| m.piece.kind == PieceKind::Tank));
}

#[test]
fn perft_is_stable_under_make_undo() {
    let mut board = Board::new();
    let first = board.perft(2);
    let second = board.perft(2);
    assert_eq!(first, second);
    assert!(first > 0);
}

#[test]
fn fen_round_trip_through_load() {
    let mut board = Board::new();
    board.make_move_san("Td5").unwrap();
    let fen = board.to_fen();

    let mut other = Board::new();
    other.load(&fen).unwrap();
    assert_eq!(other.to_fen(), fen);
    assert_eq!(other.turn(), Color::Blue);
}

#[test]
fn ambiguous_san_is_rejected() {
    // two militias can both reach f3 diagonally
    let mut board = Board::new();
    let result = board.make_move_san("Mf3");
    assert!(matches!(
        result,
        Err(MoveError::Illegal {
            cause: IllegalMoveKind::Ambiguous,
            ..
        })
    ));
    // the disambiguated form works
    board.make_move_san("Mef3").unwrap();
}

#[test]
fn stack_helpers_are_exposed() {
    use cotulenh_engine::board::form_stack;

    let navy = Piece::new(PieceKind::Navy, Color::Red);
    let tank = Piece::new(PieceKind::Tank, Color::Red);
    let stack = form_stack(&navy, &tank).expect("navy carries a tank");
    assert_eq!(stack.kind, PieceKind::Navy);
    assert_eq!(stack.count(), 2);
}
